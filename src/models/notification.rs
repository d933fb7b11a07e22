use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::solicitud::EstadoSolicitud;

/// Notificación - mapea a la tabla notificaciones
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notificacion {
    pub id: i32,
    pub usuario_id: Option<i32>,
    pub solicitud_id: Option<i32>,
    pub mensaje: String,
    pub leida: bool,
    pub created_at: DateTime<Utc>,
}

/// Notificación con los datos de su solicitud (para el listado)
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NotificacionDetalle {
    pub id: i32,
    pub solicitud_id: Option<i32>,
    pub mensaje: String,
    pub leida: bool,
    pub created_at: DateTime<Utc>,
    pub numero_solicitud: Option<String>,
    pub estado: Option<EstadoSolicitud>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}
