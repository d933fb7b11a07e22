use serde::Serialize;
use sqlx::FromRow;

use crate::models::solicitud::Solicitud;

/// Conteo de solicitudes por operadora
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OperadorCount {
    pub operador: String,
    pub total: i64,
}

/// Estadísticas del dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_solicitudes: i64,
    pub pendientes: i64,
    pub enviadas: i64,
    pub respondidas: i64,
    pub rechazadas: i64,
    pub solicitudes_por_operador: Vec<OperadorCount>,
    pub actividad_reciente: Vec<Solicitud>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUsersResponse {
    pub active_users: i64,
}
