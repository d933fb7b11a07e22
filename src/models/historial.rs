use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Entrada del historial de una solicitud
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HistorialSolicitud {
    pub id: i32,
    pub solicitud_id: Option<i32>,
    pub accion: String,
    pub descripcion: Option<String>,
    pub usuario_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Acciones registradas en el historial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccionHistorial {
    Creada,
    Actualizada,
}

impl AccionHistorial {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccionHistorial::Creada => "creada",
            AccionHistorial::Actualizada => "actualizada",
        }
    }

    pub fn descripcion(&self) -> &'static str {
        match self {
            AccionHistorial::Creada => "Solicitud creada",
            AccionHistorial::Actualizada => "Solicitud actualizada",
        }
    }
}
