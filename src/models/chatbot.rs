//! Modelos del chatbot
//!
//! Historial de mensajes, estado de cuota por usuario y requests de
//! administración de límites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotMensaje {
    pub id: i32,
    pub usuario_id: i32,
    pub mensaje: String,
    pub respuesta: String,
    pub tiene_archivo: bool,
    pub nombre_archivo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Estado del chatbot para un usuario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotStatus {
    pub habilitado: bool,
    pub mensajes_usados: i32,
    /// `None` significa ilimitado (administradores)
    pub limite: Option<i32>,
}

/// Fila del listado administrativo de uso del chatbot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotUserStats {
    pub usuario: ChatbotUserSummary,
    pub mensajes_usados: i32,
    pub limite: Option<i32>,
    pub habilitado: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatbotUserSummary {
    pub id: i32,
    pub username: String,
    pub nombre: String,
    pub rol: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatbotMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Se requiere un mensaje"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatbotMessageResponse {
    pub response: String,
}

/// Actualización de límites de un usuario ya validada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitUpdate {
    pub user_id: i32,
    pub limite: i32,
    pub habilitado: bool,
}

/// Cuerpo de la actualización masiva; los elementos se validan a mano para
/// rechazar el lote completo si alguno tiene un formato inválido
#[derive(Debug, Clone, Deserialize)]
pub struct BulkLimitsRequest {
    pub updates: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotHistoryQuery {
    pub limit: Option<i64>,
}
