//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Código SQLSTATE de Postgres para violación de restricción única
pub const UNIQUE_VIOLATION: &str = "23505";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AppError {
    /// Código HTTP asociado al error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Hash(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::QuotaExceeded(_) | AppError::RateLimitExceeded => {
                StatusCode::TOO_MANY_REQUESTS
            }
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Database(e) => {
                error!("❌ Error de base de datos: {}", e);
                ErrorResponse::new(
                    "Database Error",
                    "Error interno del servidor".to_string(),
                    "DB_ERROR",
                )
            }

            AppError::Validation(e) => {
                warn!("⚠️ Datos inválidos: {}", e);
                ErrorResponse::new("Validation Error", "Datos inválidos".to_string(), "VALIDATION_ERROR")
                    .with_details(json!(e))
            }

            AppError::Unauthorized(msg) => {
                warn!("🔒 Acceso no autorizado: {}", msg);
                ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED")
            }

            AppError::Forbidden(msg) => {
                warn!("🚫 Acceso prohibido: {}", msg);
                ErrorResponse::new("Forbidden", msg, "FORBIDDEN")
            }

            AppError::NotFound(msg) => ErrorResponse::new("Not Found", msg, "NOT_FOUND"),

            AppError::BadRequest(msg) => ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),

            AppError::QuotaExceeded(msg) => {
                warn!("⚠️ Cuota agotada: {}", msg);
                ErrorResponse::new("Quota Exceeded", msg, "QUOTA_EXCEEDED")
            }

            AppError::RateLimitExceeded => ErrorResponse::new(
                "Rate Limit Exceeded",
                "Demasiadas solicitudes. Intente de nuevo más tarde".to_string(),
                "RATE_LIMIT_EXCEEDED",
            ),

            AppError::Jwt(msg) => {
                warn!("🔑 Error JWT: {}", msg);
                ErrorResponse::new("JWT Error", msg, "JWT_ERROR")
            }

            AppError::Hash(msg) => {
                error!("❌ Error de hash: {}", msg);
                ErrorResponse::new(
                    "Hash Error",
                    "Error procesando credenciales".to_string(),
                    "HASH_ERROR",
                )
            }

            AppError::ExternalApi(msg) => {
                error!("❌ Error de servicio externo: {}", msg);
                ErrorResponse::new(
                    "External API Error",
                    "Error comunicando con el servicio externo".to_string(),
                    "EXTERNAL_API_ERROR",
                )
            }

            AppError::Internal(msg) => {
                error!("❌ Error interno: {}", msg);
                ErrorResponse::new(
                    "Internal Server Error",
                    "Error interno del servidor".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Indica si un error de sqlx es una violación de restricción única
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Convierte violaciones de unicidad en un `BadRequest` con el mensaje indicado
pub fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::BadRequest(message.to_string())
    } else {
        AppError::Database(err)
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i32) -> AppError {
    AppError::NotFound(format!("{} con id '{}' no encontrado", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_error_taxonomy() {
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Unauthorized("Cuenta Bloqueada".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::QuotaExceeded("limite".into()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::BadRequest("El número de solicitud ya existe.".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        let mapped = map_unique_violation(sqlx::Error::RowNotFound, "duplicado");
        assert!(matches!(mapped, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_error_body_contains_message_and_code() {
        let response = AppError::Forbidden("Acceso denegado".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Acceso denegado");
        assert_eq!(body["code"], "FORBIDDEN");
    }
}
