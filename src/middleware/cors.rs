//! Middleware de CORS
//!
//! En desarrollo sin orígenes configurados se acepta cualquier origen; en
//! cualquier otro caso sólo los listados en `CORS_ORIGINS`.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::EnvironmentConfig;

pub fn cors_layer(config: &EnvironmentConfig) -> CorsLayer {
    if config.is_development() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS abierto a cualquier origen (desarrollo)");
        return CorsLayer::very_permissive();
    }
    cors_with_origins(&config.cors_origins)
}

/// CORS restringido a una lista de orígenes
pub fn cors_with_origins(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("⚠️ Origen CORS inválido ignorado: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
