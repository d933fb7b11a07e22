//! Rutas de la API
//!
//! Cada recurso define su router en `*_routes.rs`; aquí se anidan bajo
//! `/api` y se aplica el middleware de autenticación.

pub mod auth_routes;
pub mod chatbot_routes;
pub mod config_routes;
pub mod dashboard_routes;
pub mod experticia_routes;
pub mod notification_routes;
pub mod plantilla_routes;
pub mod solicitud_routes;
pub mod user_routes;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{middleware::auth_middleware, state::AppState};

/// Router `/api` completo
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/solicitudes", solicitud_routes::create_solicitud_router())
        .nest("/experticias", experticia_routes::create_experticia_router())
        .nest("/plantillas", plantilla_routes::create_plantilla_router())
        .nest("/users", user_routes::create_user_router())
        .nest("/notifications", notification_routes::create_notification_router())
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        .nest("/chatbot", chatbot_routes::create_chatbot_router())
        .nest("/admin/chatbot", chatbot_routes::create_chatbot_admin_router())
        .nest("/config", config_routes::create_config_router())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/auth", auth_routes::create_auth_router(state))
        .merge(protected)
}

/// Router raíz: `/health` más la API
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", create_api_router(state.clone()))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
