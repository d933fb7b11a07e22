//! Sistema de gestión de solicitudes de experticias técnicas
//!
//! API REST para coordinar solicitudes de experticias de telecomunicaciones:
//! usuarios con roles, ciclo de vida de solicitudes, notificaciones y un
//! chatbot con cuota por usuario.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{middleware::cors_layer, state::AppState};

/// Aplicación completa con CORS y trazas HTTP
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    routes::create_app_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
