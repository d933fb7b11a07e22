//! Estado compartido de la aplicación
//!
//! Este módulo define el estado que se pasa a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::EnvironmentConfig, middleware::rate_limit::RateLimitState,
    services::llm_client::LlmClient, utils::jwt::JwtConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub login_rate_limit: RateLimitState,
    pub llm: Arc<dyn LlmClient>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            jwt: JwtConfig::from(&config),
            login_rate_limit: RateLimitState::new(&config),
            pool,
            config,
            llm,
        }
    }
}
