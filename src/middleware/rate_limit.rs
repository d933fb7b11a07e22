//! Middleware de Rate Limiting
//!
//! Ventana fija por IP. Se aplica al endpoint de login para frenar
//! la adivinación de contraseñas.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

use super::auth::{client_ip, ClientIp};
use crate::{config::EnvironmentConfig, state::AppState, utils::errors::AppError};

/// Contador de requests de una IP dentro de su ventana
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimitState {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self::with_limits(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_window),
        )
    }

    pub fn with_limits(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
        }
    }

    /// Registra una request de `ip`; falla si ya agotó su ventana
    pub async fn check_rate_limit(&self, ip: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

/// Rate limit del login
pub async fn login_rate_limit_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    if let Err(e) = state.login_rate_limit.check_rate_limit(&ip).await {
        warn!("🚫 Rate limit de login excedido para IP {}", ip);
        return Err(e);
    }

    request.extensions_mut().insert(ClientIp(ip));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_is_per_ip() {
        let state = RateLimitState::with_limits(2, Duration::from_secs(60));

        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(matches!(
            state.check_rate_limit("10.0.0.1").await,
            Err(AppError::RateLimitExceeded)
        ));
        assert!(state.check_rate_limit("10.0.0.2").await.is_ok());
    }

    #[tokio::test]
    async fn test_window_expiry_resets_counter() {
        let state = RateLimitState::with_limits(1, Duration::from_millis(20));

        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_err());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
    }
}
