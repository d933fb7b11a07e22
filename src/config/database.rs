//! Parámetros del pool de PostgreSQL

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// URL y límites del pool. Se construye con `DatabaseConfig::new` y los
/// límites que vengan del entorno se sobrescriben campo a campo.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
        }
    }

    /// El mínimo nunca supera al máximo, y el máximo es al menos 1
    fn pool_options(&self) -> PgPoolOptions {
        let max = self.max_connections.max(1);
        PgPoolOptions::new()
            .max_connections(max)
            .min_connections(self.min_connections.min(max))
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
    }

    /// Conecta de inmediato; falla si la base no responde
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        self.pool_options().connect(&self.url).await
    }

    /// Pool que sólo conecta cuando alguien pide una conexión
    pub fn create_lazy_pool(&self) -> Result<PgPool, sqlx::Error> {
        self.pool_options().connect_lazy(&self.url)
    }
}
