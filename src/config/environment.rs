//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::config::database::DatabaseConfig;

/// Errores al leer la configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid value (got '{value}')")]
    Invalid { name: &'static str, value: String },
}

/// Política de intentos fallidos y suspensión automática
#[derive(Debug, Clone, Copy)]
pub struct SuspensionPolicy {
    pub max_failed_attempts: i32,
    pub suspension_hours: i64,
}

impl Default for SuspensionPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 3,
            suspension_hours: 3,
        }
    }
}

/// Intervalos y retenciones de las tareas en segundo plano
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    pub suspension_sweep_secs: u64,
    pub notification_sweep_secs: u64,
    pub admin_notification_retention_hours: i64,
    pub user_notification_retention_hours: i64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            suspension_sweep_secs: 5 * 60,
            notification_sweep_secs: 60 * 60,
            admin_notification_retention_hours: 120,
            user_notification_retention_hours: 48,
        }
    }
}

/// Configuración del proveedor LLM del chatbot
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub session_hours: i64,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    pub bootstrap_admin_password: String,
    pub database: DatabaseConfig,
    pub suspension: SuspensionPolicy,
    pub sweeps: SweepConfig,
    pub llm: LlmConfig,
}

impl EnvironmentConfig {
    /// Leer la configuración desde variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = SweepConfig::default();
        let suspension_defaults = SuspensionPolicy::default();

        Ok(Self {
            environment: var_or("ENVIRONMENT", "development"),
            port: parse_or("PORT", 3000)?,
            host: var_or("HOST", "0.0.0.0"),
            jwt_secret: required("JWT_SECRET")?,
            session_hours: parse_or("SESSION_HOURS", 24)?,
            cors_origins: var_or("CORS_ORIGINS", "")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", 10)?,
            rate_limit_window: parse_or("RATE_LIMIT_WINDOW", 60)?,
            bootstrap_admin_password: required("BOOTSTRAP_ADMIN_PASSWORD")?,
            database: database_from_env()?,
            suspension: SuspensionPolicy {
                max_failed_attempts: parse_or(
                    "MAX_FAILED_ATTEMPTS",
                    suspension_defaults.max_failed_attempts,
                )?,
                suspension_hours: parse_or("SUSPENSION_HOURS", suspension_defaults.suspension_hours)?,
            },
            sweeps: SweepConfig {
                suspension_sweep_secs: parse_or(
                    "SUSPENSION_SWEEP_SECS",
                    defaults.suspension_sweep_secs,
                )?,
                notification_sweep_secs: parse_or(
                    "NOTIFICATION_SWEEP_SECS",
                    defaults.notification_sweep_secs,
                )?,
                admin_notification_retention_hours: parse_or(
                    "ADMIN_NOTIFICATION_RETENTION_HOURS",
                    defaults.admin_notification_retention_hours,
                )?,
                user_notification_retention_hours: parse_or(
                    "USER_NOTIFICATION_RETENTION_HOURS",
                    defaults.user_notification_retention_hours,
                )?,
            },
            llm: LlmConfig {
                api_url: var_or(
                    "LLM_API_URL",
                    "https://generativelanguage.googleapis.com/v1beta/models",
                ),
                api_key: env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
                model: var_or("LLM_MODEL", "gemini-1.5-flash"),
            },
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn database_from_env() -> Result<DatabaseConfig, ConfigError> {
    let mut database = DatabaseConfig::new(required("DATABASE_URL")?);
    database.max_connections = parse_or("DATABASE_MAX_CONNECTIONS", database.max_connections)?;
    database.min_connections = parse_or("DATABASE_MIN_CONNECTIONS", database.min_connections)?;
    database.acquire_timeout = Duration::from_secs(parse_or(
        "DATABASE_ACQUIRE_TIMEOUT_SECS",
        database.acquire_timeout.as_secs(),
    )?);
    Ok(database)
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
