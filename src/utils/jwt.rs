//! Utilidades JWT
//!
//! Este módulo firma y verifica los tokens de sesión. La validez real de la
//! sesión la decide el token guardado en `users.session_token` y su
//! expiración; la firma sólo garantiza que el token no fue alterado.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Claims del JWT de sesión
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: i32, // user_id
    pub username: String,
    pub rol: String,
    pub jti: String, // identificador único de la sesión
    pub exp: i64,    // expiration timestamp
    pub iat: i64,    // issued at timestamp
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub session_hours: i64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            session_hours: config.session_hours,
        }
    }
}

/// Token emitido junto con su instante de expiración
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generar JWT token para un usuario
pub fn generate_token(
    user_id: i32,
    username: &str,
    rol: &str,
    config: &JwtConfig,
    now: DateTime<Utc>,
) -> Result<IssuedToken, AppError> {
    let expires_at = now + Duration::hours(config.session_hours);

    let claims = JwtClaims {
        sub: user_id,
        username: username.to_string(),
        rol: rol.to_string(),
        jti: Uuid::new_v4().to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))?;

    Ok(IssuedToken { token, expires_at })
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|_| AppError::Jwt("Token inválido o expirado".to_string()))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Token de acceso requerido".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Token de acceso requerido".to_string()));
    }

    Ok(token)
}
