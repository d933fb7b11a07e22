//! Middleware de autenticación
//!
//! Valida el JWT del header `Authorization`, carga al usuario y comprueba
//! que el token coincide con su sesión vigente. El usuario autenticado se
//! inyecta en las extensions de la request.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    models::user::{User, UserRole},
    repositories::UserRepository,
    services::{
        role_policy::{capabilities_for, Capabilities},
        suspension_gate::evaluate_login,
    },
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub nombre: String,
    pub rol: String,
    pub role: Option<UserRole>,
    pub coordinacion: Option<String>,
    pub capabilities: Capabilities,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Some(UserRole::Admin)
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            nombre: user.nombre.clone(),
            rol: user.rol.clone(),
            role: user.role(),
            coordinacion: user.coordinacion.clone(),
            capabilities: capabilities_for(Some(&user.rol)),
        }
    }
}

/// IP del cliente resuelta por el middleware de rate limit
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

/// IP del cliente: primer valor de `x-forwarded-for`, si no la del socket
pub fn client_ip(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return forwarded.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de acceso requerido".to_string()))?;

    let token = extract_token_from_header(header_value)?;
    let claims = verify_token(token, &state.jwt)?;

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    let now = Utc::now();
    let gate = evaluate_login(&user, now);
    if gate.denial.is_some() {
        warn!("🚫 Acceso denegado a {} ({:?})", user.username, user.status);
        return Err(AppError::Forbidden("Acceso denegado".to_string()));
    }

    if user.session_token.as_deref() != Some(token) {
        debug!("Token de {} no coincide con la sesión activa", user.username);
        return Err(AppError::Unauthorized("Sesión inválida".to_string()));
    }

    if !user.has_active_session(now) {
        users.clear_session(user.id).await?;
        return Err(AppError::Unauthorized("Sesión expirada".to_string()));
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from(&user));

    Ok(next.run(request).await)
}

/// Sólo administradores
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Se requieren permisos de administrador".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Acceso a las plantillas de correo
pub async fn email_templates_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.capabilities.can_view_email_templates {
        return Err(AppError::Forbidden(
            "No tienes permisos para gestionar plantillas de correo".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::fixtures::user_with_role;
    use axum::body::Body;

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let request = Request::builder()
            .header("x-forwarded-for", "10.1.1.1, 172.16.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), "10.1.1.1");
    }

    #[test]
    fn test_client_ip_unknown_without_sources() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&request), "unknown");
    }

    #[test]
    fn test_unknown_role_gets_no_capabilities() {
        let user = AuthenticatedUser::from(&user_with_role("auditor"));
        assert_eq!(user.role, None);
        assert!(!user.is_admin());
        assert_eq!(user.capabilities, Capabilities::NONE);
    }
}
