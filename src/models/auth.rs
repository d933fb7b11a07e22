use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{models::user::User, services::role_policy::Capabilities};

/// Request de login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Usuario es requerido"))]
    pub username: String,
    #[validate(length(min = 1, message = "Contraseña es requerida"))]
    pub password: String,
}

/// Información del usuario autenticado devuelta al cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub nombre: String,
    pub email: Option<String>,
    pub rol: String,
    pub coordinacion: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            nombre: user.nombre.clone(),
            email: user.email.clone(),
            rol: user.rol.clone(),
            coordinacion: user.coordinacion.clone(),
        }
    }
}

/// Response de login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Permisos efectivos del usuario actual
#[derive(Debug, Clone, Serialize)]
pub struct PermissionsResponse {
    pub rol: String,
    pub permissions: Capabilities,
}
