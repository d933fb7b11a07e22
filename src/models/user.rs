//! Modelo de User
//!
//! Este módulo contiene el struct User con su estado de acceso (suspensión,
//! intentos fallidos, sesión única) y los contadores del chatbot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Supervisor,
    Usuario,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Supervisor => "supervisor",
            UserRole::Usuario => "usuario",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "supervisor" => Some(UserRole::Supervisor),
            "usuario" => Some(UserRole::Usuario),
            _ => None,
        }
    }

    /// Límite de mensajes del chatbot cuando el usuario no tiene uno asignado
    pub fn default_chatbot_limit(&self) -> i32 {
        match self {
            UserRole::Admin => i32::MAX,
            UserRole::Supervisor => 30,
            UserRole::Usuario => 20,
        }
    }
}

/// Estado de la cuenta - mapea al ENUM user_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Activo,
    Suspendido,
    Bloqueado,
}

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub nombre: String,
    pub email: Option<String>,
    pub rol: String,
    pub coordinacion: Option<String>,
    pub activo: bool,
    pub status: UserStatus,
    pub direccion_ip: Option<String>,
    pub ultimo_acceso: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub fecha_suspension: Option<DateTime<Utc>>,
    pub tiempo_suspension: Option<DateTime<Utc>>,
    pub motivo_suspension: Option<String>,
    pub intentos_fallidos: i32,
    pub ultimo_intento_fallido: Option<DateTime<Utc>>,
    pub session_token: Option<String>,
    pub session_expires: Option<DateTime<Utc>>,
    pub chatbot_habilitado: bool,
    pub chatbot_limite_mensajes: Option<i32>,
    pub chatbot_mensajes_usados: i32,
    pub chatbot_reseteo_mensajes: DateTime<Utc>,
}

impl User {
    /// Rol parseado; `None` para valores desconocidos
    pub fn role(&self) -> Option<UserRole> {
        UserRole::parse(&self.rol)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserRole::Admin)
    }

    /// Límite efectivo del chatbot (asignado o por defecto según rol)
    pub fn chatbot_limit(&self) -> i32 {
        self.chatbot_limite_mensajes.unwrap_or_else(|| {
            self.role()
                .map(|r| r.default_chatbot_limit())
                .unwrap_or(0)
        })
    }

    /// Indica si el usuario tiene una sesión vigente en `now`
    pub fn has_active_session(&self, now: DateTime<Utc>) -> bool {
        match (&self.session_token, self.session_expires) {
            (Some(_), Some(expires)) => now < expires,
            _ => false,
        }
    }
}

/// Request para crear un nuevo usuario
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 2, max = 100))]
    pub nombre: String,

    #[validate(email)]
    pub email: Option<String>,

    pub rol: Option<UserRole>,

    pub coordinacion: Option<String>,

    pub activo: Option<bool>,

    pub status: Option<UserStatus>,

    pub tiempo_suspension: Option<DateTime<Utc>>,

    pub motivo_suspension: Option<String>,

    pub direccion_ip: Option<String>,
}

/// Request para actualizar un usuario existente
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,

    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub nombre: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub rol: Option<UserRole>,

    pub coordinacion: Option<String>,

    pub activo: Option<bool>,

    pub status: Option<UserStatus>,

    pub tiempo_suspension: Option<DateTime<Utc>>,

    pub motivo_suspension: Option<String>,

    pub direccion_ip: Option<String>,
}

/// Response de usuario para la API (sin password ni token de sesión)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub nombre: String,
    pub email: Option<String>,
    pub rol: String,
    pub coordinacion: Option<String>,
    pub activo: bool,
    pub status: UserStatus,
    pub direccion_ip: Option<String>,
    pub ultimo_acceso: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub fecha_suspension: Option<DateTime<Utc>>,
    pub tiempo_suspension: Option<DateTime<Utc>>,
    pub motivo_suspension: Option<String>,
    pub intentos_fallidos: i32,
    pub chatbot_habilitado: bool,
    pub chatbot_limite_mensajes: i32,
    pub chatbot_mensajes_usados: i32,
}

/// Response de usuario para listados paginados
#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
}

/// Filtros para búsqueda de usuarios
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilters {
    pub search: Option<String>,
    pub status: Option<UserStatus>,
    pub rol: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let chatbot_limite_mensajes = user.chatbot_limit();
        Self {
            id: user.id,
            username: user.username,
            nombre: user.nombre,
            email: user.email,
            rol: user.rol,
            coordinacion: user.coordinacion,
            activo: user.activo,
            status: user.status,
            direccion_ip: user.direccion_ip,
            ultimo_acceso: user.ultimo_acceso,
            created_at: user.created_at,
            fecha_suspension: user.fecha_suspension,
            tiempo_suspension: user.tiempo_suspension,
            motivo_suspension: user.motivo_suspension,
            intentos_fallidos: user.intentos_fallidos,
            chatbot_habilitado: user.chatbot_habilitado,
            chatbot_limite_mensajes,
            chatbot_mensajes_usados: user.chatbot_mensajes_usados,
        }
    }
}
