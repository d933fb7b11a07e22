//! Controlador de usuarios (administración)

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    dto::{dashboard_dto::ActiveUsersResponse, ApiResponse},
    middleware::auth::AuthenticatedUser,
    models::user::{
        CreateUserRequest, UpdateUserRequest, User, UserFilters, UserListResponse, UserResponse,
        UserRole, UserStatus,
    },
    repositories::{NewUser, UserRepository},
    utils::{errors::AppError, password::hash_password, validation::trim_optional},
};

pub struct UserController {
    users: UserRepository,
}

/// Aplica una edición administrativa. `password_hash` ya viene hasheado.
///
/// Pasar a `suspendido` fija `fecha_suspension`; sin `tiempoSuspension` la
/// suspensión queda indefinida. Volver a `activo` limpia los datos de
/// suspensión.
pub fn apply_user_update(
    user: &mut User,
    request: UpdateUserRequest,
    password_hash: Option<String>,
    now: DateTime<Utc>,
) {
    if let Some(username) = request.username {
        user.username = username.trim().to_string();
    }
    if let Some(hash) = password_hash {
        user.password = hash;
    }
    if let Some(nombre) = request.nombre {
        user.nombre = nombre.trim().to_string();
    }
    if request.email.is_some() {
        user.email = trim_optional(request.email);
    }
    if let Some(rol) = request.rol {
        user.rol = rol.as_str().to_string();
    }
    if request.coordinacion.is_some() {
        user.coordinacion = trim_optional(request.coordinacion);
    }
    if let Some(activo) = request.activo {
        user.activo = activo;
    }
    if request.direccion_ip.is_some() {
        user.direccion_ip = request.direccion_ip;
    }

    match request.status {
        Some(UserStatus::Suspendido) => {
            if user.status != UserStatus::Suspendido {
                user.fecha_suspension = Some(now);
            }
            user.status = UserStatus::Suspendido;
            user.tiempo_suspension = request.tiempo_suspension;
            user.motivo_suspension = trim_optional(request.motivo_suspension);
        }
        Some(status) => {
            user.status = status;
            user.fecha_suspension = None;
            user.tiempo_suspension = None;
            user.motivo_suspension = None;
        }
        None => {
            if request.tiempo_suspension.is_some() {
                user.tiempo_suspension = request.tiempo_suspension;
            }
            if request.motivo_suspension.is_some() {
                user.motivo_suspension = trim_optional(request.motivo_suspension);
            }
        }
    }

    // Una cuenta suspendida o bloqueada pierde su sesión
    if user.status != UserStatus::Activo || !user.activo {
        user.session_token = None;
        user.session_expires = None;
    }
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: UserFilters) -> Result<UserListResponse, AppError> {
        let (users, total) = self.users.list(&filters).await?;

        Ok(UserListResponse {
            users: users.into_iter().map(UserResponse::from).collect(),
            total,
        })
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        let status = request.status.unwrap_or(UserStatus::Activo);
        let new_user = NewUser {
            username: request.username.trim().to_string(),
            password_hash: hash_password(&request.password)?,
            nombre: request.nombre.trim().to_string(),
            email: trim_optional(request.email),
            rol: request.rol.unwrap_or(UserRole::Usuario).as_str().to_string(),
            coordinacion: trim_optional(request.coordinacion),
            activo: request.activo.unwrap_or(true),
            status,
            tiempo_suspension: request
                .tiempo_suspension
                .filter(|_| status == UserStatus::Suspendido),
            motivo_suspension: trim_optional(request.motivo_suspension)
                .filter(|_| status == UserStatus::Suspendido),
            direccion_ip: request.direccion_ip,
        };

        let user = self.users.create(&new_user).await?;
        info!("👤 Usuario {} creado por {}", user.username, actor.username);

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "Usuario creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: i32,
        request: UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        let password_hash = request
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        apply_user_update(&mut user, request, password_hash, Utc::now());
        let user = self.users.save_profile(&user).await?;

        info!("✏️ Usuario {} actualizado por {}", user.username, actor.username);

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "Usuario actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(
        &self,
        actor: &AuthenticatedUser,
        id: i32,
    ) -> Result<ApiResponse<()>, AppError> {
        if actor.id == id {
            return Err(AppError::BadRequest(
                "No puedes eliminar tu propio usuario".to_string(),
            ));
        }

        if !self.users.delete(id).await? {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        warn!("🗑️ Usuario {} eliminado por {}", id, actor.username);
        Ok(ApiResponse::message("Usuario eliminado exitosamente"))
    }

    pub async fn active_count(&self) -> Result<ActiveUsersResponse, AppError> {
        Ok(ActiveUsersResponse {
            active_users: self.users.count_active_sessions().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::fixtures::user_with_role;
    use chrono::Duration;

    #[test]
    fn test_suspension_without_end_is_indefinite() {
        let mut user = user_with_role("usuario");
        user.session_token = Some("tok".to_string());
        let now = Utc::now();

        apply_user_update(
            &mut user,
            UpdateUserRequest {
                status: Some(UserStatus::Suspendido),
                motivo_suspension: Some(" Revisión ".to_string()),
                ..Default::default()
            },
            None,
            now,
        );

        assert_eq!(user.status, UserStatus::Suspendido);
        assert_eq!(user.fecha_suspension, Some(now));
        assert_eq!(user.tiempo_suspension, None);
        assert_eq!(user.motivo_suspension.as_deref(), Some("Revisión"));
        assert_eq!(user.session_token, None);
    }

    #[test]
    fn test_reactivation_clears_suspension_fields() {
        let mut user = user_with_role("usuario");
        let now = Utc::now();
        user.status = UserStatus::Suspendido;
        user.fecha_suspension = Some(now - Duration::hours(1));
        user.tiempo_suspension = Some(now + Duration::hours(2));
        user.motivo_suspension = Some("x".to_string());

        apply_user_update(
            &mut user,
            UpdateUserRequest {
                status: Some(UserStatus::Activo),
                ..Default::default()
            },
            None,
            now,
        );

        assert_eq!(user.status, UserStatus::Activo);
        assert_eq!(user.fecha_suspension, None);
        assert_eq!(user.tiempo_suspension, None);
        assert_eq!(user.motivo_suspension, None);
    }

    #[test]
    fn test_role_and_password_are_applied() {
        let mut user = user_with_role("usuario");

        apply_user_update(
            &mut user,
            UpdateUserRequest {
                rol: Some(UserRole::Supervisor),
                ..Default::default()
            },
            Some("$2b$hash".to_string()),
            Utc::now(),
        );

        assert_eq!(user.rol, "supervisor");
        assert_eq!(user.password, "$2b$hash");
    }
}
