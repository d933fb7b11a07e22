//! Controlador de notificaciones del usuario autenticado

use sqlx::PgPool;

use crate::{
    dto::ApiResponse,
    middleware::auth::AuthenticatedUser,
    models::notification::{NotificacionDetalle, UnreadCountResponse},
    repositories::NotificationRepository,
    utils::errors::AppError,
};

pub struct NotificationController {
    repository: NotificationRepository,
}

impl NotificationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: NotificationRepository::new(pool),
        }
    }

    pub async fn list(&self, actor: &AuthenticatedUser) -> Result<Vec<NotificacionDetalle>, AppError> {
        self.repository.list_for_user(actor.id).await
    }

    /// Sólo se puede marcar una notificación propia
    pub async fn mark_as_read(
        &self,
        actor: &AuthenticatedUser,
        id: i32,
    ) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.mark_as_read(id, actor.id).await? {
            return Err(AppError::NotFound("Notificación no encontrada".to_string()));
        }
        Ok(ApiResponse::message("Notificación marcada como leída"))
    }

    pub async fn unread_count(&self, actor: &AuthenticatedUser) -> Result<UnreadCountResponse, AppError> {
        Ok(UnreadCountResponse {
            count: self.repository.unread_count(actor.id).await?,
        })
    }
}
