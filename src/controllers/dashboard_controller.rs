//! Controlador del dashboard

use sqlx::PgPool;

use crate::{
    dto::dashboard_dto::DashboardStats, middleware::auth::AuthenticatedUser,
    repositories::SolicitudRepository, utils::errors::AppError,
};

pub struct DashboardController {
    solicitudes: SolicitudRepository,
}

/// Usuario al que se limitan las estadísticas; `None` = todas
pub fn stats_owner(actor: &AuthenticatedUser) -> Result<Option<i32>, AppError> {
    if !actor.capabilities.can_view_dashboard {
        return Err(AppError::Forbidden(
            "No tienes permisos para ver el dashboard".to_string(),
        ));
    }
    Ok((!actor.capabilities.can_view_all_reports).then_some(actor.id))
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            solicitudes: SolicitudRepository::new(pool),
        }
    }

    pub async fn stats(&self, actor: &AuthenticatedUser) -> Result<DashboardStats, AppError> {
        let owner = stats_owner(actor)?;
        self.solicitudes.dashboard_stats(owner).await
    }
}
