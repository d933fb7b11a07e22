use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::{
    controllers::dashboard_controller::DashboardController, dto::dashboard_dto::DashboardStats,
    middleware::AuthenticatedUser, state::AppState, utils::errors::AppError,
};

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

async fn get_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DashboardStats>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.stats(&user).await?))
}
