use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};

use crate::{
    controllers::notification_controller::NotificationController,
    dto::ApiResponse,
    middleware::AuthenticatedUser,
    models::notification::{NotificacionDetalle, UnreadCountResponse},
    state::AppState,
    utils::errors::AppError,
};

pub fn create_notification_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/:id/read", put(mark_as_read))
}

async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<NotificacionDetalle>>, AppError> {
    let controller = NotificationController::new(state.pool.clone());
    Ok(Json(controller.list(&user).await?))
}

async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let controller = NotificationController::new(state.pool.clone());
    Ok(Json(controller.unread_count(&user).await?))
}

async fn mark_as_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = NotificationController::new(state.pool.clone());
    Ok(Json(controller.mark_as_read(&user, id).await?))
}
