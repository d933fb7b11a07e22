use axum::{
    extract::State,
    middleware::from_fn,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::{
    controllers::config_controller::ConfigController,
    middleware::{admin_only_middleware, AuthenticatedUser},
    models::config::DownloadFormat,
    state::AppState,
    utils::errors::AppError,
};

pub fn create_config_router() -> Router<AppState> {
    let admin = Router::new()
        .route("/download-format", post(set_download_format))
        .route_layer(from_fn(admin_only_middleware));

    Router::new()
        .route("/download-format", get(get_download_format))
        .merge(admin)
}

async fn get_download_format(
    State(state): State<AppState>,
) -> Result<Json<DownloadFormat>, AppError> {
    let controller = ConfigController::new(state.pool.clone());
    Ok(Json(controller.download_format().await?))
}

async fn set_download_format(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(format): Json<DownloadFormat>,
) -> Result<Json<DownloadFormat>, AppError> {
    let controller = ConfigController::new(state.pool.clone());
    Ok(Json(controller.set_download_format(&user, format).await?))
}
