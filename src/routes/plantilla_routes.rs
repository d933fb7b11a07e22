use axum::{
    extract::{Path, State},
    middleware::from_fn,
    routing::{get, put},
    Extension, Json, Router,
};

use crate::{
    controllers::plantilla_controller::PlantillaController,
    dto::ApiResponse,
    middleware::{email_templates_middleware, AuthenticatedUser},
    models::plantilla::{CreatePlantillaRequest, PlantillaCorreo, UpdatePlantillaRequest},
    state::AppState,
    utils::errors::AppError,
};

pub fn create_plantilla_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plantillas).post(create_plantilla))
        .route("/:id", put(update_plantilla).delete(delete_plantilla))
        .route_layer(from_fn(email_templates_middleware))
}

async fn list_plantillas(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlantillaCorreo>>, AppError> {
    let controller = PlantillaController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn create_plantilla(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePlantillaRequest>,
) -> Result<Json<ApiResponse<PlantillaCorreo>>, AppError> {
    let controller = PlantillaController::new(state.pool.clone());
    Ok(Json(controller.create(&user, request).await?))
}

async fn update_plantilla(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePlantillaRequest>,
) -> Result<Json<ApiResponse<PlantillaCorreo>>, AppError> {
    let controller = PlantillaController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_plantilla(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = PlantillaController::new(state.pool.clone());
    Ok(Json(controller.delete(id).await?))
}
