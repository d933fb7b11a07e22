use axum::{
    extract::{Path, Query, State},
    middleware::from_fn,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::{
    controllers::experticia_controller::ExperticiaController,
    dto::ApiResponse,
    middleware::{admin_only_middleware, AuthenticatedUser},
    models::experticia::{
        CreateExperticiaRequest, Experticia, ExperticiaFilters, ExperticiaListResponse,
        UpdateExperticiaRequest,
    },
    state::AppState,
    utils::errors::AppError,
};

/// Lectura para cualquier usuario autenticado; mutaciones sólo admin
pub fn create_experticia_router() -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_experticia))
        .route("/:id", put(update_experticia).delete(delete_experticia))
        .route_layer(from_fn(admin_only_middleware));

    Router::new()
        .route("/", get(list_experticias))
        .route("/:id", get(get_experticia))
        .merge(admin)
}

async fn list_experticias(
    State(state): State<AppState>,
    Query(filters): Query<ExperticiaFilters>,
) -> Result<Json<ExperticiaListResponse>, AppError> {
    let controller = ExperticiaController::new(state.pool.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn get_experticia(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Experticia>, AppError> {
    let controller = ExperticiaController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_experticia(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateExperticiaRequest>,
) -> Result<Json<ApiResponse<Experticia>>, AppError> {
    let controller = ExperticiaController::new(state.pool.clone());
    Ok(Json(controller.create(&user, request).await?))
}

async fn update_experticia(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateExperticiaRequest>,
) -> Result<Json<ApiResponse<Experticia>>, AppError> {
    let controller = ExperticiaController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_experticia(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ExperticiaController::new(state.pool.clone());
    Ok(Json(controller.delete(id).await?))
}
