use axum::{
    extract::{Path, Query, State},
    middleware::from_fn,
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::{
    controllers::user_controller::UserController,
    dto::{dashboard_dto::ActiveUsersResponse, ApiResponse},
    middleware::{admin_only_middleware, AuthenticatedUser},
    models::user::{CreateUserRequest, UpdateUserRequest, UserFilters, UserListResponse, UserResponse},
    state::AppState,
    utils::errors::AppError,
};

pub fn create_user_router() -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", patch(update_user).delete(delete_user))
        .route_layer(from_fn(admin_only_middleware));

    Router::new()
        .route("/active-count", get(active_count))
        .merge(admin)
}

async fn list_users(
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
) -> Result<Json<UserListResponse>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.create(&user, request).await?))
}

async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.update(&user, id, request).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.delete(&user, id).await?))
}

async fn active_count(
    State(state): State<AppState>,
) -> Result<Json<ActiveUsersResponse>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.active_count().await?))
}
