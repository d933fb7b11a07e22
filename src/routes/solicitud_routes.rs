use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use crate::{
    controllers::solicitud_controller::SolicitudController,
    dto::ApiResponse,
    middleware::AuthenticatedUser,
    models::{
        historial::HistorialSolicitud,
        solicitud::{
            CreateSolicitudRequest, Solicitud, SolicitudFilters, SolicitudListResponse,
            UpdateSolicitudRequest,
        },
    },
    state::AppState,
    utils::errors::AppError,
};

pub fn create_solicitud_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_solicitudes).post(create_solicitud))
        .route(
            "/:id",
            get(get_solicitud).put(update_solicitud).delete(delete_solicitud),
        )
        .route("/:id/historial", get(get_historial))
}

async fn list_solicitudes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<SolicitudFilters>,
) -> Result<Json<SolicitudListResponse>, AppError> {
    let controller = SolicitudController::new(state.pool.clone());
    Ok(Json(controller.list(&user, filters).await?))
}

async fn get_solicitud(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<Solicitud>, AppError> {
    let controller = SolicitudController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(&user, id).await?))
}

async fn get_historial(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<HistorialSolicitud>>, AppError> {
    let controller = SolicitudController::new(state.pool.clone());
    Ok(Json(controller.historial(&user, id).await?))
}

async fn create_solicitud(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateSolicitudRequest>,
) -> Result<(StatusCode, Json<Solicitud>), AppError> {
    let controller = SolicitudController::new(state.pool.clone());
    let solicitud = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(solicitud)))
}

async fn update_solicitud(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateSolicitudRequest>,
) -> Result<Json<Solicitud>, AppError> {
    let controller = SolicitudController::new(state.pool.clone());
    Ok(Json(controller.update(&user, id, request).await?))
}

async fn delete_solicitud(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = SolicitudController::new(state.pool.clone());
    Ok(Json(controller.delete(&user, id).await?))
}
