use axum::{
    extract::{Path, Query, State},
    middleware::from_fn,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::{
    controllers::{chatbot_controller::ChatbotController, config_controller::ConfigController},
    dto::ApiResponse,
    middleware::{admin_only_middleware, AuthenticatedUser},
    models::{
        chatbot::{
            BulkLimitsRequest, ChatbotHistoryQuery, ChatbotMensaje, ChatbotMessageRequest,
            ChatbotMessageResponse, ChatbotStatus, ChatbotUserStats,
        },
        config::{ConfiguracionSistema, SetConfigRequest},
    },
    state::AppState,
    utils::errors::AppError,
};

fn controller(state: &AppState) -> ChatbotController {
    ChatbotController::new(state.pool.clone(), state.llm.clone())
}

pub fn create_chatbot_router() -> Router<AppState> {
    Router::new()
        .route("/message", post(send_message))
        .route("/status", get(get_status))
        .route("/history", get(get_history))
}

/// Administración del chatbot, sólo admin
pub fn create_chatbot_admin_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(user_stats))
        .route("/update-limits", post(update_limits))
        .route("/reset-messages/:user_id", post(reset_messages))
        .route("/config", post(set_config))
        .route("/config/:key", get(get_config))
        .route_layer(from_fn(admin_only_middleware))
}

async fn send_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ChatbotMessageRequest>,
) -> Result<Json<ChatbotMessageResponse>, AppError> {
    Ok(Json(controller(&state).send_message(&user, request).await?))
}

async fn get_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ChatbotStatus>, AppError> {
    Ok(Json(controller(&state).status(&user).await?))
}

async fn get_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ChatbotHistoryQuery>,
) -> Result<Json<Vec<ChatbotMensaje>>, AppError> {
    Ok(Json(controller(&state).history(&user, query).await?))
}

async fn user_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatbotUserStats>>, AppError> {
    Ok(Json(controller(&state).user_stats().await?))
}

async fn update_limits(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<BulkLimitsRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    Ok(Json(controller(&state).update_limits(&user, request).await?))
}

async fn reset_messages(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    Ok(Json(controller(&state).reset_messages(user_id).await?))
}

async fn get_config(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ConfiguracionSistema>, AppError> {
    let controller = ConfigController::new(state.pool.clone());
    Ok(Json(controller.get(&key).await?))
}

async fn set_config(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<SetConfigRequest>,
) -> Result<Json<ConfiguracionSistema>, AppError> {
    let controller = ConfigController::new(state.pool.clone());
    Ok(Json(controller.set(&user, request).await?))
}
