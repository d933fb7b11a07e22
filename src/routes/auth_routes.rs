use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::{
    controllers::auth_controller::AuthController,
    dto::ApiResponse,
    middleware::{auth_middleware, login_rate_limit_middleware, AuthenticatedUser, ClientIp},
    models::auth::{LoginRequest, LoginResponse, PermissionsResponse, UserInfo},
    state::AppState,
    utils::errors::AppError,
};

/// Rutas de autenticación. `/login` es pública y con rate limit; el resto
/// requiere sesión.
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/login", post(login))
        .route_layer(from_fn_with_state(state.clone(), login_rate_limit_middleware));

    let session = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/permissions", get(permissions))
        .route_layer(from_fn_with_state(state, auth_middleware));

    public.merge(session)
}

fn controller(state: &AppState) -> AuthController {
    AuthController::new(
        state.pool.clone(),
        state.jwt.clone(),
        state.config.suspension,
    )
}

async fn login(
    State(state): State<AppState>,
    Extension(ClientIp(ip)): Extension<ClientIp>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validator::Validate::validate(&request)?;
    let response = controller(&state).login(request, &ip).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    controller(&state).logout(&user).await?;
    Ok(Json(ApiResponse::message("Sesión cerrada exitosamente")))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserInfo>, AppError> {
    Ok(Json(controller(&state).me(&user).await?))
}

async fn permissions(Extension(user): Extension<AuthenticatedUser>) -> Json<PermissionsResponse> {
    Json(AuthController::permissions(&user))
}
