//! Controlador de autenticación
//!
//! Login con sesión única, bloqueo por intentos fallidos y logout.

use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::{
    config::SuspensionPolicy,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::{LoginRequest, LoginResponse, PermissionsResponse, UserInfo},
        user::User,
    },
    repositories::{NotificationRepository, UserRepository},
    services::{
        background_tasks::notify_suspension_lifted,
        notification_messages,
        suspension_gate::{
            auto_suspension_end, auto_suspension_message, auto_suspension_reason,
            evaluate_login, FailedAttemptOutcome,
        },
    },
    utils::{
        errors::AppError,
        jwt::{generate_token, JwtConfig},
        password::{dummy_verify, verify_password},
    },
};

const INVALID_CREDENTIALS: &str = "Credenciales inválidas";
const SESSION_ALREADY_ACTIVE: &str =
    "Ya tienes una sesión activa. Cierra la sesión actual antes de iniciar una nueva.";

pub struct AuthController {
    users: UserRepository,
    notifications: NotificationRepository,
    jwt: JwtConfig,
    policy: SuspensionPolicy,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: JwtConfig, policy: SuspensionPolicy) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool),
            jwt,
            policy,
        }
    }

    pub async fn login(&self, request: LoginRequest, ip: &str) -> Result<LoginResponse, AppError> {
        let username = request.username.trim();

        let Some(user) = self.users.find_by_username(username).await? else {
            dummy_verify(&request.password);
            warn!("🔒 Login fallido para usuario inexistente desde {}", ip);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let now = Utc::now();
        let gate = evaluate_login(&user, now);

        if gate.suspension_expired && self.users.lift_suspension_if_expired(user.id).await? {
            info!("🔓 Suspensión vencida levantada al iniciar sesión: {}", user.username);
            if let Err(e) = notify_suspension_lifted(&self.notifications, &user).await {
                error!("❌ Error notificando reactivación de {}: {}", user.username, e);
            }
        }

        if let Some(denial) = gate.denial {
            warn!("🚫 Login denegado para {}: {:?}", user.username, denial);
            return Err(AppError::Unauthorized(denial.message()));
        }

        if !verify_password(&request.password, &user.password)? {
            return Err(self.register_failed_attempt(&user, ip).await?);
        }

        if user.has_active_session(now) {
            warn!("⚠️ {} intentó abrir una segunda sesión", user.username);
            return Err(AppError::Unauthorized(SESSION_ALREADY_ACTIVE.to_string()));
        }

        let issued = generate_token(user.id, &user.username, &user.rol, &self.jwt, now)?;
        self.users
            .start_session(user.id, ip, &issued.token, issued.expires_at)
            .await?;

        info!("✅ Login exitoso: {} desde {}", user.username, ip);

        Ok(LoginResponse {
            token: issued.token,
            user: UserInfo::from(&user),
        })
    }

    /// Incrementa el contador y suspende al alcanzar el umbral. Devuelve el
    /// error a responder.
    async fn register_failed_attempt(
        &self,
        user: &User,
        ip: &str,
    ) -> Result<AppError, AppError> {
        let username = user.username.as_str();
        let counter = self.users.increment_failed_attempts(user.id).await?;
        let outcome = FailedAttemptOutcome::from_counter(counter, &self.policy);

        if !outcome.auto_suspended {
            warn!(
                "🔒 Contraseña incorrecta para {} ({} intentos) desde {}",
                username, outcome.new_counter, ip
            );
            return Ok(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let until = auto_suspension_end(Utc::now(), &self.policy);
        self.users
            .suspend(user.id, until, &auto_suspension_reason(&self.policy))
            .await?;
        warn!("⛔ Cuenta {} suspendida hasta {} por intentos fallidos", username, until);

        let mensaje = notification_messages::security_suspension_for_admins(&user.nombre, username, ip);
        if let Err(e) = self.notifications.notify_admins(None, &mensaje).await {
            error!("❌ Error notificando suspensión de {}: {}", username, e);
        }

        Ok(AppError::Unauthorized(auto_suspension_message(&self.policy)))
    }

    pub async fn logout(&self, user: &AuthenticatedUser) -> Result<(), AppError> {
        self.users.clear_session(user.id).await?;
        info!("👋 Sesión cerrada: {}", user.username);
        Ok(())
    }

    pub async fn me(&self, user: &AuthenticatedUser) -> Result<UserInfo, AppError> {
        let user = self
            .users
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        Ok(UserInfo::from(&user))
    }

    pub fn permissions(user: &AuthenticatedUser) -> PermissionsResponse {
        PermissionsResponse {
            rol: user.rol.clone(),
            permissions: user.capabilities,
        }
    }
}
