//! Controlador del chatbot
//!
//! La cuota se consume con un UPDATE condicional antes de llamar al LLM;
//! los administradores no consumen cuota.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    dto::ApiResponse,
    middleware::auth::AuthenticatedUser,
    models::{
        chatbot::{
            BulkLimitsRequest, ChatbotHistoryQuery, ChatbotMensaje, ChatbotMessageRequest,
            ChatbotMessageResponse, ChatbotStatus, ChatbotUserStats, ChatbotUserSummary,
        },
        user::User,
    },
    repositories::{ChatbotRepository, UserRepository},
    services::{
        llm_client::LlmClient,
        quota_meter::{quota_state, status_for, validate_bulk_updates, QuotaState},
    },
    utils::errors::AppError,
};

const DEFAULT_HISTORY: i64 = 50;

pub struct ChatbotController {
    users: UserRepository,
    history: ChatbotRepository,
    llm: Arc<dyn LlmClient>,
}

impl ChatbotController {
    pub fn new(pool: PgPool, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            history: ChatbotRepository::new(pool),
            llm,
        }
    }

    async fn load_user(&self, id: i32) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))
    }

    /// Reserva un mensaje de la cuota del usuario o devuelve la denegación
    async fn consume_quota(&self, user: &User) -> Result<(), AppError> {
        let state = quota_state(user);
        if let Some(err) = state.denial_error() {
            return Err(err);
        }
        if state == QuotaState::Unlimited {
            return Ok(());
        }

        let default_limit = user.chatbot_limit();
        match self
            .users
            .try_consume_chatbot_message(user.id, default_limit)
            .await?
        {
            Some(_) => Ok(()),
            None => {
                // Otra request agotó la cuota entre la lectura y el UPDATE
                let fresh = self.load_user(user.id).await?;
                Err(quota_state(&fresh).denial_error().unwrap_or_else(|| {
                    AppError::QuotaExceeded(format!(
                        "Has alcanzado el límite de {} mensajes. Contacta al administrador para aumentar tu límite.",
                        fresh.chatbot_limit()
                    ))
                }))
            }
        }
    }

    pub async fn send_message(
        &self,
        actor: &AuthenticatedUser,
        request: ChatbotMessageRequest,
    ) -> Result<ChatbotMessageResponse, AppError> {
        request.validate()?;
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::BadRequest("Se requiere un mensaje".to_string()));
        }

        let user = self.load_user(actor.id).await?;
        if let Err(e) = self.consume_quota(&user).await {
            warn!("🤖 Mensaje de chatbot denegado a {}: {}", user.username, e);
            return Err(e);
        }

        let response = self.llm.generate(message).await?;
        self.history.save_exchange(user.id, message, &response).await?;

        Ok(ChatbotMessageResponse { response })
    }

    pub async fn status(&self, actor: &AuthenticatedUser) -> Result<ChatbotStatus, AppError> {
        let user = self.load_user(actor.id).await?;
        Ok(status_for(&user))
    }

    pub async fn history(
        &self,
        actor: &AuthenticatedUser,
        query: ChatbotHistoryQuery,
    ) -> Result<Vec<ChatbotMensaje>, AppError> {
        let limit = query.limit.unwrap_or(DEFAULT_HISTORY).clamp(1, 200);
        self.history.history(actor.id, limit).await
    }

    // ===== Administración =====

    pub async fn user_stats(&self) -> Result<Vec<ChatbotUserStats>, AppError> {
        let users = self.users.list_all().await?;

        Ok(users
            .into_iter()
            .map(|user| {
                let status = status_for(&user);
                ChatbotUserStats {
                    usuario: ChatbotUserSummary {
                        id: user.id,
                        username: user.username,
                        nombre: user.nombre,
                        rol: user.rol,
                    },
                    mensajes_usados: status.mensajes_usados,
                    limite: status.limite,
                    habilitado: status.habilitado,
                }
            })
            .collect())
    }

    pub async fn update_limits(
        &self,
        actor: &AuthenticatedUser,
        request: BulkLimitsRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        let updates = validate_bulk_updates(&request.updates)?;
        self.users.bulk_update_chatbot_limits(&updates).await?;

        info!(
            "🤖 {} límites de chatbot actualizados por {}",
            updates.len(),
            actor.username
        );
        Ok(ApiResponse::message("Límites actualizados exitosamente"))
    }

    pub async fn reset_messages(&self, user_id: i32) -> Result<ApiResponse<()>, AppError> {
        if !self.users.reset_chatbot_messages(user_id).await? {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }
        Ok(ApiResponse::message("Contador de mensajes reiniciado"))
    }
}
