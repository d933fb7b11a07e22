//! Repositorio del historial del chatbot

use sqlx::PgPool;

use crate::{models::chatbot::ChatbotMensaje, utils::errors::AppError};

pub struct ChatbotRepository {
    pool: PgPool,
}

impl ChatbotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn save_exchange(
        &self,
        usuario_id: i32,
        mensaje: &str,
        respuesta: &str,
    ) -> Result<ChatbotMensaje, AppError> {
        let registro = sqlx::query_as::<_, ChatbotMensaje>(
            r#"
            INSERT INTO chatbot_mensajes (usuario_id, mensaje, respuesta)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(mensaje)
        .bind(respuesta)
        .fetch_one(&self.pool)
        .await?;

        Ok(registro)
    }

    /// Últimos mensajes del usuario, del más reciente al más antiguo
    pub async fn history(&self, usuario_id: i32, limit: i64) -> Result<Vec<ChatbotMensaje>, AppError> {
        let mensajes = sqlx::query_as::<_, ChatbotMensaje>(
            r#"
            SELECT * FROM chatbot_mensajes
            WHERE usuario_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(usuario_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(mensajes)
    }
}
