//! Repositorio del historial de solicitudes

use sqlx::PgPool;

use crate::{
    models::historial::{AccionHistorial, HistorialSolicitud},
    utils::errors::AppError,
};

pub struct HistorialRepository {
    pool: PgPool,
}

impl HistorialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        solicitud_id: i32,
        accion: AccionHistorial,
        usuario_id: i32,
    ) -> Result<HistorialSolicitud, AppError> {
        let entrada = sqlx::query_as::<_, HistorialSolicitud>(
            r#"
            INSERT INTO historial_solicitudes (solicitud_id, accion, descripcion, usuario_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(solicitud_id)
        .bind(accion.as_str())
        .bind(accion.descripcion())
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(entrada)
    }

    pub async fn list_for_solicitud(
        &self,
        solicitud_id: i32,
    ) -> Result<Vec<HistorialSolicitud>, AppError> {
        let entradas = sqlx::query_as::<_, HistorialSolicitud>(
            r#"
            SELECT * FROM historial_solicitudes
            WHERE solicitud_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(solicitud_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entradas)
    }
}
