//! Repositorio de notificaciones

use sqlx::PgPool;

use crate::{
    models::notification::{Notificacion, NotificacionDetalle},
    utils::errors::AppError,
};

pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        usuario_id: i32,
        solicitud_id: Option<i32>,
        mensaje: &str,
    ) -> Result<Notificacion, AppError> {
        let notificacion = sqlx::query_as::<_, Notificacion>(
            r#"
            INSERT INTO notificaciones (usuario_id, solicitud_id, mensaje)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(solicitud_id)
        .bind(mensaje)
        .fetch_one(&self.pool)
        .await?;

        Ok(notificacion)
    }

    /// Crea la misma notificación para todos los administradores; devuelve
    /// cuántas se crearon
    pub async fn notify_admins(
        &self,
        solicitud_id: Option<i32>,
        mensaje: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO notificaciones (usuario_id, solicitud_id, mensaje)
            SELECT id, $1, $2 FROM users WHERE rol = 'admin'
            "#,
        )
        .bind(solicitud_id)
        .bind(mensaje)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_for_user(&self, usuario_id: i32) -> Result<Vec<NotificacionDetalle>, AppError> {
        let notificaciones = sqlx::query_as::<_, NotificacionDetalle>(
            r#"
            SELECT n.id, n.solicitud_id, n.mensaje, n.leida, n.created_at,
                   s.numero_solicitud, s.estado
            FROM notificaciones n
            LEFT JOIN solicitudes s ON s.id = n.solicitud_id
            WHERE n.usuario_id = $1
            ORDER BY n.created_at DESC
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notificaciones)
    }

    /// Marca como leída sólo si pertenece al usuario
    pub async fn mark_as_read(&self, id: i32, usuario_id: i32) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE notificaciones SET leida = TRUE WHERE id = $1 AND usuario_id = $2")
                .bind(id)
                .bind(usuario_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn unread_count(&self, usuario_id: i32) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notificaciones WHERE usuario_id = $1 AND NOT leida",
        )
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// Borra notificaciones antiguas con retención distinta para admins.
    /// Devuelve (borradas de admins, borradas del resto).
    pub async fn cleanup_old(
        &self,
        admin_retention_hours: i64,
        user_retention_hours: i64,
    ) -> Result<(u64, u64), AppError> {
        let admins = sqlx::query(
            r#"
            DELETE FROM notificaciones n
            USING users u
            WHERE u.id = n.usuario_id AND u.rol = 'admin'
              AND n.created_at < now() - make_interval(hours => $1::int)
            "#,
        )
        .bind(admin_retention_hours as i32)
        .execute(&self.pool)
        .await?;

        let others = sqlx::query(
            r#"
            DELETE FROM notificaciones n
            WHERE n.created_at < now() - make_interval(hours => $1::int)
              AND NOT EXISTS (
                  SELECT 1 FROM users u WHERE u.id = n.usuario_id AND u.rol = 'admin'
              )
            "#,
        )
        .bind(user_retention_hours as i32)
        .execute(&self.pool)
        .await?;

        Ok((admins.rows_affected(), others.rows_affected()))
    }
}
