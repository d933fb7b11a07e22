//! Repositorio de usuarios
//!
//! Consultas sobre la tabla users: CRUD administrativo, contador de intentos
//! fallidos, suspensiones, sesión única y contadores del chatbot.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    models::{
        chatbot::LimitUpdate,
        user::{User, UserFilters, UserStatus},
    },
    utils::{
        errors::{map_unique_violation, AppError},
        validation::pagination,
    },
};

const DUPLICATE_USERNAME: &str = "El nombre de usuario ya existe";

/// Datos para insertar un usuario (password ya hasheado)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub nombre: String,
    pub email: Option<String>,
    pub rol: String,
    pub coordinacion: Option<String>,
    pub activo: bool,
    pub status: UserStatus,
    pub tiempo_suspension: Option<DateTime<Utc>>,
    pub motivo_suspension: Option<String>,
    pub direccion_ip: Option<String>,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list(&self, filters: &UserFilters) -> Result<(Vec<User>, i64), AppError> {
        let (limit, offset) = pagination(filters.page, filters.limit);
        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::text IS NULL OR username ILIKE $1 OR nombre ILIKE $1 OR email ILIKE $1)
              AND ($2::user_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR rol = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&search)
        .bind(filters.status)
        .bind(&filters.rol)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::text IS NULL OR username ILIKE $1 OR nombre ILIKE $1 OR email ILIKE $1)
              AND ($2::user_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR rol = $3)
            "#,
        )
        .bind(&search)
        .bind(filters.status)
        .bind(&filters.rol)
        .fetch_one(&self.pool)
        .await?;

        Ok((users, total.0))
    }

    pub async fn create(&self, new_user: &NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                username, password, nombre, email, rol, coordinacion, activo, status,
                tiempo_suspension, motivo_suspension, fecha_suspension, direccion_ip
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    CASE WHEN $8 = 'suspendido'::user_status THEN now() END, $11)
            RETURNING *
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.nombre)
        .bind(&new_user.email)
        .bind(&new_user.rol)
        .bind(&new_user.coordinacion)
        .bind(new_user.activo)
        .bind(new_user.status)
        .bind(new_user.tiempo_suspension)
        .bind(&new_user.motivo_suspension)
        .bind(&new_user.direccion_ip)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_USERNAME))
    }

    /// Persiste los campos editables por un administrador
    pub async fn save_profile(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                username = $2, password = $3, nombre = $4, email = $5, rol = $6,
                coordinacion = $7, activo = $8, status = $9, fecha_suspension = $10,
                tiempo_suspension = $11, motivo_suspension = $12, direccion_ip = $13,
                session_token = $14, session_expires = $15
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.nombre)
        .bind(&user.email)
        .bind(&user.rol)
        .bind(&user.coordinacion)
        .bind(user.activo)
        .bind(user.status)
        .bind(user.fecha_suspension)
        .bind(user.tiempo_suspension)
        .bind(&user.motivo_suspension)
        .bind(&user.direccion_ip)
        .bind(&user.session_token)
        .bind(user.session_expires)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_USERNAME))?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Crea el usuario si no existe ninguno con ese username
    pub async fn create_if_missing(&self, new_user: &NewUser) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, nombre, email, rol)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.nombre)
        .bind(&new_user.email)
        .bind(&new_user.rol)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // ===== Intentos fallidos y suspensiones =====

    /// Incrementa el contador y devuelve el nuevo valor
    pub async fn increment_failed_attempts(&self, id: i32) -> Result<i32, AppError> {
        let row: (i32,) = sqlx::query_as(
            r#"
            UPDATE users
            SET intentos_fallidos = intentos_fallidos + 1, ultimo_intento_fallido = now()
            WHERE id = $1
            RETURNING intentos_fallidos
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    pub async fn suspend(
        &self,
        id: i32,
        until: DateTime<Utc>,
        reason: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET status = 'suspendido', fecha_suspension = now(), tiempo_suspension = $2,
                motivo_suspension = $3, intentos_fallidos = 0,
                session_token = NULL, session_expires = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(until)
        .bind(reason)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Levanta la suspensión de un usuario si ya venció; devuelve si cambió
    pub async fn lift_suspension_if_expired(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET status = 'activo', fecha_suspension = NULL, tiempo_suspension = NULL,
                motivo_suspension = NULL
            WHERE id = $1 AND status = 'suspendido' AND tiempo_suspension <= now()
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Levanta todas las suspensiones vencidas y devuelve los usuarios afectados
    pub async fn lift_expired_suspensions(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET status = 'activo', fecha_suspension = NULL, tiempo_suspension = NULL,
                motivo_suspension = NULL
            WHERE status = 'suspendido' AND tiempo_suspension <= now()
            RETURNING *
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Login exitoso: resetea intentos, registra acceso y abre la sesión
    pub async fn start_session(
        &self,
        id: i32,
        ip: &str,
        token: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET intentos_fallidos = 0, ultimo_intento_fallido = NULL,
                ultimo_acceso = now(), direccion_ip = $2,
                session_token = $3, session_expires = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(ip)
        .bind(token)
        .bind(expires)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn clear_session(&self, id: i32) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET session_token = NULL, session_expires = NULL WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Usuarios con una sesión vigente
    pub async fn count_active_sessions(&self) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users WHERE session_token IS NOT NULL AND session_expires > now()",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    // ===== Chatbot =====

    /// Incremento atómico del contador del chatbot. Devuelve el nuevo valor,
    /// o `None` si el chatbot está deshabilitado o se alcanzó el límite.
    pub async fn try_consume_chatbot_message(
        &self,
        id: i32,
        default_limit: i32,
    ) -> Result<Option<i32>, AppError> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            UPDATE users
            SET chatbot_mensajes_usados = chatbot_mensajes_usados + 1
            WHERE id = $1
              AND chatbot_habilitado
              AND chatbot_mensajes_usados < COALESCE(chatbot_limite_mensajes, $2)
            RETURNING chatbot_mensajes_usados
            "#,
        )
        .bind(id)
        .bind(default_limit)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.0))
    }

    pub async fn reset_chatbot_messages(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET chatbot_mensajes_usados = 0, chatbot_reseteo_mensajes = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Aplica todas las actualizaciones en una sola transacción
    pub async fn bulk_update_chatbot_limits(&self, updates: &[LimitUpdate]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for update in updates {
            sqlx::query(
                "UPDATE users SET chatbot_limite_mensajes = $2, chatbot_habilitado = $3 WHERE id = $1",
            )
            .bind(update.user_id)
            .bind(update.limite)
            .bind(update.habilitado)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY nombre")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}
