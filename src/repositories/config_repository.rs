//! Repositorio de configuración clave/valor

use sqlx::PgPool;

use crate::{models::config::ConfiguracionSistema, utils::errors::AppError};

pub struct ConfigRepository {
    pool: PgPool,
}

impl ConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, clave: &str) -> Result<Option<ConfiguracionSistema>, AppError> {
        let entrada = sqlx::query_as::<_, ConfiguracionSistema>(
            "SELECT * FROM configuracion_sistema WHERE clave = $1",
        )
        .bind(clave)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entrada)
    }

    /// Inserta o reemplaza el valor de una clave
    pub async fn upsert(
        &self,
        clave: &str,
        valor: &str,
        descripcion: Option<&str>,
        usuario_id: i32,
    ) -> Result<ConfiguracionSistema, AppError> {
        let entrada = sqlx::query_as::<_, ConfiguracionSistema>(
            r#"
            INSERT INTO configuracion_sistema (clave, valor, descripcion, usuario_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (clave) DO UPDATE SET
                valor = EXCLUDED.valor,
                descripcion = COALESCE(EXCLUDED.descripcion, configuracion_sistema.descripcion),
                usuario_id = EXCLUDED.usuario_id,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(clave)
        .bind(valor)
        .bind(descripcion)
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(entrada)
    }
}
