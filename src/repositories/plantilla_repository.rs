//! Repositorio de plantillas de correo

use sqlx::PgPool;

use crate::{
    models::plantilla::{CreatePlantillaRequest, PlantillaCorreo},
    utils::errors::AppError,
};

pub struct PlantillaRepository {
    pool: PgPool,
}

impl PlantillaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<PlantillaCorreo>, AppError> {
        let plantillas = sqlx::query_as::<_, PlantillaCorreo>(
            "SELECT * FROM plantillas_correo ORDER BY operador, nombre",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(plantillas)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<PlantillaCorreo>, AppError> {
        let plantilla =
            sqlx::query_as::<_, PlantillaCorreo>("SELECT * FROM plantillas_correo WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(plantilla)
    }

    pub async fn create(
        &self,
        request: &CreatePlantillaRequest,
        usuario_id: i32,
    ) -> Result<PlantillaCorreo, AppError> {
        let plantilla = sqlx::query_as::<_, PlantillaCorreo>(
            r#"
            INSERT INTO plantillas_correo (nombre, operador, asunto, cuerpo, usuario_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.nombre.trim())
        .bind(request.operador)
        .bind(request.asunto.trim())
        .bind(&request.cuerpo)
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(plantilla)
    }

    pub async fn save(&self, plantilla: &PlantillaCorreo) -> Result<Option<PlantillaCorreo>, AppError> {
        let plantilla = sqlx::query_as::<_, PlantillaCorreo>(
            r#"
            UPDATE plantillas_correo
            SET nombre = $2, operador = $3, asunto = $4, cuerpo = $5, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(plantilla.id)
        .bind(&plantilla.nombre)
        .bind(plantilla.operador)
        .bind(&plantilla.asunto)
        .bind(&plantilla.cuerpo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plantilla)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM plantillas_correo WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
