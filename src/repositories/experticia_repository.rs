//! Repositorio del catálogo de experticias

use sqlx::PgPool;

use crate::{
    models::experticia::{CreateExperticiaRequest, Experticia, ExperticiaFilters},
    utils::{
        errors::{map_unique_violation, AppError},
        validation::pagination,
    },
};

const DUPLICATE_CODIGO: &str = "Ya existe una experticia con ese código";

pub struct ExperticiaRepository {
    pool: PgPool,
}

impl ExperticiaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Experticia>, AppError> {
        let experticia = sqlx::query_as::<_, Experticia>("SELECT * FROM experticias WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(experticia)
    }

    pub async fn list(&self, filters: &ExperticiaFilters) -> Result<(Vec<Experticia>, i64), AppError> {
        let (limit, offset) = pagination(filters.page, filters.limit);
        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let experticias = sqlx::query_as::<_, Experticia>(
            r#"
            SELECT * FROM experticias
            WHERE ($1::text IS NULL OR categoria = $1)
              AND ($2::boolean IS NULL OR activa = $2)
              AND ($3::text IS NULL OR codigo ILIKE $3 OR nombre ILIKE $3)
            ORDER BY codigo
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&filters.categoria)
        .bind(filters.activa)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM experticias
            WHERE ($1::text IS NULL OR categoria = $1)
              AND ($2::boolean IS NULL OR activa = $2)
              AND ($3::text IS NULL OR codigo ILIKE $3 OR nombre ILIKE $3)
            "#,
        )
        .bind(&filters.categoria)
        .bind(filters.activa)
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        Ok((experticias, total.0))
    }

    pub async fn create(
        &self,
        request: &CreateExperticiaRequest,
        usuario_id: i32,
    ) -> Result<Experticia, AppError> {
        sqlx::query_as::<_, Experticia>(
            r#"
            INSERT INTO experticias (codigo, nombre, categoria, activa, requiere_documentos, descripcion, usuario_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&request.codigo)
        .bind(&request.nombre)
        .bind(&request.categoria)
        .bind(request.activa.unwrap_or(true))
        .bind(request.requiere_documentos.unwrap_or(false))
        .bind(&request.descripcion)
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_CODIGO))
    }

    pub async fn save(&self, experticia: &Experticia) -> Result<Option<Experticia>, AppError> {
        sqlx::query_as::<_, Experticia>(
            r#"
            UPDATE experticias SET
                codigo = $2, nombre = $3, categoria = $4, activa = $5,
                requiere_documentos = $6, descripcion = $7, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(experticia.id)
        .bind(&experticia.codigo)
        .bind(&experticia.nombre)
        .bind(&experticia.categoria)
        .bind(experticia.activa)
        .bind(experticia.requiere_documentos)
        .bind(&experticia.descripcion)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_CODIGO))
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM experticias WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
