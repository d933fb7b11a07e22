//! Repositorio de solicitudes

use sqlx::PgPool;

use crate::{
    dto::dashboard_dto::{DashboardStats, OperadorCount},
    models::solicitud::{CreateSolicitudRequest, EstadoSolicitud, Solicitud, SolicitudFilters},
    utils::{
        errors::{map_unique_violation, AppError},
        validation::pagination,
    },
};

/// Mensaje cuando el número de solicitud choca con la restricción única
pub const DUPLICATE_NUMERO: &str =
    "El número de solicitud ya existe. Por favor, ingrese un número único.";

pub struct SolicitudRepository {
    pool: PgPool,
}

impl SolicitudRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Solicitud>, AppError> {
        let solicitud = sqlx::query_as::<_, Solicitud>("SELECT * FROM solicitudes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(solicitud)
    }

    pub async fn find_by_numero(&self, numero: &str) -> Result<Option<Solicitud>, AppError> {
        let solicitud =
            sqlx::query_as::<_, Solicitud>("SELECT * FROM solicitudes WHERE numero_solicitud = $1")
                .bind(numero)
                .fetch_optional(&self.pool)
                .await?;

        Ok(solicitud)
    }

    /// Lista paginada; `coordinacion` restringe a una coordinación concreta
    pub async fn list(
        &self,
        filters: &SolicitudFilters,
        coordinacion: Option<&str>,
    ) -> Result<(Vec<Solicitud>, i64), AppError> {
        let (limit, offset) = pagination(filters.page, filters.limit);
        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        const WHERE: &str = r#"
            WHERE ($1::operador IS NULL OR operador = $1)
              AND ($2::estado_solicitud IS NULL OR estado = $2)
              AND ($3::text IS NULL OR tipo_experticia = $3)
              AND ($4::text IS NULL OR coordinacion_solicitante = $4)
              AND ($5::text IS NULL OR numero_solicitud ILIKE $5
                   OR numero_expediente ILIKE $5 OR fiscal ILIKE $5)
        "#;

        let solicitudes = sqlx::query_as::<_, Solicitud>(&format!(
            "SELECT * FROM solicitudes {} ORDER BY created_at DESC LIMIT $6 OFFSET $7",
            WHERE
        ))
        .bind(filters.operador)
        .bind(filters.estado)
        .bind(&filters.tipo_experticia)
        .bind(coordinacion)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM solicitudes {}", WHERE))
            .bind(filters.operador)
            .bind(filters.estado)
            .bind(&filters.tipo_experticia)
            .bind(coordinacion)
            .bind(&search)
            .fetch_one(&self.pool)
            .await?;

        Ok((solicitudes, total.0))
    }

    pub async fn create(
        &self,
        request: &CreateSolicitudRequest,
        estado: EstadoSolicitud,
        usuario_id: i32,
    ) -> Result<Solicitud, AppError> {
        sqlx::query_as::<_, Solicitud>(
            r#"
            INSERT INTO solicitudes (
                numero_solicitud, numero_expediente, fiscal, tipo_experticia,
                coordinacion_solicitante, operador, informacion_linea, direc, delito,
                descripcion, motivo_rechazo, estado, fecha_respuesta, oficio, usuario_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(&request.numero_solicitud)
        .bind(&request.numero_expediente)
        .bind(&request.fiscal)
        .bind(&request.tipo_experticia)
        .bind(&request.coordinacion_solicitante)
        .bind(request.operador)
        .bind(&request.informacion_linea)
        .bind(&request.direc)
        .bind(&request.delito)
        .bind(&request.descripcion)
        .bind(&request.motivo_rechazo)
        .bind(estado)
        .bind(request.fecha_respuesta)
        .bind(&request.oficio)
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_NUMERO))
    }

    /// Persiste una solicitud ya fusionada con los cambios
    pub async fn save(&self, solicitud: &Solicitud) -> Result<Option<Solicitud>, AppError> {
        sqlx::query_as::<_, Solicitud>(
            r#"
            UPDATE solicitudes SET
                numero_solicitud = $2, numero_expediente = $3, fiscal = $4,
                tipo_experticia = $5, coordinacion_solicitante = $6, operador = $7,
                informacion_linea = $8, direc = $9, delito = $10, descripcion = $11,
                motivo_rechazo = $12, estado = $13, fecha_respuesta = $14, oficio = $15,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(solicitud.id)
        .bind(&solicitud.numero_solicitud)
        .bind(&solicitud.numero_expediente)
        .bind(&solicitud.fiscal)
        .bind(&solicitud.tipo_experticia)
        .bind(&solicitud.coordinacion_solicitante)
        .bind(solicitud.operador)
        .bind(&solicitud.informacion_linea)
        .bind(&solicitud.direc)
        .bind(&solicitud.delito)
        .bind(&solicitud.descripcion)
        .bind(&solicitud.motivo_rechazo)
        .bind(solicitud.estado)
        .bind(solicitud.fecha_respuesta)
        .bind(&solicitud.oficio)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_NUMERO))
    }

    /// Elimina la solicitud junto con sus notificaciones e historial
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM notificaciones WHERE solicitud_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM historial_solicitudes WHERE solicitud_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM solicitudes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Estadísticas del dashboard; `owner` limita a las solicitudes de un usuario
    pub async fn dashboard_stats(&self, owner: Option<i32>) -> Result<DashboardStats, AppError> {
        let counts: (i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE estado = 'pendiente'),
                COUNT(*) FILTER (WHERE estado = 'enviada'),
                COUNT(*) FILTER (WHERE estado = 'respondida'),
                COUNT(*) FILTER (WHERE estado = 'rechazada')
            FROM solicitudes
            WHERE ($1::int IS NULL OR usuario_id = $1)
            "#,
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        let solicitudes_por_operador = sqlx::query_as::<_, OperadorCount>(
            r#"
            SELECT operador::text AS operador, COUNT(*) AS total
            FROM solicitudes
            WHERE ($1::int IS NULL OR usuario_id = $1)
            GROUP BY operador
            ORDER BY operador
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        let actividad_reciente = sqlx::query_as::<_, Solicitud>(
            r#"
            SELECT * FROM solicitudes
            WHERE ($1::int IS NULL OR usuario_id = $1)
            ORDER BY created_at DESC
            LIMIT 5
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_solicitudes: counts.0,
            pendientes: counts.1,
            enviadas: counts.2,
            respondidas: counts.3,
            rechazadas: counts.4,
            solicitudes_por_operador,
            actividad_reciente,
        })
    }
}
