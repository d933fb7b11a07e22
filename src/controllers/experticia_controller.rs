//! Controlador del catálogo de experticias

use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::{
    dto::ApiResponse,
    middleware::auth::AuthenticatedUser,
    models::experticia::{
        CreateExperticiaRequest, Experticia, ExperticiaFilters, ExperticiaListResponse,
        UpdateExperticiaRequest,
    },
    repositories::ExperticiaRepository,
    utils::errors::{not_found_error, AppError},
};

pub struct ExperticiaController {
    repository: ExperticiaRepository,
}

impl ExperticiaController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ExperticiaRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: ExperticiaFilters) -> Result<ExperticiaListResponse, AppError> {
        let (experticias, total) = self.repository.list(&filters).await?;
        Ok(ExperticiaListResponse { experticias, total })
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Experticia, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Experticia", id))
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateExperticiaRequest,
    ) -> Result<ApiResponse<Experticia>, AppError> {
        let request = request.normalized();
        request.validate()?;

        let experticia = self.repository.create(&request, actor.id).await?;
        info!("🧪 Experticia {} creada por {}", experticia.codigo, actor.username);

        Ok(ApiResponse::success_with_message(
            experticia,
            "Experticia creada exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateExperticiaRequest,
    ) -> Result<ApiResponse<Experticia>, AppError> {
        let request = request.normalized();
        request.validate()?;

        let mut experticia = self.get_by_id(id).await?;
        if let Some(codigo) = request.codigo {
            experticia.codigo = codigo;
        }
        if let Some(nombre) = request.nombre {
            experticia.nombre = nombre;
        }
        if let Some(categoria) = request.categoria {
            experticia.categoria = categoria;
        }
        if let Some(activa) = request.activa {
            experticia.activa = activa;
        }
        if let Some(requiere) = request.requiere_documentos {
            experticia.requiere_documentos = requiere;
        }
        if request.descripcion.is_some() {
            experticia.descripcion = request.descripcion;
        }

        let experticia = self
            .repository
            .save(&experticia)
            .await?
            .ok_or_else(|| not_found_error("Experticia", id))?;

        Ok(ApiResponse::success_with_message(
            experticia,
            "Experticia actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: i32) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Experticia", id));
        }
        Ok(ApiResponse::message("Experticia eliminada exitosamente"))
    }
}
