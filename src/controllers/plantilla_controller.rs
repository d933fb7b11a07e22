//! Controlador de plantillas de correo

use sqlx::PgPool;
use validator::Validate;

use crate::{
    dto::ApiResponse,
    middleware::auth::AuthenticatedUser,
    models::plantilla::{CreatePlantillaRequest, PlantillaCorreo, UpdatePlantillaRequest},
    repositories::PlantillaRepository,
    utils::errors::{not_found_error, AppError},
};

pub struct PlantillaController {
    repository: PlantillaRepository,
}

impl PlantillaController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PlantillaRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<PlantillaCorreo>, AppError> {
        self.repository.list().await
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreatePlantillaRequest,
    ) -> Result<ApiResponse<PlantillaCorreo>, AppError> {
        request.validate()?;
        let plantilla = self.repository.create(&request, actor.id).await?;

        Ok(ApiResponse::success_with_message(
            plantilla,
            "Plantilla creada exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdatePlantillaRequest,
    ) -> Result<ApiResponse<PlantillaCorreo>, AppError> {
        request.validate()?;

        let mut plantilla = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Plantilla", id))?;

        if let Some(nombre) = request.nombre {
            plantilla.nombre = nombre.trim().to_string();
        }
        if let Some(operador) = request.operador {
            plantilla.operador = operador;
        }
        if let Some(asunto) = request.asunto {
            plantilla.asunto = asunto.trim().to_string();
        }
        if let Some(cuerpo) = request.cuerpo {
            plantilla.cuerpo = cuerpo;
        }

        let plantilla = self
            .repository
            .save(&plantilla)
            .await?
            .ok_or_else(|| not_found_error("Plantilla", id))?;

        Ok(ApiResponse::success_with_message(
            plantilla,
            "Plantilla actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: i32) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Plantilla", id));
        }
        Ok(ApiResponse::message("Plantilla eliminada exitosamente"))
    }
}
