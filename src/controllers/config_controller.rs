//! Controlador de configuración del sistema

use sqlx::PgPool;
use validator::Validate;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::config::{ConfiguracionSistema, DownloadFormat, SetConfigRequest, DOWNLOAD_FORMAT_KEY},
    repositories::ConfigRepository,
    utils::errors::AppError,
};

pub struct ConfigController {
    repository: ConfigRepository,
}

impl ConfigController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ConfigRepository::new(pool),
        }
    }

    pub async fn get(&self, clave: &str) -> Result<ConfiguracionSistema, AppError> {
        self.repository
            .get(clave)
            .await?
            .ok_or_else(|| AppError::NotFound("Configuración no encontrada".to_string()))
    }

    pub async fn set(
        &self,
        actor: &AuthenticatedUser,
        request: SetConfigRequest,
    ) -> Result<ConfiguracionSistema, AppError> {
        request.validate()?;
        self.repository
            .upsert(
                request.clave.trim(),
                &request.valor,
                request.descripcion.as_deref(),
                actor.id,
            )
            .await
    }

    /// Sin valor guardado se descarga en Word
    pub async fn download_format(&self) -> Result<DownloadFormat, AppError> {
        Ok(self
            .repository
            .get(DOWNLOAD_FORMAT_KEY)
            .await?
            .map(|entrada| DownloadFormat::from_stored(&entrada.valor))
            .unwrap_or_default())
    }

    pub async fn set_download_format(
        &self,
        actor: &AuthenticatedUser,
        format: DownloadFormat,
    ) -> Result<DownloadFormat, AppError> {
        let entrada = self
            .repository
            .upsert(
                DOWNLOAD_FORMAT_KEY,
                format.as_stored(),
                Some("Formato de descarga de documentos"),
                actor.id,
            )
            .await?;

        Ok(DownloadFormat::from_stored(&entrada.valor))
    }
}
