use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Clave bajo la que se persiste el formato de descarga de documentos
pub const DOWNLOAD_FORMAT_KEY: &str = "download_format";

/// Entrada de la tabla configuracion_sistema
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguracionSistema {
    pub id: i32,
    pub clave: String,
    pub valor: String,
    pub descripcion: Option<String>,
    pub usuario_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetConfigRequest {
    #[validate(length(min = 1, max = 100, message = "Clave y valor son requeridos"))]
    pub clave: String,
    #[validate(length(min = 1, message = "Clave y valor son requeridos"))]
    pub valor: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFormat {
    pub download_as_pdf: bool,
}

impl DownloadFormat {
    pub fn from_stored(valor: &str) -> Self {
        Self {
            download_as_pdf: valor == "pdf",
        }
    }

    pub fn as_stored(&self) -> &'static str {
        if self.download_as_pdf {
            "pdf"
        } else {
            "docx"
        }
    }
}
