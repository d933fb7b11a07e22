//! Modelo de Experticia
//!
//! Catálogo de tipos de análisis ofrecidos. Sólo los administradores lo
//! modifican; su ciclo de vida es independiente de las solicitudes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::validation::{trim_optional, validate_not_blank};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Experticia {
    pub id: i32,
    pub codigo: String,
    pub nombre: String,
    pub categoria: String,
    pub activa: bool,
    pub requiere_documentos: bool,
    pub descripcion: Option<String>,
    pub usuario_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperticiaRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub codigo: String,

    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub nombre: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub categoria: String,

    pub activa: Option<bool>,
    pub requiere_documentos: Option<bool>,
    pub descripcion: Option<String>,
}

impl CreateExperticiaRequest {
    pub fn normalized(mut self) -> Self {
        self.codigo = self.codigo.trim().to_uppercase();
        self.nombre = self.nombre.trim().to_string();
        self.categoria = self.categoria.trim().to_string();
        self.descripcion = trim_optional(self.descripcion);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExperticiaRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub codigo: Option<String>,

    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub nombre: Option<String>,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub categoria: Option<String>,

    pub activa: Option<bool>,
    pub requiere_documentos: Option<bool>,
    pub descripcion: Option<String>,
}

impl UpdateExperticiaRequest {
    pub fn normalized(mut self) -> Self {
        self.codigo = self.codigo.map(|c| c.trim().to_uppercase());
        self.nombre = self.nombre.map(|n| n.trim().to_string());
        self.categoria = self.categoria.map(|c| c.trim().to_string());
        self.descripcion = trim_optional(self.descripcion);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperticiaFilters {
    pub categoria: Option<String>,
    pub activa: Option<bool>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperticiaListResponse {
    pub experticias: Vec<Experticia>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codigo_is_normalized_to_uppercase() {
        let request = CreateExperticiaRequest {
            codigo: " bts-01 ".to_string(),
            nombre: "Radio bases".to_string(),
            categoria: "BTS".to_string(),
            activa: None,
            requiere_documentos: Some(true),
            descripcion: Some("  ".to_string()),
        }
        .normalized();

        assert_eq!(request.codigo, "BTS-01");
        assert_eq!(request.descripcion, None);
        assert!(request.validate().is_ok());
    }
}
