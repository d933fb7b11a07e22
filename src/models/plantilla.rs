use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::solicitud::Operador;
use crate::utils::validation::validate_not_blank;

/// Plantilla de correo por operadora
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlantillaCorreo {
    pub id: i32,
    pub nombre: String,
    pub operador: Operador,
    pub asunto: String,
    pub cuerpo: String,
    pub usuario_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlantillaRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub nombre: String,
    pub operador: Operador,
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub asunto: String,
    #[validate(custom = "validate_not_blank")]
    pub cuerpo: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlantillaRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub nombre: Option<String>,
    pub operador: Option<Operador>,
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub asunto: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub cuerpo: Option<String>,
}
