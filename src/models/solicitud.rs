//! Modelo de Solicitud
//!
//! Este módulo contiene el struct Solicitud (petición a una operadora
//! telefónica), sus enums de estado y operador, y los requests de la API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;

use crate::utils::validation::{
    trim_optional, validate_coordinacion, validate_not_blank, validate_tipo_experticia,
};

/// Estado de una solicitud - mapea al ENUM estado_solicitud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "estado_solicitud", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstadoSolicitud {
    #[serde(alias = "procesando")]
    Pendiente,
    Enviada,
    Respondida,
    Rechazada,
}

impl EstadoSolicitud {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoSolicitud::Pendiente => "pendiente",
            EstadoSolicitud::Enviada => "enviada",
            EstadoSolicitud::Respondida => "respondida",
            EstadoSolicitud::Rechazada => "rechazada",
        }
    }

    /// Etiqueta legible usada en notificaciones
    pub fn label(&self) -> &'static str {
        match self {
            EstadoSolicitud::Pendiente => "Pendiente",
            EstadoSolicitud::Enviada => "Enviada",
            EstadoSolicitud::Respondida => "Respondida",
            EstadoSolicitud::Rechazada => "Rechazada",
        }
    }
}

/// Operadora telefónica - mapea al ENUM operador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "operador", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Operador {
    Digitel,
    Movistar,
    Movilnet,
}

impl Operador {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operador::Digitel => "digitel",
            Operador::Movistar => "movistar",
            Operador::Movilnet => "movilnet",
        }
    }
}

/// Solicitud principal - mapea exactamente a la tabla solicitudes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Solicitud {
    pub id: i32,
    pub numero_solicitud: String,
    pub numero_expediente: String,
    pub fiscal: Option<String>,
    pub tipo_experticia: String,
    pub coordinacion_solicitante: String,
    pub operador: Operador,
    pub informacion_linea: Option<String>,
    pub direc: Option<String>,
    pub delito: Option<String>,
    pub descripcion: Option<String>,
    pub motivo_rechazo: Option<String>,
    pub estado: EstadoSolicitud,
    pub fecha_solicitud: DateTime<Utc>,
    pub fecha_respuesta: Option<DateTime<Utc>>,
    pub oficio: Option<String>,
    pub usuario_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Solicitud {
    /// Cambia el estado. Al salir de `rechazada` el motivo deja de aplicar.
    pub fn set_estado(&mut self, estado: EstadoSolicitud) {
        if self.estado == EstadoSolicitud::Rechazada && estado != EstadoSolicitud::Rechazada {
            self.motivo_rechazo = None;
        }
        self.estado = estado;
    }
}

/// Request para crear una solicitud
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSolicitudRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub numero_solicitud: String,

    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub numero_expediente: String,

    #[validate(length(min = 1, max = 100))]
    pub fiscal: Option<String>,

    #[validate(custom = "validate_tipo_experticia")]
    pub tipo_experticia: String,

    #[validate(custom = "validate_coordinacion")]
    pub coordinacion_solicitante: String,

    pub operador: Operador,

    pub informacion_linea: Option<String>,
    pub direc: Option<String>,
    pub delito: Option<String>,
    pub descripcion: Option<String>,
    pub motivo_rechazo: Option<String>,
    pub estado: Option<EstadoSolicitud>,
    pub fecha_respuesta: Option<DateTime<Utc>>,
    pub oficio: Option<String>,
}

impl CreateSolicitudRequest {
    /// Recorta espacios de los campos de texto antes de validar
    pub fn normalized(mut self) -> Self {
        self.numero_solicitud = self.numero_solicitud.trim().to_string();
        self.numero_expediente = self.numero_expediente.trim().to_string();
        self.fiscal = trim_optional(self.fiscal);
        self.informacion_linea = trim_optional(self.informacion_linea);
        self.direc = trim_optional(self.direc);
        self.delito = trim_optional(self.delito);
        self.descripcion = trim_optional(self.descripcion);
        self.motivo_rechazo = trim_optional(self.motivo_rechazo);
        self.oficio = trim_optional(self.oficio);
        self
    }
}

/// Request para actualizar una solicitud (todos los campos opcionales)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSolicitudRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub numero_solicitud: Option<String>,

    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub numero_expediente: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub fiscal: Option<String>,

    #[validate(custom = "validate_tipo_experticia")]
    pub tipo_experticia: Option<String>,

    #[validate(custom = "validate_coordinacion")]
    pub coordinacion_solicitante: Option<String>,

    pub operador: Option<Operador>,

    pub informacion_linea: Option<String>,
    pub direc: Option<String>,
    pub delito: Option<String>,
    pub descripcion: Option<String>,
    pub motivo_rechazo: Option<String>,
    pub estado: Option<EstadoSolicitud>,
    pub fecha_respuesta: Option<DateTime<Utc>>,
    pub oficio: Option<String>,
}

impl UpdateSolicitudRequest {
    pub fn normalized(mut self) -> Self {
        self.numero_solicitud = self.numero_solicitud.map(|v| v.trim().to_string());
        self.numero_expediente = self.numero_expediente.map(|v| v.trim().to_string());
        self.fiscal = trim_optional(self.fiscal);
        self.motivo_rechazo = trim_optional(self.motivo_rechazo);
        self
    }

    /// Copia los campos presentes sobre la solicitud. El estado no se toca:
    /// lo decide la política de ciclo de vida.
    pub fn apply_to(self, solicitud: &mut Solicitud) {
        if let Some(v) = self.numero_solicitud {
            solicitud.numero_solicitud = v;
        }
        if let Some(v) = self.numero_expediente {
            solicitud.numero_expediente = v;
        }
        if let Some(v) = self.tipo_experticia {
            solicitud.tipo_experticia = v;
        }
        if let Some(v) = self.coordinacion_solicitante {
            solicitud.coordinacion_solicitante = v;
        }
        if let Some(v) = self.operador {
            solicitud.operador = v;
        }
        if self.fiscal.is_some() {
            solicitud.fiscal = self.fiscal;
        }
        if self.informacion_linea.is_some() {
            solicitud.informacion_linea = self.informacion_linea;
        }
        if self.direc.is_some() {
            solicitud.direc = self.direc;
        }
        if self.delito.is_some() {
            solicitud.delito = self.delito;
        }
        if self.descripcion.is_some() {
            solicitud.descripcion = self.descripcion;
        }
        if self.motivo_rechazo.is_some() {
            solicitud.motivo_rechazo = self.motivo_rechazo;
        }
        if self.fecha_respuesta.is_some() {
            solicitud.fecha_respuesta = self.fecha_respuesta;
        }
        if self.oficio.is_some() {
            solicitud.oficio = self.oficio;
        }
    }
}

/// Filtros del listado de solicitudes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolicitudFilters {
    pub operador: Option<Operador>,
    pub estado: Option<EstadoSolicitud>,
    pub tipo_experticia: Option<String>,
    pub coordinacion: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Listado paginado de solicitudes
#[derive(Debug, Clone, Serialize)]
pub struct SolicitudListResponse {
    pub solicitudes: Vec<Solicitud>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procesando_is_accepted_as_pendiente() {
        let estado: EstadoSolicitud = serde_json::from_str("\"procesando\"").unwrap();
        assert_eq!(estado, EstadoSolicitud::Pendiente);
        assert_eq!(serde_json::to_string(&estado).unwrap(), "\"pendiente\"");
    }

    #[test]
    fn test_create_request_trims_and_validates_catalogs() {
        let request: CreateSolicitudRequest = serde_json::from_value(serde_json::json!({
            "numeroSolicitud": "  X-1 ",
            "numeroExpediente": "EXP-9",
            "tipoExperticia": "identificar_datos_numero",
            "coordinacionSolicitante": "homicidio",
            "operador": "movistar",
            "estado": "respondida"
        }))
        .unwrap();

        let request = request.normalized();
        assert_eq!(request.numero_solicitud, "X-1");
        assert!(request.validate().is_ok());
        assert_eq!(request.estado, Some(EstadoSolicitud::Respondida));
    }

    #[test]
    fn test_create_request_rejects_unknown_catalog_values() {
        let request: CreateSolicitudRequest = serde_json::from_value(serde_json::json!({
            "numeroSolicitud": "X-2",
            "numeroExpediente": "   ",
            "tipoExperticia": "inventada",
            "coordinacionSolicitante": "homicidio",
            "operador": "digitel"
        }))
        .unwrap();

        let errors = request.normalized().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("tipo_experticia"));
        assert!(fields.contains_key("numero_expediente"));
    }

    fn sample_solicitud() -> Solicitud {
        let now = Utc::now();
        Solicitud {
            id: 1,
            numero_solicitud: "X-1".to_string(),
            numero_expediente: "EXP-1".to_string(),
            fiscal: Some("Fiscal 1".to_string()),
            tipo_experticia: "identificar_datos_numero".to_string(),
            coordinacion_solicitante: "homicidio".to_string(),
            operador: Operador::Digitel,
            informacion_linea: None,
            direc: None,
            delito: Some("Robo".to_string()),
            descripcion: None,
            motivo_rechazo: None,
            estado: EstadoSolicitud::Enviada,
            fecha_solicitud: now,
            fecha_respuesta: None,
            oficio: None,
            usuario_id: Some(7),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_apply_to_keeps_status_and_missing_fields() {
        let mut solicitud = sample_solicitud();

        UpdateSolicitudRequest {
            operador: Some(Operador::Movilnet),
            estado: Some(EstadoSolicitud::Respondida),
            oficio: Some("OF-3".to_string()),
            ..Default::default()
        }
        .apply_to(&mut solicitud);

        assert_eq!(solicitud.operador, Operador::Movilnet);
        assert_eq!(solicitud.oficio.as_deref(), Some("OF-3"));
        assert_eq!(solicitud.delito.as_deref(), Some("Robo"));
        assert_eq!(solicitud.estado, EstadoSolicitud::Enviada);
    }

    #[test]
    fn test_leaving_rechazada_clears_motivo() {
        let mut solicitud = sample_solicitud();
        solicitud.set_estado(EstadoSolicitud::Rechazada);
        solicitud.motivo_rechazo = Some("Motivo viejo".to_string());

        solicitud.set_estado(EstadoSolicitud::Rechazada);
        assert_eq!(solicitud.motivo_rechazo.as_deref(), Some("Motivo viejo"));

        solicitud.set_estado(EstadoSolicitud::Respondida);
        assert_eq!(solicitud.estado, EstadoSolicitud::Respondida);
        assert_eq!(solicitud.motivo_rechazo, None);
    }

    #[test]
    fn test_unknown_operador_is_rejected_at_deserialization() {
        let result = serde_json::from_value::<UpdateSolicitudRequest>(serde_json::json!({
            "operador": "claro"
        }));
        assert!(result.is_err());
    }
}
