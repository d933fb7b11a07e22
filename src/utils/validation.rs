//! Utilidades de validación
//!
//! Validadores personalizados usados por los derives de `validator` y
//! helpers de normalización de entrada.

use validator::ValidationError;

/// Tipos de experticia ofrecidos
pub const TIPOS_EXPERTICIA: &[&str] = &[
    "identificar_datos_numero",
    "determinar_historicos_trazas_bts",
    "determinar_linea_conexion_ip",
    "identificar_radio_bases_bts",
    "identificar_numeros_duraciones_bts",
    "determinar_contaminacion_linea",
    "determinar_sim_cards_numero",
    "determinar_comportamiento_social",
    "determinar_contacto_frecuente",
    "determinar_ubicacion_llamadas",
    "determinar_ubicacion_trazas",
    "determinar_contaminacion_equipo_imei",
    "identificar_numeros_comun_bts",
    "identificar_numeros_desconectan_bts",
    "identificar_numeros_repetidos_bts",
    "determinar_numero_internacional",
    "identificar_linea_sim_card",
    "identificar_cambio_simcard_documentos",
];

/// Coordinaciones que pueden emitir solicitudes
pub const COORDINACIONES: &[&str] = &[
    "delitos_propiedad",
    "delitos_personas",
    "crimen_organizado",
    "delitos_vehiculos",
    "homicidio",
];

fn catalog_error(code: &'static str, value: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.add_param("value".into(), &value.to_string());
    error
}

/// Validar que el tipo de experticia pertenece al catálogo
pub fn validate_tipo_experticia(value: &str) -> Result<(), ValidationError> {
    if TIPOS_EXPERTICIA.contains(&value) {
        Ok(())
    } else {
        Err(catalog_error("tipo_experticia", value))
    }
}

/// Validar que la coordinación pertenece al catálogo
pub fn validate_coordinacion(value: &str) -> Result<(), ValidationError> {
    if COORDINACIONES.contains(&value) {
        Ok(())
    } else {
        Err(catalog_error("coordinacion", value))
    }
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Recorta espacios; devuelve `None` si queda vacío
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normaliza parámetros de paginación a (limit, offset)
pub fn pagination(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(10).clamp(1, 100);
    let page = page.unwrap_or(1).max(1);
    (limit, (page - 1).saturating_mul(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_validators() {
        assert!(validate_tipo_experticia("identificar_datos_numero").is_ok());
        assert!(validate_tipo_experticia("adivinar").is_err());
        assert!(validate_coordinacion("homicidio").is_ok());
        assert!(validate_coordinacion("Homicidio").is_err());
    }

    #[test]
    fn test_trim_optional() {
        assert_eq!(trim_optional(Some("  x ".into())), Some("x".to_string()));
        assert_eq!(trim_optional(Some("   ".into())), None);
        assert_eq!(trim_optional(None), None);
    }

    #[test]
    fn test_pagination_bounds() {
        assert_eq!(pagination(None, None), (10, 0));
        assert_eq!(pagination(Some(3), Some(20)), (20, 40));
        assert_eq!(pagination(Some(0), Some(1000)), (100, 0));
        assert_eq!(pagination(Some(i64::MAX), Some(100)), (100, i64::MAX));
        assert_eq!(pagination(Some(-5), Some(-5)), (1, 0));
    }
}
