//! Textos de las notificaciones del sistema

use crate::models::solicitud::EstadoSolicitud;

/// Notificación al dueño de una solicitud cuando cambia su estado
pub fn status_changed(
    numero_solicitud: &str,
    nuevo_estado: EstadoSolicitud,
    motivo_rechazo: Option<&str>,
) -> String {
    let mut mensaje = format!(
        "Solicitud {} cambió a estado: {}",
        numero_solicitud,
        nuevo_estado.label()
    );

    if nuevo_estado == EstadoSolicitud::Rechazada {
        if let Some(motivo) = motivo_rechazo.filter(|m| !m.trim().is_empty()) {
            mensaje.push_str(" - Motivo: ");
            mensaje.push_str(motivo);
        }
    }

    mensaje
}

/// Notificación a los administradores cuando una solicitud queda enviada
pub fn request_sent(numero_solicitud: &str) -> String {
    format!(
        "Nueva solicitud enviada: {} ha sido enviada al operador",
        numero_solicitud
    )
}

pub fn suspension_lifted_for_user() -> String {
    "Tu cuenta ha sido reactivada. La suspensión temporal ha sido levantada.".to_string()
}

pub fn suspension_lifted_for_admins(nombre: &str, username: &str) -> String {
    format!(
        "Suspensión levantada: La cuenta de {} ({}) ha sido reactivada automáticamente",
        nombre, username
    )
}

pub fn security_suspension_for_admins(nombre: &str, username: &str, ip: &str) -> String {
    format!(
        "Cuenta suspendida por seguridad: {} ({}) desde IP {} por múltiples intentos fallidos",
        nombre, username, ip
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_includes_reason() {
        let msg = status_changed("X-1", EstadoSolicitud::Rechazada, Some("Falta oficio"));
        assert_eq!(msg, "Solicitud X-1 cambió a estado: Rechazada - Motivo: Falta oficio");
    }

    #[test]
    fn test_reason_only_for_rejections() {
        let msg = status_changed("X-1", EstadoSolicitud::Respondida, Some("ignorado"));
        assert_eq!(msg, "Solicitud X-1 cambió a estado: Respondida");
    }

    #[test]
    fn test_security_suspension_mentions_user_and_ip() {
        let msg = security_suspension_for_admins("John Doe", "jdoe", "10.0.0.7");
        assert!(msg.contains("jdoe"));
        assert!(msg.contains("10.0.0.7"));
    }
}
