//! Política de roles
//!
//! Este módulo centraliza la tabla de capacidades por rol. Toda decisión de
//! autorización del sistema (guards de rutas, alcance de listados, dashboard,
//! plantillas) consulta `capabilities_for`; ningún otro módulo compara el
//! string del rol directamente.

use serde::Serialize;

use crate::models::user::UserRole;

/// Conjunto de capacidades de un rol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub can_view_users: bool,
    pub can_manage_users: bool,
    pub can_view_all_requests: bool,
    pub can_manage_all_requests: bool,
    pub can_view_all_reports: bool,
    pub can_view_dashboard: bool,
    pub can_view_email_templates: bool,
}

impl Capabilities {
    const ADMIN: Self = Self {
        can_view_users: true,
        can_manage_users: true,
        can_view_all_requests: true,
        can_manage_all_requests: true,
        can_view_all_reports: true,
        can_view_dashboard: true,
        can_view_email_templates: true,
    };

    const SUPERVISOR: Self = Self {
        can_view_users: false,
        can_manage_users: false,
        can_view_all_requests: true,
        can_manage_all_requests: true,
        can_view_all_reports: true,
        can_view_dashboard: true,
        can_view_email_templates: false,
    };

    const USUARIO: Self = Self {
        can_view_users: false,
        can_manage_users: false,
        can_view_all_requests: false,
        can_manage_all_requests: false,
        can_view_all_reports: false,
        can_view_dashboard: true,
        can_view_email_templates: false,
    };

    /// Sin capacidades (rol desconocido o ausente)
    pub const NONE: Self = Self {
        can_view_users: false,
        can_manage_users: false,
        can_view_all_requests: false,
        can_manage_all_requests: false,
        can_view_all_reports: false,
        can_view_dashboard: false,
        can_view_email_templates: false,
    };
}

/// Capacidades de un rol ya parseado
pub fn capabilities_of(role: UserRole) -> Capabilities {
    match role {
        UserRole::Admin => Capabilities::ADMIN,
        UserRole::Supervisor => Capabilities::SUPERVISOR,
        UserRole::Usuario => Capabilities::USUARIO,
    }
}

/// Capacidades a partir del string de rol almacenado; los valores
/// desconocidos no obtienen ninguna capacidad
pub fn capabilities_for(role: Option<&str>) -> Capabilities {
    role.and_then(UserRole::parse)
        .map(capabilities_of)
        .unwrap_or(Capabilities::NONE)
}
