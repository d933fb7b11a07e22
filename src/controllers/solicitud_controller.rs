//! Controlador de solicitudes
//!
//! Aplica el alcance por coordinación del listado y el guard del ciclo de
//! vida en creación, edición y borrado. Tras cada mutación registra el
//! historial y genera las notificaciones de cambio de estado.

use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::{
    dto::ApiResponse,
    middleware::auth::AuthenticatedUser,
    models::{
        historial::{AccionHistorial, HistorialSolicitud},
        solicitud::{
            CreateSolicitudRequest, EstadoSolicitud, Solicitud, SolicitudFilters,
            SolicitudListResponse, UpdateSolicitudRequest,
        },
    },
    repositories::{
        solicitud_repository::DUPLICATE_NUMERO, HistorialRepository, NotificationRepository,
        SolicitudRepository,
    },
    services::{
        lifecycle_guard::{decide, Decision, Mutation},
        notification_messages,
    },
    utils::errors::AppError,
};

const NO_COORDINACION: &str = "Usuario sin coordinación asignada";

pub struct SolicitudController {
    solicitudes: SolicitudRepository,
    historial: HistorialRepository,
    notifications: NotificationRepository,
}

/// Coordinación a la que queda restringida una consulta del actor.
/// `Ok(None)` significa sin restricción.
pub fn coordinacion_scope<'a>(
    actor: &'a AuthenticatedUser,
    requested: Option<&'a str>,
) -> Result<Option<&'a str>, AppError> {
    if actor.capabilities.can_view_all_requests {
        return Ok(requested.filter(|c| !c.is_empty() && *c != "todos"));
    }

    actor
        .coordinacion
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(Some)
        .ok_or_else(|| AppError::Forbidden(NO_COORDINACION.to_string()))
}

fn allowed_status(decision: Decision) -> Result<Option<EstadoSolicitud>, AppError> {
    match decision {
        Decision::Allow { effective_status } => Ok(effective_status),
        Decision::Deny(reason) => Err(AppError::Forbidden(reason.message().to_string())),
    }
}

impl SolicitudController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            solicitudes: SolicitudRepository::new(pool.clone()),
            historial: HistorialRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        filters: SolicitudFilters,
    ) -> Result<SolicitudListResponse, AppError> {
        let scope = coordinacion_scope(actor, filters.coordinacion.as_deref())?;
        let (solicitudes, total) = self.solicitudes.list(&filters, scope).await?;

        Ok(SolicitudListResponse { solicitudes, total })
    }

    /// Carga una solicitud comprobando que el actor puede verla
    async fn load_visible(&self, actor: &AuthenticatedUser, id: i32) -> Result<Solicitud, AppError> {
        let solicitud = self
            .solicitudes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Solicitud no encontrada".to_string()))?;

        if let Some(coordinacion) = coordinacion_scope(actor, None)? {
            if solicitud.coordinacion_solicitante != coordinacion {
                return Err(AppError::Forbidden(
                    "No tienes permiso para acceder a esta solicitud".to_string(),
                ));
            }
        }

        Ok(solicitud)
    }

    pub async fn get_by_id(&self, actor: &AuthenticatedUser, id: i32) -> Result<Solicitud, AppError> {
        self.load_visible(actor, id).await
    }

    pub async fn historial(
        &self,
        actor: &AuthenticatedUser,
        id: i32,
    ) -> Result<Vec<HistorialSolicitud>, AppError> {
        let solicitud = self.load_visible(actor, id).await?;
        self.historial.list_for_solicitud(solicitud.id).await
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateSolicitudRequest,
    ) -> Result<Solicitud, AppError> {
        let request = request.normalized();
        validator::Validate::validate(&request)?;

        let requested = request.estado;
        let estado = allowed_status(decide(actor.role, None, Mutation::Create { status: requested }))?
            .unwrap_or(EstadoSolicitud::Enviada);

        if requested != Some(estado) {
            info!(
                "🔁 Estado de creación ajustado para {}: pedido {:?}, guardado {}",
                actor.username,
                requested.map(|e| e.as_str()),
                estado.as_str()
            );
        }

        if self
            .solicitudes
            .find_by_numero(&request.numero_solicitud)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest(DUPLICATE_NUMERO.to_string()));
        }

        let solicitud = self.solicitudes.create(&request, estado, actor.id).await?;
        info!("📨 Solicitud {} creada por {}", solicitud.numero_solicitud, actor.username);

        self.historial
            .record(solicitud.id, AccionHistorial::Creada, actor.id)
            .await?;

        if solicitud.estado == EstadoSolicitud::Enviada {
            self.notify_admins_sent(&solicitud).await;
        }

        Ok(solicitud)
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: i32,
        request: UpdateSolicitudRequest,
    ) -> Result<Solicitud, AppError> {
        let request = request.normalized();
        validator::Validate::validate(&request)?;

        let current = self.load_visible(actor, id).await?;
        let requested = request.estado;
        let effective = allowed_status(decide(
            actor.role,
            Some(current.estado),
            Mutation::Update { status: requested },
        ))?;

        if requested.is_some() && requested != effective {
            info!(
                "🔁 Estado de edición ajustado para {}: pedido {:?}, guardado {:?}",
                actor.username,
                requested.map(|e| e.as_str()),
                effective.map(|e| e.as_str())
            );
        }

        if let Some(numero) = request.numero_solicitud.as_deref() {
            if let Some(existing) = self.solicitudes.find_by_numero(numero).await? {
                if existing.id != id {
                    return Err(AppError::BadRequest(DUPLICATE_NUMERO.to_string()));
                }
            }
        }

        let previous_estado = current.estado;
        let motivo = request.motivo_rechazo.clone();
        let mut merged = current;
        request.apply_to(&mut merged);
        if let Some(estado) = effective {
            merged.set_estado(estado);
        }

        let solicitud = self
            .solicitudes
            .save(&merged)
            .await?
            .ok_or_else(|| AppError::NotFound("Solicitud no encontrada".to_string()))?;

        if let Some(estado) = effective.filter(|e| *e != previous_estado) {
            self.notify_status_change(&solicitud, estado, motivo.as_deref())
                .await;
        }

        self.historial
            .record(solicitud.id, AccionHistorial::Actualizada, actor.id)
            .await?;

        Ok(solicitud)
    }

    pub async fn delete(
        &self,
        actor: &AuthenticatedUser,
        id: i32,
    ) -> Result<ApiResponse<()>, AppError> {
        let current = self.load_visible(actor, id).await?;
        allowed_status(decide(actor.role, Some(current.estado), Mutation::Delete))?;

        if !self.solicitudes.delete(id).await? {
            return Err(AppError::NotFound("Solicitud no encontrada".to_string()));
        }

        warn!(
            "🗑️ Solicitud {} eliminada por {}",
            current.numero_solicitud, actor.username
        );
        Ok(ApiResponse::message("Solicitud eliminada exitosamente"))
    }

    /// `motivo` es el enviado en esta edición, no el guardado
    async fn notify_status_change(
        &self,
        solicitud: &Solicitud,
        estado: EstadoSolicitud,
        motivo: Option<&str>,
    ) {
        let mensaje =
            notification_messages::status_changed(&solicitud.numero_solicitud, estado, motivo);

        if let Some(owner) = solicitud.usuario_id {
            if let Err(e) = self
                .notifications
                .create(owner, Some(solicitud.id), &mensaje)
                .await
            {
                error!("❌ Error notificando cambio de estado: {}", e);
            }
        }

        if estado == EstadoSolicitud::Enviada {
            self.notify_admins_sent(solicitud).await;
        }
    }

    async fn notify_admins_sent(&self, solicitud: &Solicitud) {
        let mensaje = notification_messages::request_sent(&solicitud.numero_solicitud);
        if let Err(e) = self
            .notifications
            .notify_admins(Some(solicitud.id), &mensaje)
            .await
        {
            error!("❌ Error notificando a administradores: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::fixtures::user_with_role;

    fn actor(rol: &str, coordinacion: Option<&str>) -> AuthenticatedUser {
        let mut user = user_with_role(rol);
        user.coordinacion = coordinacion.map(str::to_string);
        AuthenticatedUser::from(&user)
    }

    #[test]
    fn test_admin_scope_ignores_todos() {
        let admin = actor("admin", None);
        assert_eq!(coordinacion_scope(&admin, Some("todos")).unwrap(), None);
        assert_eq!(
            coordinacion_scope(&admin, Some("homicidio")).unwrap(),
            Some("homicidio")
        );
    }

    #[test]
    fn test_usuario_is_pinned_to_own_coordinacion() {
        let usuario = actor("usuario", Some("homicidio"));
        assert_eq!(
            coordinacion_scope(&usuario, Some("todos")).unwrap(),
            Some("homicidio")
        );
    }

    #[test]
    fn test_usuario_without_coordinacion_is_forbidden() {
        let usuario = actor("usuario", None);
        assert!(matches!(
            coordinacion_scope(&usuario, None),
            Err(AppError::Forbidden(msg)) if msg == NO_COORDINACION
        ));
    }
}
