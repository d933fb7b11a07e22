//! Guard del ciclo de vida de solicitudes
//!
//! Decide si un actor puede crear, editar o eliminar una solicitud según su
//! rol y el estado actual, y qué estado se persiste realmente. Para roles por
//! debajo de admin el estado se fuerza a `enviada` en lugar de confiar en el
//! valor enviado por el cliente.

use crate::models::{solicitud::EstadoSolicitud, user::UserRole};

/// Mutación solicitada sobre una solicitud
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create { status: Option<EstadoSolicitud> },
    Update { status: Option<EstadoSolicitud> },
    Delete,
}

/// Motivo de denegación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Un rol no admin pidió crear con un estado distinto de `enviada`
    CreateStatusRestricted,
    /// Un rol no admin pidió cambiar el estado a algo distinto de `enviada`
    UpdateStatusRestricted,
    /// Sólo admin puede editar solicitudes fuera de `enviada`
    OnlyAdminMayEdit,
    /// Sólo admin puede eliminar solicitudes fuera de `enviada`
    OnlyAdminMayDelete,
}

impl DenyReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::CreateStatusRestricted => {
                "Los usuarios con rol supervisor y usuario solo pueden crear solicitudes con estado 'enviada'"
            }
            DenyReason::UpdateStatusRestricted => {
                "Los usuarios con rol supervisor y usuario solo pueden establecer el estado como 'enviada'"
            }
            DenyReason::OnlyAdminMayEdit => {
                "Solo los administradores pueden editar solicitudes con estado diferente a 'enviada'"
            }
            DenyReason::OnlyAdminMayDelete => {
                "Solo los administradores pueden eliminar solicitudes con estado diferente a 'enviada'"
            }
        }
    }
}

/// Resultado del guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Permitido; `effective_status` es el estado a persistir (`None` deja el
    /// estado sin tocar)
    Allow {
        effective_status: Option<EstadoSolicitud>,
    },
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    pub fn effective_status(&self) -> Option<EstadoSolicitud> {
        match self {
            Decision::Allow { effective_status } => *effective_status,
            Decision::Deny(_) => None,
        }
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Deny(reason) => Some(*reason),
            Decision::Allow { .. } => None,
        }
    }
}

/// Evalúa una mutación. Un rol desconocido (`None`) se trata como no admin.
pub fn decide(
    actor_role: Option<UserRole>,
    current_status: Option<EstadoSolicitud>,
    mutation: Mutation,
) -> Decision {
    let is_admin = actor_role == Some(UserRole::Admin);
    let is_enviada = current_status == Some(EstadoSolicitud::Enviada);

    match mutation {
        Mutation::Create { status } => {
            if is_admin {
                return Decision::Allow {
                    effective_status: Some(status.unwrap_or(EstadoSolicitud::Pendiente)),
                };
            }
            match status {
                Some(s) if s != EstadoSolicitud::Enviada => {
                    Decision::Deny(DenyReason::CreateStatusRestricted)
                }
                _ => Decision::Allow {
                    effective_status: Some(EstadoSolicitud::Enviada),
                },
            }
        }
        Mutation::Update { status } => {
            if is_admin {
                return Decision::Allow {
                    effective_status: status,
                };
            }
            if !is_enviada {
                return Decision::Deny(DenyReason::OnlyAdminMayEdit);
            }
            match status {
                Some(s) if s != EstadoSolicitud::Enviada => {
                    Decision::Deny(DenyReason::UpdateStatusRestricted)
                }
                Some(_) => Decision::Allow {
                    effective_status: Some(EstadoSolicitud::Enviada),
                },
                None => Decision::Allow {
                    effective_status: None,
                },
            }
        }
        Mutation::Delete => {
            if is_admin || is_enviada {
                Decision::Allow {
                    effective_status: None,
                }
            } else {
                Decision::Deny(DenyReason::OnlyAdminMayDelete)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EstadoSolicitud::*;

    const ALL_STATUSES: [EstadoSolicitud; 4] = [Pendiente, Enviada, Respondida, Rechazada];
    const NON_ADMIN: [Option<UserRole>; 3] =
        [Some(UserRole::Supervisor), Some(UserRole::Usuario), None];

    #[test]
    fn test_non_admin_create_never_persists_other_status() {
        for role in NON_ADMIN {
            for requested in ALL_STATUSES {
                let decision = decide(role, None, Mutation::Create { status: Some(requested) });
                if requested == Enviada {
                    assert_eq!(decision.effective_status(), Some(Enviada));
                } else {
                    assert_eq!(
                        decision.deny_reason(),
                        Some(DenyReason::CreateStatusRestricted)
                    );
                }
            }

            let omitted = decide(role, None, Mutation::Create { status: None });
            assert_eq!(omitted.effective_status(), Some(Enviada));
        }
    }

    #[test]
    fn test_admin_create_keeps_requested_status() {
        let admin = Some(UserRole::Admin);
        assert_eq!(
            decide(admin, None, Mutation::Create { status: Some(Respondida) }).effective_status(),
            Some(Respondida)
        );
        assert_eq!(
            decide(admin, None, Mutation::Create { status: None }).effective_status(),
            Some(Pendiente)
        );
    }

    #[test]
    fn test_only_admin_touches_non_enviada_requests() {
        for current in [Pendiente, Respondida, Rechazada] {
            for role in NON_ADMIN {
                for requested in [None, Some(Enviada), Some(Rechazada)] {
                    let update = decide(role, Some(current), Mutation::Update { status: requested });
                    assert_eq!(update.deny_reason(), Some(DenyReason::OnlyAdminMayEdit));
                }
                let delete = decide(role, Some(current), Mutation::Delete);
                assert_eq!(delete.deny_reason(), Some(DenyReason::OnlyAdminMayDelete));
            }

            let admin = Some(UserRole::Admin);
            assert!(decide(admin, Some(current), Mutation::Update { status: None }).is_allowed());
            assert!(decide(admin, Some(current), Mutation::Delete).is_allowed());
        }
    }

    #[test]
    fn test_non_admin_update_of_enviada_request() {
        let supervisor = Some(UserRole::Supervisor);

        let untouched = decide(supervisor, Some(Enviada), Mutation::Update { status: None });
        assert_eq!(untouched, Decision::Allow { effective_status: None });

        let forced = decide(supervisor, Some(Enviada), Mutation::Update { status: Some(Enviada) });
        assert_eq!(forced.effective_status(), Some(Enviada));

        let escalated = decide(supervisor, Some(Enviada), Mutation::Update { status: Some(Respondida) });
        assert_eq!(escalated.deny_reason(), Some(DenyReason::UpdateStatusRestricted));

        assert!(decide(Some(UserRole::Usuario), Some(Enviada), Mutation::Delete).is_allowed());
    }

    #[test]
    fn test_admin_update_passes_terminal_transitions_through() {
        let admin = Some(UserRole::Admin);
        let rejected = decide(admin, Some(Respondida), Mutation::Update { status: Some(Rechazada) });
        assert_eq!(rejected.effective_status(), Some(Rechazada));

        let answered = decide(admin, Some(Enviada), Mutation::Update { status: Some(Respondida) });
        assert_eq!(answered.effective_status(), Some(Respondida));
    }

    #[test]
    fn test_missing_current_status_is_not_enviada() {
        let decision = decide(Some(UserRole::Usuario), None, Mutation::Delete);
        assert_eq!(decision.deny_reason(), Some(DenyReason::OnlyAdminMayDelete));
    }
}
