mod common;

use chrono::{Duration, Utc};
use serde_json::json;

use ter_system::{
    config::SuspensionPolicy,
    controllers::solicitud_controller::coordinacion_scope,
    middleware::AuthenticatedUser,
    models::{
        solicitud::{CreateSolicitudRequest, EstadoSolicitud},
        user::{UserRole, UserStatus},
    },
    services::{
        lifecycle_guard::{decide, Decision, DenyReason, Mutation},
        quota_meter::{quota_state, QuotaState},
        role_policy::capabilities_for,
        suspension_gate::{evaluate_login, FailedAttemptOutcome, LoginDenial},
    },
};

fn solicitud_payload(extra: serde_json::Value) -> CreateSolicitudRequest {
    let mut payload = json!({
        "numeroSolicitud": "SOL-2024-001",
        "numeroExpediente": "EXP-77",
        "tipoExperticia": "identificar_datos_numero",
        "coordinacionSolicitante": "homicidio",
        "operador": "movistar"
    });
    if let (Some(base), Some(extra)) = (payload.as_object_mut(), extra.as_object()) {
        base.extend(extra.clone());
    }
    serde_json::from_value(payload).unwrap()
}

#[test]
fn test_usuario_create_with_foreign_status_key_is_stored_as_enviada() {
    let request = solicitud_payload(json!({"status": "respondida"}));
    assert_eq!(request.estado, None);

    let decision = decide(
        Some(UserRole::Usuario),
        None,
        Mutation::Create {
            status: request.estado,
        },
    );
    assert_eq!(decision.effective_status(), Some(EstadoSolicitud::Enviada));
}

#[test]
fn test_usuario_create_with_explicit_respondida_is_denied() {
    let request = solicitud_payload(json!({"estado": "respondida"}));

    let decision = decide(
        Some(UserRole::Usuario),
        None,
        Mutation::Create {
            status: request.estado,
        },
    );
    assert_eq!(decision, Decision::Deny(DenyReason::CreateStatusRestricted));
}

#[test]
fn test_procesando_is_read_as_pendiente() {
    let request = solicitud_payload(json!({"estado": "procesando"}));
    assert_eq!(request.estado, Some(EstadoSolicitud::Pendiente));
}

#[test]
fn test_supervisor_cannot_touch_answered_request() {
    let current = Some(EstadoSolicitud::Respondida);

    assert_eq!(
        decide(
            Some(UserRole::Supervisor),
            current,
            Mutation::Update { status: None }
        ),
        Decision::Deny(DenyReason::OnlyAdminMayEdit)
    );
    assert_eq!(
        decide(Some(UserRole::Supervisor), current, Mutation::Delete),
        Decision::Deny(DenyReason::OnlyAdminMayDelete)
    );
    assert!(decide(Some(UserRole::Admin), current, Mutation::Delete).is_allowed());
}

#[test]
fn test_unknown_role_is_treated_as_restricted() {
    let decision = decide(
        None,
        Some(EstadoSolicitud::Enviada),
        Mutation::Update {
            status: Some(EstadoSolicitud::Rechazada),
        },
    );
    assert_eq!(decision, Decision::Deny(DenyReason::UpdateStatusRestricted));
    assert!(!capabilities_for(Some("auditor")).can_view_dashboard);
}

#[test]
fn test_usuario_listing_is_pinned_to_own_coordinacion() {
    let usuario = AuthenticatedUser::from(&common::user("usuario"));
    assert_eq!(
        coordinacion_scope(&usuario, Some("delitos_personas")).unwrap(),
        Some("homicidio")
    );

    let supervisor = AuthenticatedUser::from(&common::user("supervisor"));
    assert_eq!(
        coordinacion_scope(&supervisor, Some("delitos_personas")).unwrap(),
        Some("delitos_personas")
    );
    assert_eq!(coordinacion_scope(&supervisor, Some("todos")).unwrap(), None);
}

#[test]
fn test_third_failure_suspends_and_blocks_login() {
    let policy = SuspensionPolicy::default();
    let now = Utc::now();
    let mut user = common::user("usuario");

    assert!(!FailedAttemptOutcome::from_counter(2, &policy).auto_suspended);

    let outcome = FailedAttemptOutcome::from_counter(3, &policy);
    assert!(outcome.auto_suspended);
    assert_eq!(outcome.new_counter, 3);

    user.status = UserStatus::Suspendido;
    user.tiempo_suspension = Some(now + Duration::hours(policy.suspension_hours));
    let gate = evaluate_login(&user, now);
    assert!(matches!(
        gate.denial,
        Some(LoginDenial::Suspended { remaining: Some(_) })
    ));
    assert_eq!(gate.seconds_remaining(), Some(3 * 3600));
}

#[test]
fn test_expired_suspension_is_lifted_on_login() {
    let now = Utc::now();
    let mut user = common::user("usuario");
    user.status = UserStatus::Suspendido;
    user.tiempo_suspension = Some(now - Duration::minutes(1));

    let gate = evaluate_login(&user, now);
    assert!(gate.suspension_expired);
    assert!(gate.is_allowed());
}

#[test]
fn test_blocked_account_is_denied_even_with_active_flag() {
    let mut user = common::user("admin");
    user.status = UserStatus::Bloqueado;

    let gate = evaluate_login(&user, Utc::now());
    assert_eq!(gate.denial, Some(LoginDenial::Blocked));
    assert_eq!(gate.denial.map(|d| d.message()).as_deref(), Some("Cuenta Bloqueada"));
}

#[test]
fn test_quota_runs_out_after_role_default() {
    let mut user = common::user("usuario");
    user.chatbot_mensajes_usados = 19;
    assert_eq!(quota_state(&user), QuotaState::Available { remaining: 1 });

    user.chatbot_mensajes_usados = 20;
    assert_eq!(quota_state(&user), QuotaState::Exhausted { limite: 20 });
}

#[test]
fn test_admin_quota_is_unlimited_even_when_disabled() {
    let mut user = common::user("admin");
    user.chatbot_habilitado = false;
    user.chatbot_mensajes_usados = 500;

    assert_eq!(quota_state(&user), QuotaState::Unlimited);
}
