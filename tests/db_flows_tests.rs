//! Flujos completos contra PostgreSQL. `sqlx::test` crea una base aislada
//! por test a partir de `DATABASE_URL` y aplica `./migrations`.

mod common;

use std::sync::Arc;

use sqlx::PgPool;
use tokio::task::JoinSet;

use ter_system::{
    config::SuspensionPolicy,
    controllers::{
        auth_controller::AuthController, chatbot_controller::ChatbotController,
        solicitud_controller::SolicitudController,
    },
    middleware::AuthenticatedUser,
    models::{
        auth::LoginRequest,
        chatbot::{ChatbotMessageRequest, LimitUpdate},
        solicitud::{CreateSolicitudRequest, EstadoSolicitud, UpdateSolicitudRequest},
        user::{User, UserStatus},
    },
    repositories::{
        solicitud_repository::DUPLICATE_NUMERO, NewUser, NotificationRepository,
        SolicitudRepository, UserRepository,
    },
    services::llm_client::LlmClient,
    utils::{errors::AppError, jwt::JwtConfig, password::hash_password},
};

async fn insert_user(pool: &PgPool, username: &str, rol: &str, password: &str) -> User {
    UserRepository::new(pool.clone())
        .create(&NewUser {
            username: username.to_string(),
            password_hash: hash_password(password).unwrap(),
            nombre: format!("Nombre {}", username),
            email: None,
            rol: rol.to_string(),
            coordinacion: Some("homicidio".to_string()),
            activo: true,
            status: UserStatus::Activo,
            tiempo_suspension: None,
            motivo_suspension: None,
            direccion_ip: None,
        })
        .await
        .unwrap()
}

fn solicitud_request(numero: &str) -> CreateSolicitudRequest {
    serde_json::from_value(serde_json::json!({
        "numeroSolicitud": numero,
        "numeroExpediente": "EXP-77",
        "tipoExperticia": "identificar_datos_numero",
        "coordinacionSolicitante": "homicidio",
        "operador": "movistar"
    }))
    .unwrap()
}

fn is_duplicate(result: &Result<impl std::fmt::Debug, AppError>) -> bool {
    matches!(result, Err(AppError::BadRequest(msg)) if msg == DUPLICATE_NUMERO)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_numero_has_one_message_on_every_path(pool: PgPool) {
    let admin = AuthenticatedUser::from(&insert_user(&pool, "admin1", "admin", "clave-admin").await);
    let controller = SolicitudController::new(pool.clone());

    controller.create(&admin, solicitud_request("SOL-1")).await.unwrap();

    let repeated = controller.create(&admin, solicitud_request("SOL-1")).await;
    assert!(is_duplicate(&repeated), "{:?}", repeated);

    // Sin la consulta previa el choque llega como 23505
    let direct = SolicitudRepository::new(pool.clone())
        .create(&solicitud_request("SOL-1"), EstadoSolicitud::Enviada, admin.id)
        .await;
    assert!(is_duplicate(&direct), "{:?}", direct);

    let (a, b) = tokio::join!(
        controller.create(&admin, solicitud_request("SOL-2")),
        controller.create(&admin, solicitud_request("SOL-2")),
    );
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    assert!(is_duplicate(&a) || is_duplicate(&b));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_renumbering_onto_existing_numero_is_rejected(pool: PgPool) {
    let admin = AuthenticatedUser::from(&insert_user(&pool, "admin1", "admin", "clave-admin").await);
    let controller = SolicitudController::new(pool.clone());

    controller.create(&admin, solicitud_request("SOL-1")).await.unwrap();
    let second = controller.create(&admin, solicitud_request("SOL-2")).await.unwrap();

    let result = controller
        .update(
            &admin,
            second.id,
            UpdateSolicitudRequest {
                numero_solicitud: Some("SOL-1".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(is_duplicate(&result), "{:?}", result);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rejection_notice_cites_only_the_reason_sent_with_it(pool: PgPool) {
    let admin = AuthenticatedUser::from(&insert_user(&pool, "admin1", "admin", "clave-admin").await);
    let owner = AuthenticatedUser::from(&insert_user(&pool, "analista", "usuario", "clave-1").await);
    let controller = SolicitudController::new(pool.clone());

    let solicitud = controller.create(&owner, solicitud_request("SOL-9")).await.unwrap();
    assert_eq!(solicitud.estado, EstadoSolicitud::Enviada);

    let rejected = controller
        .update(
            &admin,
            solicitud.id,
            UpdateSolicitudRequest {
                estado: Some(EstadoSolicitud::Rechazada),
                motivo_rechazo: Some("Falta oficio".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(rejected.motivo_rechazo.as_deref(), Some("Falta oficio"));

    let answered = controller
        .update(
            &admin,
            solicitud.id,
            UpdateSolicitudRequest {
                estado: Some(EstadoSolicitud::Respondida),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(answered.motivo_rechazo, None);

    let rejected_again = controller
        .update(
            &admin,
            solicitud.id,
            UpdateSolicitudRequest {
                estado: Some(EstadoSolicitud::Rechazada),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(rejected_again.motivo_rechazo, None);

    let mut notices = NotificationRepository::new(pool.clone())
        .list_for_user(owner.id)
        .await
        .unwrap();
    notices.sort_by_key(|n| n.id);
    let mensajes: Vec<&str> = notices.iter().map(|n| n.mensaje.as_str()).collect();

    assert_eq!(
        mensajes,
        vec![
            "Solicitud SOL-9 cambió a estado: Rechazada - Motivo: Falta oficio",
            "Solicitud SOL-9 cambió a estado: Respondida",
            "Solicitud SOL-9 cambió a estado: Rechazada",
        ]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_third_failed_login_suspends_and_alerts_admins(pool: PgPool) {
    let admin = insert_user(&pool, "admin1", "admin", "clave-admin").await;
    let jdoe = insert_user(&pool, "jdoe", "usuario", "correcta").await;

    let controller = AuthController::new(
        pool.clone(),
        JwtConfig {
            secret: "secreto-de-pruebas".to_string(),
            session_hours: 24,
        },
        SuspensionPolicy::default(),
    );
    let login = |password: &str| LoginRequest {
        username: "jdoe".to_string(),
        password: password.to_string(),
    };

    controller.login(login("correcta"), "10.0.0.5").await.unwrap();

    for _ in 0..2 {
        match controller.login(login("mala"), "10.0.0.5").await {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Credenciales inválidas"),
            other => panic!("unexpected {:?}", other.map(|r| r.user.username)),
        }
    }
    match controller.login(login("mala"), "10.0.0.5").await {
        Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Cuenta Suspendida (3 horas)"),
        other => panic!("unexpected {:?}", other.map(|r| r.user.username)),
    }

    match controller.login(login("correcta"), "10.0.0.5").await {
        Err(AppError::Unauthorized(msg)) => assert!(msg.starts_with("Cuenta Suspendida ("), "{}", msg),
        other => panic!("unexpected {:?}", other.map(|r| r.user.username)),
    }

    let stored = UserRepository::new(pool.clone())
        .find_by_id(jdoe.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, UserStatus::Suspendido);
    assert_eq!(stored.intentos_fallidos, 0);
    assert!(stored.tiempo_suspension.is_some());
    assert_eq!(stored.session_token, None);
    assert_eq!(stored.session_expires, None);

    let alerts = NotificationRepository::new(pool.clone())
        .list_for_user(admin.id)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].mensaje.contains("(jdoe)"), "{}", alerts[0].mensaje);
    assert!(alerts[0].mensaje.contains("10.0.0.5"), "{}", alerts[0].mensaje);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_chatbot_sends_never_overshoot_limit(pool: PgPool) {
    let user = insert_user(&pool, "analista", "usuario", "clave-1").await;
    let users = UserRepository::new(pool.clone());
    users
        .bulk_update_chatbot_limits(&[LimitUpdate {
            user_id: user.id,
            limite: 3,
            habilitado: true,
        }])
        .await
        .unwrap();

    let actor = AuthenticatedUser::from(&user);
    let llm: Arc<dyn LlmClient> = Arc::new(common::EchoLlm);
    let mut sends = JoinSet::new();
    for i in 0..8 {
        let controller = ChatbotController::new(pool.clone(), llm.clone());
        let actor = actor.clone();
        sends.spawn(async move {
            controller
                .send_message(
                    &actor,
                    ChatbotMessageRequest {
                        message: format!("consulta {}", i),
                    },
                )
                .await
        });
    }

    let (mut accepted, mut exhausted) = (0, 0);
    while let Some(result) = sends.join_next().await {
        match result.unwrap() {
            Ok(_) => accepted += 1,
            Err(AppError::QuotaExceeded(msg)) => {
                assert!(msg.contains("límite de 3 mensajes"), "{}", msg);
                exhausted += 1;
            }
            Err(other) => panic!("unexpected {:?}", other),
        }
    }
    assert_eq!((accepted, exhausted), (3, 5));

    let stored = users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.chatbot_mensajes_usados, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_chatbot_use_is_never_counted(pool: PgPool) {
    let admin = insert_user(&pool, "admin1", "admin", "clave-admin").await;
    let controller = ChatbotController::new(pool.clone(), Arc::new(common::EchoLlm));
    let actor = AuthenticatedUser::from(&admin);

    for _ in 0..25 {
        let reply = controller
            .send_message(
                &actor,
                ChatbotMessageRequest {
                    message: "hola".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(reply.response, "eco: hola");
    }

    let stored = UserRepository::new(pool.clone())
        .find_by_id(admin.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.chatbot_mensajes_usados, 0);
}
