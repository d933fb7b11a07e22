//! Medidor de cuota del chatbot
//!
//! Los administradores no tienen límite ni se les cuenta el uso. Para el
//! resto, un mensaje se permite sólo si el chatbot está habilitado y el
//! contador no alcanzó el límite. En base de datos el incremento se hace con
//! un único `UPDATE ... WHERE usados < limite RETURNING` (ver
//! `UserRepository::try_consume_chatbot_message`); aquí sólo se clasifica
//! el estado leído para decidir si vale la pena intentarlo.

use serde_json::Value;

use crate::{
    models::{
        chatbot::{ChatbotStatus, LimitUpdate},
        user::{User, UserRole},
    },
    utils::errors::AppError,
};

/// Clasificación del estado de cuota de un usuario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaState {
    Unlimited,
    Available { remaining: i32 },
    Disabled,
    Exhausted { limite: i32 },
}

impl QuotaState {
    /// Error HTTP correspondiente a una denegación
    pub fn denial_error(&self) -> Option<AppError> {
        match self {
            QuotaState::Disabled => Some(AppError::Forbidden(
                "El chatbot está deshabilitado para tu cuenta. Contacta al administrador."
                    .to_string(),
            )),
            QuotaState::Exhausted { limite } => Some(AppError::QuotaExceeded(format!(
                "Has alcanzado el límite de {} mensajes. Contacta al administrador para aumentar tu límite.",
                limite
            ))),
            QuotaState::Unlimited | QuotaState::Available { .. } => None,
        }
    }
}

/// Estado actual de la cuota sin modificar nada
pub fn quota_state(user: &User) -> QuotaState {
    if user.role() == Some(UserRole::Admin) {
        return QuotaState::Unlimited;
    }
    if !user.chatbot_habilitado {
        return QuotaState::Disabled;
    }
    let limite = user.chatbot_limit();
    if user.chatbot_mensajes_usados >= limite {
        QuotaState::Exhausted { limite }
    } else {
        QuotaState::Available {
            remaining: limite - user.chatbot_mensajes_usados,
        }
    }
}

/// Estado del chatbot tal como se expone al cliente
pub fn status_for(user: &User) -> ChatbotStatus {
    let unlimited = user.role() == Some(UserRole::Admin);
    ChatbotStatus {
        habilitado: unlimited || user.chatbot_habilitado,
        mensajes_usados: user.chatbot_mensajes_usados,
        limite: (!unlimited).then(|| user.chatbot_limit()),
    }
}

/// Valida el lote completo de actualizaciones de límites. Si un solo
/// elemento es inválido se rechaza todo el lote.
pub fn validate_bulk_updates(updates: &Value) -> Result<Vec<LimitUpdate>, AppError> {
    let items = updates.as_array().ok_or_else(|| {
        AppError::BadRequest("Se requiere un array de actualizaciones".to_string())
    })?;

    items.iter().map(parse_update).collect()
}

fn parse_update(item: &Value) -> Result<LimitUpdate, AppError> {
    let invalid = || AppError::BadRequest("Formato de actualización inválido".to_string());

    let user_id = item
        .get("userId")
        .and_then(Value::as_i64)
        .filter(|id| *id > 0)
        .and_then(|id| i32::try_from(id).ok())
        .ok_or_else(invalid)?;
    let limite = item
        .get("limite")
        .and_then(Value::as_i64)
        .filter(|l| *l >= 0)
        .and_then(|l| i32::try_from(l).ok())
        .ok_or_else(invalid)?;
    let habilitado = item
        .get("habilitado")
        .and_then(Value::as_bool)
        .ok_or_else(invalid)?;

    Ok(LimitUpdate {
        user_id,
        limite,
        habilitado,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::fixtures::user_with_role;
    use serde_json::json;

    #[test]
    fn test_exhausted_user_is_denied() {
        let mut user = user_with_role("usuario");
        user.chatbot_limite_mensajes = Some(5);
        user.chatbot_mensajes_usados = 5;

        assert_eq!(quota_state(&user), QuotaState::Exhausted { limite: 5 });
        assert!(matches!(
            quota_state(&user).denial_error(),
            Some(AppError::QuotaExceeded(_))
        ));
    }

    #[test]
    fn test_admin_is_unlimited_and_untracked() {
        for (habilitado, usados, limite) in [(true, 0, Some(5)), (false, 99, Some(1)), (true, 30, None)] {
            let mut admin = user_with_role("admin");
            admin.chatbot_habilitado = habilitado;
            admin.chatbot_mensajes_usados = usados;
            admin.chatbot_limite_mensajes = limite;

            assert_eq!(quota_state(&admin), QuotaState::Unlimited);
        }
    }

    #[test]
    fn test_disabled_user_is_denied() {
        let mut user = user_with_role("supervisor");
        user.chatbot_habilitado = false;
        assert_eq!(quota_state(&user), QuotaState::Disabled);
        assert!(matches!(
            quota_state(&user).denial_error(),
            Some(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_remaining_uses_role_default_limit() {
        let mut user = user_with_role("usuario");
        user.chatbot_mensajes_usados = 19;
        assert_eq!(quota_state(&user), QuotaState::Available { remaining: 1 });

        user.chatbot_mensajes_usados = 20;
        assert_eq!(quota_state(&user), QuotaState::Exhausted { limite: 20 });
    }

    #[test]
    fn test_exhausted_message_cites_limit() {
        match (QuotaState::Exhausted { limite: 20 }).denial_error() {
            Some(AppError::QuotaExceeded(msg)) => assert!(msg.contains("límite de 20 mensajes")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_status_hides_limit_for_admin() {
        assert_eq!(status_for(&user_with_role("admin")).limite, None);
        assert_eq!(status_for(&user_with_role("usuario")).limite, Some(20));
    }

    #[test]
    fn test_bulk_updates_validation() {
        let valid = json!([
            {"userId": 3, "limite": 10, "habilitado": true},
            {"userId": 4, "limite": 0, "habilitado": false}
        ]);
        let parsed = validate_bulk_updates(&valid).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], LimitUpdate { user_id: 4, limite: 0, habilitado: false });

        for invalid in [
            json!({"userId": 3}),
            json!([{"userId": 3, "limite": "10", "habilitado": true}]),
            json!([{"userId": 3, "limite": 10, "habilitado": "si"}]),
            json!([{"limite": 10, "habilitado": true}]),
            json!([{"userId": 3, "limite": 10, "habilitado": true}, {"userId": 0, "limite": 1, "habilitado": true}]),
        ] {
            assert!(matches!(validate_bulk_updates(&invalid), Err(AppError::BadRequest(_))));
        }
    }
}
