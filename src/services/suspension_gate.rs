//! Gate de suspensión de cuentas
//!
//! Decide si un usuario puede iniciar sesión según su estado (bloqueado,
//! suspendido, inactivo) y cuándo suspenderlo automáticamente tras varios
//! intentos fallidos. No toca la base de datos: el controller aplica las
//! transiciones que indica la decisión.

use chrono::{DateTime, Duration, Utc};

use crate::{
    config::SuspensionPolicy,
    models::user::{User, UserStatus},
};

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;

/// Motivo por el que se rechaza un login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginDenial {
    Blocked,
    /// `remaining` es `None` cuando la suspensión es indefinida
    Suspended { remaining: Option<Duration> },
    Inactive,
}

impl LoginDenial {
    pub fn message(&self) -> String {
        match self {
            LoginDenial::Blocked => "Cuenta Bloqueada".to_string(),
            LoginDenial::Suspended {
                remaining: Some(remaining),
            } => format!(
                "Cuenta Suspendida ({})",
                format_remaining(remaining.num_milliseconds())
            ),
            LoginDenial::Suspended { remaining: None } => "Cuenta Suspendida".to_string(),
            LoginDenial::Inactive => "Usuario inactivo".to_string(),
        }
    }
}

/// Resultado de evaluar el estado de la cuenta antes de verificar la
/// contraseña
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginDecision {
    /// La suspensión venció: hay que volver la cuenta a `activo` y limpiar
    /// los campos de suspensión antes de continuar
    pub suspension_expired: bool,
    pub denial: Option<LoginDenial>,
}

impl LoginDecision {
    pub fn is_allowed(&self) -> bool {
        self.denial.is_none()
    }

    pub fn seconds_remaining(&self) -> Option<i64> {
        match self.denial {
            Some(LoginDenial::Suspended {
                remaining: Some(remaining),
            }) => Some(remaining.num_seconds()),
            _ => None,
        }
    }
}

/// Evalúa si la cuenta puede intentar iniciar sesión en `now`
pub fn evaluate_login(user: &User, now: DateTime<Utc>) -> LoginDecision {
    let mut suspension_expired = false;

    match user.status {
        UserStatus::Bloqueado => {
            return LoginDecision {
                suspension_expired,
                denial: Some(LoginDenial::Blocked),
            };
        }
        UserStatus::Suspendido => match user.tiempo_suspension {
            Some(end) if now < end => {
                return LoginDecision {
                    suspension_expired,
                    denial: Some(LoginDenial::Suspended {
                        remaining: Some(end - now),
                    }),
                };
            }
            Some(_) => suspension_expired = true,
            None => {
                return LoginDecision {
                    suspension_expired,
                    denial: Some(LoginDenial::Suspended { remaining: None }),
                };
            }
        },
        UserStatus::Activo => {}
    }

    let denial = (!user.activo).then_some(LoginDenial::Inactive);
    LoginDecision {
        suspension_expired,
        denial,
    }
}

/// Resultado de registrar un intento fallido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedAttemptOutcome {
    pub new_counter: i32,
    pub auto_suspended: bool,
}

impl FailedAttemptOutcome {
    /// Decide a partir del contador ya incrementado
    pub fn from_counter(new_counter: i32, policy: &SuspensionPolicy) -> Self {
        Self {
            new_counter,
            auto_suspended: new_counter >= policy.max_failed_attempts,
        }
    }
}

/// Fin de una suspensión automática iniciada en `now`
pub fn auto_suspension_end(now: DateTime<Utc>, policy: &SuspensionPolicy) -> DateTime<Utc> {
    now + Duration::hours(policy.suspension_hours)
}

/// Motivo guardado en `motivo_suspension` para suspensiones automáticas
pub fn auto_suspension_reason(policy: &SuspensionPolicy) -> String {
    format!(
        "Múltiples intentos fallidos de acceso ({} intentos)",
        policy.max_failed_attempts
    )
}

/// Mensaje devuelto al cliente en el intento que provoca la suspensión
pub fn auto_suspension_message(policy: &SuspensionPolicy) -> String {
    format!(
        "Cuenta Suspendida ({})",
        format_remaining(policy.suspension_hours * MS_PER_HOUR)
    )
}

/// Formatea el tiempo restante como "X horas y Y minutos"
///
/// Las horas se truncan y los minutos del resto se redondean hacia arriba;
/// 60 minutos se acumulan en una hora más.
pub fn format_remaining(remaining_ms: i64) -> String {
    let remaining_ms = remaining_ms.max(0);
    let mut hours = remaining_ms / MS_PER_HOUR;
    let rest = remaining_ms % MS_PER_HOUR;
    let mut minutes = (rest + MS_PER_MINUTE - 1) / MS_PER_MINUTE;

    if minutes == 60 {
        hours += 1;
        minutes = 0;
    }

    if hours > 0 {
        let mut text = plural(hours, "hora");
        if minutes > 0 {
            text.push_str(" y ");
            text.push_str(&plural(minutes, "minuto"));
        }
        text
    } else {
        plural(minutes.max(1), "minuto")
    }
}

fn plural(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}
