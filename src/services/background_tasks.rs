//! Tareas periódicas
//!
//! Barrido de suspensiones vencidas y limpieza de notificaciones antiguas.
//! Ambas corren en su propio `tokio::spawn` y se detienen al apagar el
//! servidor.

use std::time::Duration;

use sqlx::PgPool;
use tokio::{task::JoinHandle, time::interval};
use tracing::{debug, error, info};

use crate::{
    config::SweepConfig,
    models::user::User,
    repositories::{NotificationRepository, UserRepository},
    services::notification_messages,
    utils::errors::AppError,
};

/// Avisa al usuario reactivado y a los administradores
pub async fn notify_suspension_lifted(
    notifications: &NotificationRepository,
    user: &User,
) -> Result<(), AppError> {
    notifications
        .create(user.id, None, &notification_messages::suspension_lifted_for_user())
        .await?;
    notifications
        .notify_admins(
            None,
            &notification_messages::suspension_lifted_for_admins(&user.nombre, &user.username),
        )
        .await?;
    Ok(())
}

/// Levanta todas las suspensiones vencidas. Devuelve cuántas se levantaron.
pub async fn sweep_expired_suspensions(pool: &PgPool) -> Result<usize, AppError> {
    let users = UserRepository::new(pool.clone());
    let notifications = NotificationRepository::new(pool.clone());

    let lifted = users.lift_expired_suspensions().await?;
    for user in &lifted {
        info!("🔓 Suspensión levantada automáticamente: {}", user.username);
        if let Err(e) = notify_suspension_lifted(&notifications, user).await {
            error!("❌ Error notificando reactivación de {}: {}", user.username, e);
        }
    }

    Ok(lifted.len())
}

pub async fn cleanup_notifications(pool: &PgPool, sweeps: &SweepConfig) -> Result<u64, AppError> {
    let (admins, others) = NotificationRepository::new(pool.clone())
        .cleanup_old(
            sweeps.admin_notification_retention_hours,
            sweeps.user_notification_retention_hours,
        )
        .await?;

    if admins + others > 0 {
        info!(
            "🧹 Notificaciones eliminadas: {} de administradores, {} de usuarios",
            admins, others
        );
    }
    Ok(admins + others)
}

/// Handles de las tareas en ejecución
pub struct BackgroundTasks {
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    pub fn spawn(pool: PgPool, sweeps: SweepConfig) -> Self {
        let suspension_pool = pool.clone();
        let suspension_every = Duration::from_secs(sweeps.suspension_sweep_secs.max(1));
        let suspensions = tokio::spawn(async move {
            let mut ticker = interval(suspension_every);
            loop {
                ticker.tick().await;
                match sweep_expired_suspensions(&suspension_pool).await {
                    Ok(0) => debug!("Sin suspensiones vencidas"),
                    Ok(n) => info!("✅ {} suspensiones levantadas", n),
                    Err(e) => error!("❌ Error en barrido de suspensiones: {}", e),
                }
            }
        });

        let cleanup_every = Duration::from_secs(sweeps.notification_sweep_secs.max(1));
        let cleanup = tokio::spawn(async move {
            let mut ticker = interval(cleanup_every);
            loop {
                ticker.tick().await;
                if let Err(e) = cleanup_notifications(&pool, &sweeps).await {
                    error!("❌ Error limpiando notificaciones: {}", e);
                }
            }
        });

        info!(
            "⏱️ Tareas periódicas iniciadas (suspensiones cada {}s, notificaciones cada {}s)",
            suspension_every.as_secs(),
            cleanup_every.as_secs()
        );

        Self {
            handles: vec![suspensions, cleanup],
        }
    }

    pub fn shutdown(self) {
        for handle in self.handles {
            handle.abort();
        }
        info!("🛑 Tareas periódicas detenidas");
    }
}
