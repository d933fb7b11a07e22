//! Repositorios
//!
//! Acceso a PostgreSQL por tabla. Cada repositorio envuelve un `PgPool`
//! y devuelve `AppError` para que los controladores propaguen con `?`.

pub mod chatbot_repository;
pub mod config_repository;
pub mod experticia_repository;
pub mod historial_repository;
pub mod notification_repository;
pub mod plantilla_repository;
pub mod solicitud_repository;
pub mod user_repository;

pub use chatbot_repository::ChatbotRepository;
pub use config_repository::ConfigRepository;
pub use experticia_repository::ExperticiaRepository;
pub use historial_repository::HistorialRepository;
pub use notification_repository::NotificationRepository;
pub use plantilla_repository::PlantillaRepository;
pub use solicitud_repository::SolicitudRepository;
pub use user_repository::{NewUser, UserRepository};
