pub mod auth_controller;
pub mod chatbot_controller;
pub mod config_controller;
pub mod dashboard_controller;
pub mod experticia_controller;
pub mod notification_controller;
pub mod plantilla_controller;
pub mod solicitud_controller;
pub mod user_controller;
