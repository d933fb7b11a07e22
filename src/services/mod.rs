//! Servicios
//!
//! Reglas de negocio puras (roles, ciclo de vida de solicitudes,
//! suspensiones, cuota del chatbot), textos de notificación, el cliente
//! del LLM y las tareas periódicas.

pub mod background_tasks;
pub mod lifecycle_guard;
pub mod llm_client;
pub mod notification_messages;
pub mod quota_meter;
pub mod role_policy;
pub mod suspension_gate;
