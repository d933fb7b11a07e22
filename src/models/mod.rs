//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL, junto con los requests de la API que los crean
//! o modifican.

pub mod auth;
pub mod chatbot;
pub mod config;
pub mod experticia;
pub mod historial;
pub mod notification;
pub mod plantilla;
pub mod solicitud;
pub mod user;
