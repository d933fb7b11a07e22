//! Middleware del sistema
//!
//! Autenticación por sesión, guard de administrador, CORS y rate limiting
//! del login.

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::*;
pub use cors::*;
pub use rate_limit::*;
