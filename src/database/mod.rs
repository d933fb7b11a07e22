//! Módulo de base de datos
//!
//! Conexión, migraciones y datos iniciales de PostgreSQL

pub mod connection;

pub use connection::{bootstrap_admin, connect, run_migrations};
