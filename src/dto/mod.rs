//! DTOs compartidos de la API

pub mod api_response;
pub mod dashboard_dto;

pub use api_response::*;
