pub mod errors;
pub mod jwt;
pub mod password;
pub mod validation;
