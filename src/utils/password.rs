//! Hash y verificación de contraseñas con bcrypt

use std::sync::OnceLock;

use bcrypt::{hash, verify, DEFAULT_COST};

use super::errors::AppError;

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    verify(password, password_hash)
        .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))
}

/// Verificación contra un hash fijo para usuarios inexistentes, de modo que
/// el tiempo de respuesta no delate si el username existe
pub fn dummy_verify(password: &str) {
    let dummy = DUMMY_HASH.get_or_init(|| hash("ter-system", DEFAULT_COST).unwrap_or_default());
    let _ = verify(password, dummy);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hashed = hash_password("s3creta").unwrap();
        assert_ne!(hashed, "s3creta");
        assert!(verify_password("s3creta", &hashed).unwrap());
        assert!(!verify_password("otra", &hashed).unwrap());
    }

    #[test]
    fn test_verify_with_malformed_hash_is_error() {
        assert!(matches!(
            verify_password("x", "no-es-un-hash"),
            Err(AppError::Hash(_))
        ));
    }
}
