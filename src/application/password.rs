//! Password hashing with Argon2.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::app_error::{AppError, AppResult};

pub fn hash(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn matches(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash("secret1").unwrap();

        assert!(matches("secret1", &hashed).unwrap());
        assert!(!matches("secret2", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash("secret1").unwrap();
        let b = hash("secret1").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_stored_hash_is_an_error() {
        assert!(matches("secret1", "not-a-phc-string").is_err());
    }
}
