//! Password hashing using Argon2id
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
//! and carry their own parameters, so verification keeps working after the
//! configured cost changes.
//!
//! # Example
//!
//! ```rust,ignore
//! use mottu_api::auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(&config.password)?;
//! let hash = hasher.hash("segredo1")?;
//! assert!(hasher.verify("segredo1", &hash)?);
//! ```

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2Hasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::config::PasswordConfig;
use crate::error::Error;

/// Password hasher using Argon2id
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    min_password_length: usize,
    max_password_length: usize,
}

impl PasswordHasher {
    /// Build a hasher, rejecting Argon2 parameters out of range
    pub fn new(config: &PasswordConfig) -> Result<Self, Error> {
        let params = Params::new(
            config.memory_cost_kib,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(|e| {
            Error::Config(Box::new(figment::Error::from(format!(
                "Invalid Argon2 parameters: {}",
                e
            ))))
        })?;

        Ok(Self {
            params,
            min_password_length: config.min_password_length,
            max_password_length: config.max_password_length,
        })
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, Error> {
        let length = password.chars().count();
        if length < self.min_password_length || length > self.max_password_length {
            return Err(Error::ValidationError(format!(
                "senha must be between {} and {} characters",
                self.min_password_length, self.max_password_length
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Auth(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a PHC hash in constant time
    ///
    /// A mismatch is `Ok(false)`; a malformed hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, Error> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| Error::Auth(format!("Invalid password hash format: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Auth(format!("Password verification failed: {}", e))),
        }
    }

    /// Hash on the blocking thread pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, Error> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| Error::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// Verify on the blocking thread pool
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<bool, Error> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| Error::Internal(format!("Password verification task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::new(&PasswordConfig {
            memory_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast();
        let hash = hasher.hash("segredo1").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));

        assert!(hasher.verify("segredo1", &hash).unwrap());
        assert!(!hasher.verify("segredo2", &hash).unwrap());
    }

    #[test]
    fn test_length_limits() {
        let hasher = fast();
        assert!(matches!(hasher.hash("12345"), Err(Error::ValidationError(_))));
        assert!(hasher.hash("123456").is_ok());
        assert!(hasher.hash(&"x".repeat(60)).is_ok());
        assert!(matches!(
            hasher.hash(&"x".repeat(61)),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn test_invalid_params() {
        let result = PasswordHasher::new(&PasswordConfig {
            time_cost: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(matches!(
            fast().verify("segredo1", "not_a_valid_hash"),
            Err(Error::Auth(_))
        ));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hasher = fast();
        let hash1 = hasher.hash("segredo1").unwrap();
        let hash2 = hasher.hash("segredo1").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("segredo1", &hash1).unwrap());
        assert!(hasher.verify("segredo1", &hash2).unwrap());
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hasher = fast();
        let hash = hasher.hash_blocking("segredo1".to_string()).await.unwrap();
        assert!(hasher
            .verify_blocking("segredo1".to_string(), hash)
            .await
            .unwrap());
    }
}
