use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;

/// Error type for at-rest hashing operations
#[derive(Debug)]
pub enum SecureHashError {
    InvalidParams,
    HashingFailed,
}

impl std::fmt::Display for SecureHashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecureHashError::InvalidParams => write!(f, "Invalid parameters for secure hashing"),
            SecureHashError::HashingFailed => write!(f, "Secure hashing failed"),
        }
    }
}

impl std::error::Error for SecureHashError {}

/// One-way hashing port for recovery-code at-rest storage
///
/// Deliberately the same shape as a login password hasher, so deployments
/// can reuse that utility instead of [`Argon2SecureHash`].
pub trait SecureHash: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, SecureHashError>;
    fn verify(&self, plaintext: &str, stored: &str) -> bool;
}

/// Argon2id implementation of [`SecureHash`]
///
/// Parameters:
/// - Memory cost: 19456 KiB (19 MiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
pub struct Argon2SecureHash;

impl Argon2SecureHash {
    fn hasher() -> Result<Argon2<'static>, SecureHashError> {
        let params = Params::new(19456, 2, 1, None).map_err(|_| {
            tracing::error!("Invalid Argon2 parameters");
            SecureHashError::InvalidParams
        })?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl SecureHash for Argon2SecureHash {
    fn hash(&self, plaintext: &str) -> Result<String, SecureHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::hasher()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|_| {
                tracing::error!("Argon2 hashing failed");
                SecureHashError::HashingFailed
            })?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            tracing::warn!("Stored hash is not a valid PHC string");
            return false;
        };
        let Ok(hasher) = Self::hasher() else {
            return false;
        };
        hasher.verify_password(plaintext.as_bytes(), &parsed).is_ok()
    }
}
