use crate::crypto::cipher::CipherError;
use crate::crypto::secure_hash::SecureHashError;
use crate::store::StoreError;

/// Error type for MFA service operations
///
/// `InvalidCode` is deliberately generic: a wrong TOTP code, a wrong
/// recovery code and an already-consumed recovery code all surface
/// identically so callers cannot build an oracle over which factor failed.
/// No variant ever carries a secret or a recovery code.
#[derive(Debug)]
pub enum MfaError {
    /// Malformed input outside the code-verification path
    Validation(String),
    /// No account record for the given id
    NotFound,
    /// Verify/regenerate attempted before setup completed
    NotProvisioned,
    /// Verify attempted while MFA is already enabled
    AlreadyActive,
    /// TOTP or recovery code did not match
    InvalidCode,
    /// Disable attempted while the enforced-2FA policy flag is set
    PolicyViolation,
    /// Concurrent write detected at the persistence boundary
    Conflict,
    /// Missing or malformed deployment configuration
    Configuration(String),
    /// Crypto or storage failure unrelated to the submitted input
    Internal(String),
}

impl std::fmt::Display for MfaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MfaError::Validation(reason) => write!(f, "Validation failed: {}", reason),
            MfaError::NotFound => write!(f, "Account not found"),
            MfaError::NotProvisioned => write!(f, "MFA has not been set up for this account"),
            MfaError::AlreadyActive => write!(f, "MFA is already active for this account"),
            MfaError::InvalidCode => write!(f, "Invalid code"),
            MfaError::PolicyViolation => write!(f, "MFA is enforced for this account"),
            MfaError::Conflict => write!(f, "Account record was modified concurrently"),
            MfaError::Configuration(reason) => write!(f, "Configuration error: {}", reason),
            MfaError::Internal(reason) => write!(f, "Internal error: {}", reason),
        }
    }
}

impl std::error::Error for MfaError {}

impl From<CipherError> for MfaError {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::KeyNotFound | CipherError::InvalidKey => {
                MfaError::Configuration(err.to_string())
            }
            CipherError::SealFailed | CipherError::OpenFailed => {
                MfaError::Internal(err.to_string())
            }
        }
    }
}

impl From<SecureHashError> for MfaError {
    fn from(err: SecureHashError) -> Self {
        MfaError::Internal(err.to_string())
    }
}

impl From<StoreError> for MfaError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => MfaError::Conflict,
            StoreError::Backend(reason) => MfaError::Internal(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_code_message_names_no_factor() {
        // Must not hint whether a TOTP or a recovery code failed
        let message = MfaError::InvalidCode.to_string();
        assert_eq!(message, "Invalid code");
    }

    #[test]
    fn test_store_conflict_maps_to_conflict() {
        assert!(matches!(MfaError::from(StoreError::Conflict), MfaError::Conflict));
    }
}
