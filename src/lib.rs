//! TOTP multi-factor authentication engine.
//!
//! Implements the OTP stack from first principles — Base32, SHA-1,
//! HMAC-SHA1, HOTP (RFC 4226), TOTP (RFC 6238) — and the enrollment,
//! activation, recovery-code and disable state machine on top of it.
//! Persistence and at-rest hashing are ports ([`store::AccountSecurityStore`],
//! [`crypto::secure_hash::SecureHash`]); HTTP, rate limiting and audit
//! logging belong to the caller.

pub mod config;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod mfa;
pub mod otp;
pub mod store;

pub use config::MfaConfig;
pub use error::MfaError;
pub use mfa::{
    ActivationResult, DisableResult, MfaService, ProvisioningBundle, RecoveryCodeBundle,
    VerificationInput,
};
pub use store::{AccountSecurityRecord, AccountSecurityStore, InMemoryStore, MfaState};
