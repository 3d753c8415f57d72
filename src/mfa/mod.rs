pub mod recovery;

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    config::MfaConfig,
    crypto::{cipher, secure_hash::SecureHash, sha1::Sha1, HashAlgorithm},
    encoding,
    error::MfaError,
    otp::totp,
    store::{AccountSecurityRecord, AccountSecurityStore, MfaState, RecoveryCodeSlot},
};

/// Proof submitted for verification or disable: exactly one factor,
/// enforced by the type rather than by a runtime check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationInput {
    Totp(String),
    Recovery(String),
}

/// Everything the enrolling user needs, returned exactly once.
/// Only hashed/sealed forms are persisted; none of this is retrievable again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningBundle {
    /// Base32 secret for manual authenticator entry
    pub secret: String,
    /// otpauth:// URI consumed by authenticator apps
    pub otpauth_uri: String,
    /// Display form with all but the last four characters masked
    pub masked_secret: String,
    /// Plaintext recovery codes
    pub recovery_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationResult {
    pub activated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryCodeBundle {
    pub codes: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisableResult {
    pub disabled_at: DateTime<Utc>,
}

/// TOTP multi-factor authentication service
///
/// Drives the `Unset -> Provisioned -> Active` lifecycle over an
/// [`AccountSecurityStore`] port. All collaborators are injected; the
/// service holds no global state. Failed verify/disable attempts leave the
/// record untouched — counting them for throttling is the caller's job.
pub struct MfaService<S, H> {
    store: S,
    hasher: H,
    config: MfaConfig,
    encryption_key: [u8; 32],
}

impl<S, H> MfaService<S, H>
where
    S: AccountSecurityStore,
    H: SecureHash,
{
    pub fn new(store: S, hasher: H, config: MfaConfig, encryption_key: [u8; 32]) -> Self {
        Self {
            store,
            hasher,
            config,
            encryption_key,
        }
    }

    /// Provisions a fresh MFA secret and recovery codes for an account
    ///
    /// # Preconditions
    /// The account exists and MFA is not already active. Re-running setup on
    /// a provisioned-but-unverified account replaces the pending secret.
    ///
    /// # Side Effects
    /// Persists the sealed secret and hashed recovery codes; `mfa_enabled`
    /// stays `false` until [`Self::verify`] succeeds.
    pub fn setup(&self, account_id: &str) -> Result<ProvisioningBundle, MfaError> {
        let record = self.load(account_id)?;
        if record.mfa_enabled {
            tracing::warn!(account_id = %account_id, "Setup attempted while MFA is active");
            return Err(MfaError::AlreadyActive);
        }

        // 160 bits of entropy, the RFC 4226 recommended minimum
        let mut secret_bytes = [0u8; 20];
        OsRng.fill_bytes(&mut secret_bytes);
        let secret = encoding::encode(&secret_bytes);

        let sealed = cipher::seal_secret(&secret_bytes, &self.encryption_key)?;

        let recovery_codes = recovery::generate_batch(self.config.recovery_code_count);
        let slots = self.hash_batch(&recovery_codes)?;

        let mut next = record.clone();
        next.mfa_secret = Some(sealed);
        next.mfa_enabled = false;
        next.mfa_recovery_codes = slots;
        next.updated_at = Utc::now();
        self.store.update(next, record.version)?;

        tracing::info!(account_id = %account_id, "MFA secret provisioned");

        Ok(ProvisioningBundle {
            otpauth_uri: self.provisioning_uri(account_id, &secret),
            masked_secret: mask_secret(&secret),
            recovery_codes,
            secret,
        })
    }

    /// Activates MFA after a first successful proof of possession
    ///
    /// Accepts either factor of [`VerificationInput`]; a recovery code is
    /// only honored when `allow_recovery_activation` is set. On failure the
    /// record is untouched and the error is a generic `InvalidCode`.
    pub fn verify(
        &self,
        account_id: &str,
        input: VerificationInput,
    ) -> Result<ActivationResult, MfaError> {
        self.verify_at(account_id, input, unix_now())
    }

    /// [`Self::verify`] with an explicit time, for deterministic callers
    pub fn verify_at(
        &self,
        account_id: &str,
        input: VerificationInput,
        unix_time: u64,
    ) -> Result<ActivationResult, MfaError> {
        let record = self.load(account_id)?;
        match record.state() {
            MfaState::Unset => return Err(MfaError::NotProvisioned),
            MfaState::Active => return Err(MfaError::AlreadyActive),
            MfaState::Provisioned => {}
        }

        let mut next = record.clone();
        let proven = match input {
            VerificationInput::Totp(code) => self.check_totp(&record, &code, unix_time)?,
            VerificationInput::Recovery(code) => {
                // Policy gate rejects like a mismatch so the response does
                // not reveal which branch was taken
                self.config.allow_recovery_activation
                    && self.consume_recovery_code(&mut next.mfa_recovery_codes, &code)
            }
        };

        if !proven {
            tracing::warn!(account_id = %account_id, "Invalid code during MFA activation");
            return Err(MfaError::InvalidCode);
        }

        let activated_at = Utc::now();
        next.mfa_enabled = true;
        next.updated_at = activated_at;
        self.store.update(next, record.version)?;

        tracing::info!(account_id = %account_id, "MFA activated");
        Ok(ActivationResult { activated_at })
    }

    /// Replaces the entire recovery-code set, given a currently valid TOTP code
    ///
    /// Recovery codes are deliberately not accepted as proof here: a backup
    /// factor must not mint further backup factors. Previously issued codes
    /// are invalid the moment this returns.
    pub fn regenerate_codes(
        &self,
        account_id: &str,
        totp_code: &str,
    ) -> Result<RecoveryCodeBundle, MfaError> {
        self.regenerate_codes_at(account_id, totp_code, unix_now())
    }

    /// [`Self::regenerate_codes`] with an explicit time
    pub fn regenerate_codes_at(
        &self,
        account_id: &str,
        totp_code: &str,
        unix_time: u64,
    ) -> Result<RecoveryCodeBundle, MfaError> {
        let record = self.load(account_id)?;
        if record.state() != MfaState::Active {
            return Err(MfaError::NotProvisioned);
        }

        if !self.check_totp(&record, totp_code, unix_time)? {
            tracing::warn!(account_id = %account_id, "Invalid code during recovery-code regeneration");
            return Err(MfaError::InvalidCode);
        }

        let codes = recovery::generate_batch(self.config.recovery_code_count);
        let slots = self.hash_batch(&codes)?;

        let generated_at = Utc::now();
        let mut next = record.clone();
        next.mfa_recovery_codes = slots;
        next.updated_at = generated_at;
        self.store.update(next, record.version)?;

        tracing::info!(account_id = %account_id, "Recovery codes regenerated");
        Ok(RecoveryCodeBundle {
            codes,
            generated_at,
        })
    }

    /// Disables MFA and clears the stored secret and recovery codes
    ///
    /// The `enforced_2fa` policy flag wins over code correctness: enforced
    /// accounts get `PolicyViolation` without any code being checked.
    /// A successful disable returns the record to the unprovisioned state;
    /// re-enrollment starts from scratch.
    pub fn disable(
        &self,
        account_id: &str,
        input: VerificationInput,
    ) -> Result<DisableResult, MfaError> {
        self.disable_at(account_id, input, unix_now())
    }

    /// [`Self::disable`] with an explicit time
    pub fn disable_at(
        &self,
        account_id: &str,
        input: VerificationInput,
        unix_time: u64,
    ) -> Result<DisableResult, MfaError> {
        let record = self.load(account_id)?;
        if record.enforced_2fa {
            tracing::warn!(account_id = %account_id, "Disable attempted on enforced-2FA account");
            return Err(MfaError::PolicyViolation);
        }
        if record.state() != MfaState::Active {
            return Err(MfaError::NotProvisioned);
        }

        let mut next = record.clone();
        let proven = match input {
            VerificationInput::Totp(code) => self.check_totp(&record, &code, unix_time)?,
            VerificationInput::Recovery(code) => {
                self.consume_recovery_code(&mut next.mfa_recovery_codes, &code)
            }
        };

        if !proven {
            tracing::warn!(account_id = %account_id, "Invalid code during MFA disable");
            return Err(MfaError::InvalidCode);
        }

        let disabled_at = Utc::now();
        next.mfa_secret = None;
        next.mfa_enabled = false;
        next.mfa_recovery_codes.clear();
        next.updated_at = disabled_at;
        self.store.update(next, record.version)?;

        tracing::info!(account_id = %account_id, "MFA disabled and secret cleared");
        Ok(DisableResult { disabled_at })
    }

    fn load(&self, account_id: &str) -> Result<AccountSecurityRecord, MfaError> {
        self.store.get(account_id)?.ok_or(MfaError::NotFound)
    }

    fn check_totp(
        &self,
        record: &AccountSecurityRecord,
        code: &str,
        unix_time: u64,
    ) -> Result<bool, MfaError> {
        let sealed = record.mfa_secret.as_deref().ok_or(MfaError::NotProvisioned)?;
        let secret = cipher::open_secret(sealed, &self.encryption_key)?;

        Ok(totp::verify_at::<Sha1>(
            &secret,
            code,
            unix_time,
            self.config.period,
            self.config.digits,
            self.config.window,
        ))
    }

    /// Marks the first matching unconsumed slot as consumed. A consumed or
    /// unknown code is just "no match"; the caller reports it generically.
    fn consume_recovery_code(&self, slots: &mut [RecoveryCodeSlot], code: &str) -> bool {
        let Some(normalized) = recovery::normalize(code) else {
            return false;
        };

        for slot in slots.iter_mut().filter(|s| !s.consumed) {
            if self.hasher.verify(&normalized, &slot.hash) {
                slot.consumed = true;
                return true;
            }
        }
        false
    }

    fn hash_batch(&self, codes: &[String]) -> Result<Vec<RecoveryCodeSlot>, MfaError> {
        codes
            .iter()
            .map(|code| {
                let normalized = recovery::normalize(code)
                    .ok_or_else(|| MfaError::Internal("generated code failed normalization".to_string()))?;
                Ok(RecoveryCodeSlot {
                    hash: self.hasher.hash(&normalized)?,
                    consumed: false,
                })
            })
            .collect()
    }

    fn provisioning_uri(&self, account_label: &str, secret: &str) -> String {
        format!(
            "otpauth://totp/{issuer}:{label}?secret={secret}&issuer={issuer}&algorithm={algorithm}&digits={digits}&period={period}",
            issuer = self.config.issuer,
            label = account_label,
            secret = secret,
            algorithm = Sha1::NAME,
            digits = self.config.digits,
            period = self.config.period,
        )
    }
}

/// Masks all but the last four characters of a secret for display
fn mask_secret(secret: &str) -> String {
    let visible = secret.len().saturating_sub(4);
    secret
        .chars()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { c })
        .collect()
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
