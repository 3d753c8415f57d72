use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Error type for the account-security persistence port
#[derive(Debug)]
pub enum StoreError {
    /// The record changed since it was read (version mismatch)
    Conflict,
    /// Backend failure unrelated to versioning
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict => write!(f, "Record version mismatch"),
            StoreError::Backend(reason) => write!(f, "Store backend error: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// A stored recovery-code hash and its consumption flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryCodeSlot {
    /// PHC-format hash of the normalized code
    pub hash: String,
    /// Set once the code has been redeemed; consumed codes never match again
    pub consumed: bool,
}

/// MFA lifecycle state, derived from the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MfaState {
    /// No secret provisioned
    Unset,
    /// Secret stored but never proven (mfa_enabled = false)
    Provisioned,
    /// Secret proven at least once (mfa_enabled = true)
    Active,
}

/// Security-relevant slice of an account record
///
/// The secret is stored AES-256-GCM sealed, never raw; recovery codes are
/// stored as salted hashes. `version` backs optimistic concurrency at the
/// persistence boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSecurityRecord {
    pub id: String,
    /// Sealed secret bytes (nonce-prefixed AES-256-GCM ciphertext)
    pub mfa_secret: Option<Vec<u8>>,
    pub mfa_enabled: bool,
    pub mfa_recovery_codes: Vec<RecoveryCodeSlot>,
    /// Policy flag; when set, disabling MFA is rejected
    pub enforced_2fa: bool,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl AccountSecurityRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mfa_secret: None,
            mfa_enabled: false,
            mfa_recovery_codes: Vec::new(),
            enforced_2fa: false,
            version: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn state(&self) -> MfaState {
        match (&self.mfa_secret, self.mfa_enabled) {
            (None, _) => MfaState::Unset,
            (Some(_), false) => MfaState::Provisioned,
            (Some(_), true) => MfaState::Active,
        }
    }
}

/// Persistence port for account security records
///
/// `update` is compare-and-swap on the record version: the write succeeds
/// only if the stored version still equals `expected_version`, and the
/// persisted record carries `expected_version + 1`. Mutating MFA operations
/// are thereby serialized per account.
pub trait AccountSecurityStore: Send + Sync {
    fn get(&self, account_id: &str) -> Result<Option<AccountSecurityRecord>, StoreError>;

    fn update(
        &self,
        record: AccountSecurityRecord,
        expected_version: u64,
    ) -> Result<AccountSecurityRecord, StoreError>;
}

impl<T: AccountSecurityStore + ?Sized> AccountSecurityStore for std::sync::Arc<T> {
    fn get(&self, account_id: &str) -> Result<Option<AccountSecurityRecord>, StoreError> {
        (**self).get(account_id)
    }

    fn update(
        &self,
        record: AccountSecurityRecord,
        expected_version: u64,
    ) -> Result<AccountSecurityRecord, StoreError> {
        (**self).update(record, expected_version)
    }
}

/// In-memory `AccountSecurityStore` for tests and embedding
pub struct InMemoryStore {
    records: Mutex<HashMap<String, AccountSecurityRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Seeds a record, overwriting any existing one
    pub fn put(&self, record: AccountSecurityRecord) {
        let mut records = self.records.lock().expect("store mutex poisoned");
        records.insert(record.id.clone(), record);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountSecurityStore for InMemoryStore {
    fn get(&self, account_id: &str) -> Result<Option<AccountSecurityRecord>, StoreError> {
        let records = self.records.lock().expect("store mutex poisoned");
        Ok(records.get(account_id).cloned())
    }

    fn update(
        &self,
        mut record: AccountSecurityRecord,
        expected_version: u64,
    ) -> Result<AccountSecurityRecord, StoreError> {
        let mut records = self.records.lock().expect("store mutex poisoned");
        let current = records
            .get(&record.id)
            .ok_or_else(|| StoreError::Backend("update of unknown account".to_string()))?;

        if current.version != expected_version {
            return Err(StoreError::Conflict);
        }

        record.version = expected_version + 1;
        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }
}
