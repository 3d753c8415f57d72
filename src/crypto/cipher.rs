use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use rand_core::{OsRng, RngCore};
use zeroize::Zeroizing;

/// Error type for secret-at-rest encryption
#[derive(Debug)]
pub enum CipherError {
    KeyNotFound,
    InvalidKey,
    SealFailed,
    OpenFailed,
}

impl std::fmt::Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CipherError::KeyNotFound => {
                write!(f, "MFA_ENCRYPTION_KEY environment variable not set")
            }
            CipherError::InvalidKey => write!(f, "Invalid encryption key"),
            CipherError::SealFailed => write!(f, "Failed to encrypt MFA secret"),
            CipherError::OpenFailed => write!(f, "Failed to decrypt MFA secret"),
        }
    }
}

impl std::error::Error for CipherError {}

/// Loads the secret-at-rest encryption key from the environment
///
/// # Environment Variable
/// `MFA_ENCRYPTION_KEY` - 64 hex characters (32 bytes)
///
/// # Returns
/// * `Ok([u8; 32])` - The 32-byte encryption key
/// * `Err(CipherError)` - If the key is missing or malformed
pub fn load_encryption_key() -> Result<[u8; 32], CipherError> {
    let key_hex = std::env::var("MFA_ENCRYPTION_KEY").map_err(|_| {
        tracing::error!("MFA_ENCRYPTION_KEY environment variable not set");
        CipherError::KeyNotFound
    })?;

    let key_bytes = hex::decode(&key_hex).map_err(|_| {
        tracing::error!("MFA_ENCRYPTION_KEY contains invalid hex characters");
        CipherError::InvalidKey
    })?;

    key_bytes.try_into().map_err(|_| {
        tracing::error!("MFA_ENCRYPTION_KEY must be exactly 32 bytes (64 hex characters)");
        CipherError::InvalidKey
    })
}

/// Encrypts raw secret bytes for storage using AES-256-GCM
///
/// # Storage Format
/// `[12 bytes: nonce][N bytes: ciphertext + 16-byte auth tag]`
///
/// A fresh random nonce is drawn per call, so sealing the same secret twice
/// yields different ciphertexts.
pub fn seal_secret(secret: &[u8], key: &[u8; 32]) -> Result<Vec<u8>, CipherError> {
    let cipher = Aes256Gcm::new(key.into());

    let mut nonce_bytes = [0u8; 12];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from(nonce_bytes);

    let ciphertext = cipher.encrypt(&nonce, secret).map_err(|_| {
        tracing::error!("Failed to encrypt MFA secret");
        CipherError::SealFailed
    })?;

    let mut sealed = nonce_bytes.to_vec();
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Decrypts a stored MFA secret
///
/// The auth tag is verified, so tampered or wrong-key ciphertexts fail with
/// `CipherError::OpenFailed`. The plaintext is returned in a [`Zeroizing`]
/// buffer and wiped when dropped.
pub fn open_secret(sealed: &[u8], key: &[u8; 32]) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    if sealed.len() < 12 {
        tracing::error!("Sealed MFA secret is too short");
        return Err(CipherError::OpenFailed);
    }

    let cipher = Aes256Gcm::new(key.into());
    let nonce_bytes: [u8; 12] = sealed[..12]
        .try_into()
        .map_err(|_| CipherError::OpenFailed)?;
    let nonce = Nonce::from(nonce_bytes);

    let plaintext = cipher.decrypt(&nonce, &sealed[12..]).map_err(|_| {
        tracing::error!("Failed to decrypt MFA secret (wrong key or tampered data)");
        CipherError::OpenFailed
    })?;

    Ok(Zeroizing::new(plaintext))
}
