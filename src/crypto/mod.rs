pub mod cipher;
pub mod hmac;
pub mod secure_hash;
pub mod sha1;

/// Digest primitive seam for the OTP layers
///
/// HOTP/TOTP are written against this trait rather than a concrete digest,
/// so the shipped [`sha1::Sha1`] can be swapped for a vetted library
/// implementation without touching protocol logic.
pub trait HashAlgorithm {
    /// Compression block length in bytes (the HMAC padding width)
    const BLOCK_LEN: usize;
    /// Digest output length in bytes
    const OUTPUT_LEN: usize;
    /// Algorithm label as it appears in provisioning URIs
    const NAME: &'static str;

    fn digest(data: &[u8]) -> Vec<u8>;
}

/// Compares two byte slices without short-circuiting on the first mismatch
///
/// Used for OTP code comparison so that a mismatch takes the same time
/// regardless of how many leading bytes agree. Length is not secret here
/// (code length is public), so differing lengths return early.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
