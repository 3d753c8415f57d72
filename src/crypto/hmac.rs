use super::HashAlgorithm;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// Computes an HMAC over `message` with `key`, generic over the digest
///
/// Keys longer than the digest block are first hashed down; shorter keys are
/// right-padded with zeros to the block length (RFC 2104).
pub fn mac<H: HashAlgorithm>(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut block_key = if key.len() > H::BLOCK_LEN {
        H::digest(key)
    } else {
        key.to_vec()
    };
    block_key.resize(H::BLOCK_LEN, 0);

    let mut inner: Vec<u8> = block_key.iter().map(|b| b ^ IPAD).collect();
    let mut outer: Vec<u8> = block_key.iter().map(|b| b ^ OPAD).collect();

    inner.extend_from_slice(message);
    outer.extend_from_slice(&H::digest(&inner));
    H::digest(&outer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sha1::Sha1;

    fn hmac_sha1_hex(key: &[u8], message: &[u8]) -> String {
        hex::encode(mac::<Sha1>(key, message))
    }

    #[test]
    fn test_rfc2202_case_1() {
        assert_eq!(
            hmac_sha1_hex(&[0x0B; 20], b"Hi There"),
            "b617318655057264e28bc0b6fb378c8ef146be00"
        );
    }

    #[test]
    fn test_rfc2202_case_2() {
        assert_eq!(
            hmac_sha1_hex(b"Jefe", b"what do ya want for nothing?"),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }

    #[test]
    fn test_short_key_is_zero_padded() {
        assert_eq!(
            hmac_sha1_hex(b"key", b"The quick brown fox jumps over the lazy dog"),
            "de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9"
        );
    }

    #[test]
    fn test_oversized_key_is_hashed_first() {
        // A 100-byte key exceeds the 64-byte SHA-1 block and must be
        // pre-hashed before padding
        assert_eq!(
            hmac_sha1_hex(&[b'k'; 100], b"long key message"),
            "bc9366e011bffdd94765a8aa67775b34bb499c45"
        );
    }
}
