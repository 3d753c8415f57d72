/// Error type for Base32 decoding
#[derive(Debug, PartialEq, Eq)]
pub enum Base32Error {
    InvalidSymbol(char),
    InvalidPadding,
}

impl std::fmt::Display for Base32Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Base32Error::InvalidSymbol(c) => write!(f, "Invalid Base32 symbol '{}'", c),
            Base32Error::InvalidPadding => write!(f, "Base32 padding may only appear at the end"),
        }
    }
}

impl std::error::Error for Base32Error {}

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Encodes bytes as RFC 4648 Base32 with `=` padding
///
/// # Example
/// ```rust
/// use second_factor::encoding::encode;
/// assert_eq!(encode(b"foobar"), "MZXW6YTBOI======");
/// ```
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(5) * 8);
    let mut acc: u32 = 0;
    let mut bits = 0;

    for &byte in data {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[(acc >> bits) as usize & 0x1F] as char);
        }
    }

    if bits > 0 {
        out.push(ALPHABET[(acc << (5 - bits)) as usize & 0x1F] as char);
    }

    // Pad to a full 8-symbol group
    while out.len() % 8 != 0 {
        out.push('=');
    }

    out
}

/// Decodes an RFC 4648 Base32 string to bytes
///
/// # Behavior
/// - Case-insensitive
/// - `=` padding is optional but must be trailing
/// - Unknown symbols are rejected, never skipped
/// - A trailing partial byte (fewer than 8 leftover bits) is discarded
pub fn decode(input: &str) -> Result<Vec<u8>, Base32Error> {
    let mut out = Vec::with_capacity(input.len() * 5 / 8);
    let mut acc: u32 = 0;
    let mut bits = 0;
    let mut padding_seen = false;

    for c in input.chars() {
        if c == '=' {
            padding_seen = true;
            continue;
        }
        if padding_seen {
            return Err(Base32Error::InvalidPadding);
        }

        let value = match c.to_ascii_uppercase() {
            c @ 'A'..='Z' => c as u32 - 'A' as u32,
            c @ '2'..='7' => c as u32 - '2' as u32 + 26,
            _ => return Err(Base32Error::InvalidSymbol(c)),
        };

        acc = (acc << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4648_vectors_encode() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"f"), "MY======");
        assert_eq!(encode(b"fo"), "MZXQ====");
        assert_eq!(encode(b"foo"), "MZXW6===");
        assert_eq!(encode(b"foob"), "MZXW6YQ=");
        assert_eq!(encode(b"fooba"), "MZXW6YTB");
        assert_eq!(encode(b"foobar"), "MZXW6YTBOI======");
    }

    #[test]
    fn test_rfc4648_vectors_decode() {
        assert_eq!(decode("MY======").unwrap(), b"f");
        assert_eq!(decode("MZXW6===").unwrap(), b"foo");
        assert_eq!(decode("MZXW6YTBOI======").unwrap(), b"foobar");
    }

    #[test]
    fn test_decode_without_padding() {
        assert_eq!(decode("MZXW6").unwrap(), b"foo");
        assert_eq!(decode("MZXW6YTBOI").unwrap(), b"foobar");
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(decode("mzxw6ytboi").unwrap(), b"foobar");
        assert_eq!(decode("jbswy3dpehpk3pxp").unwrap(), decode("JBSWY3DPEHPK3PXP").unwrap());
    }

    #[test]
    fn test_decode_rejects_unknown_symbols() {
        assert_eq!(decode("MZXW0"), Err(Base32Error::InvalidSymbol('0')));
        assert_eq!(decode("MZ XW"), Err(Base32Error::InvalidSymbol(' ')));
        assert_eq!(decode("MZXW!"), Err(Base32Error::InvalidSymbol('!')));
    }

    #[test]
    fn test_decode_rejects_interior_padding() {
        assert_eq!(decode("MY==MY=="), Err(Base32Error::InvalidPadding));
    }

    #[test]
    fn test_round_trip_all_lengths() {
        // Cover every tail length 0..=4 of the 5-byte quantum
        for len in 0..64usize {
            let data: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            let encoded = encode(&data);
            assert_eq!(
                decode(&encoded).unwrap(),
                data,
                "round trip failed for length {}",
                len
            );
        }
    }

    #[test]
    fn test_known_secret_decodes_to_expected_bytes() {
        let bytes = decode("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(bytes, [0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x21, 0xDE, 0xAD, 0xBE, 0xEF]);
    }
}
