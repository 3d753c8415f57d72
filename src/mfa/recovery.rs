use rand_core::{OsRng, RngCore};

/// 32-symbol alphabet with the ambiguous 0/1/I/O left out
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LEN: usize = 12;
const GROUP_SIZE: usize = 4;

/// Generates a batch of plaintext recovery codes in grouped display form
///
/// Codes look like `XXXX-XXXX-XXXX` (12 symbols, 60 bits of entropy each).
/// The caller hashes them for storage; plaintext is shown exactly once.
pub fn generate_batch(count: usize) -> Vec<String> {
    (0..count).map(|_| generate_code()).collect()
}

fn generate_code() -> String {
    let mut raw = [0u8; CODE_LEN];
    OsRng.fill_bytes(&mut raw);

    let normalized: String = raw
        .iter()
        // 256 is a multiple of the alphabet size, so indexing is unbiased
        .map(|&byte| CODE_ALPHABET[usize::from(byte) % CODE_ALPHABET.len()] as char)
        .collect();
    format(&normalized)
}

/// Normalizes user input for verification: strips separators, uppercases,
/// and checks length and alphabet. Returns `None` for anything that cannot
/// be a recovery code, so the caller can reject it as a generic mismatch.
pub fn normalize(input: &str) -> Option<String> {
    let normalized: String = input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalized.len() != CODE_LEN {
        return None;
    }
    if !normalized.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
        return None;
    }

    Some(normalized)
}

fn format(normalized: &str) -> String {
    normalized
        .as_bytes()
        .chunks(GROUP_SIZE)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_codes_are_grouped() {
        for code in generate_batch(10) {
            assert_eq!(code.len(), CODE_LEN + 2, "12 symbols plus two hyphens");
            let parts: Vec<&str> = code.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert!(parts.iter().all(|p| p.len() == GROUP_SIZE));
        }
    }

    #[test]
    fn test_generated_codes_use_safe_alphabet() {
        for code in generate_batch(10) {
            assert!(
                code.chars()
                    .filter(|&c| c != '-')
                    .all(|c| CODE_ALPHABET.contains(&(c as u8))),
                "code {} contains a symbol outside the alphabet",
                code
            );
        }
    }

    #[test]
    fn test_generated_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in generate_batch(100) {
            assert!(seen.insert(code), "generated duplicate recovery code");
        }
    }

    #[test]
    fn test_normalize_strips_separators_and_case() {
        assert_eq!(normalize("abcd-efgh-jklm"), Some("ABCDEFGHJKLM".to_string()));
        assert_eq!(normalize("ABCD EFGH JKLM"), Some("ABCDEFGHJKLM".to_string()));
    }

    #[test]
    fn test_normalize_round_trips_generated_codes() {
        for code in generate_batch(10) {
            let normalized = normalize(&code).expect("generated code must normalize");
            assert_eq!(format(&normalized), code);
        }
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert_eq!(normalize("too-short"), None);
        assert_eq!(normalize("ABCD-EFGH-JKL0"), None, "0 is not in the alphabet");
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("ABCD-EFGH-JKLM-XTRA"), None);
    }
}
