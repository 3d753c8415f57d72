use super::hotp;
use crate::crypto::{HashAlgorithm, constant_time_eq};

/// Computes the TOTP code for a given Unix time (RFC 6238)
pub fn code_at<H: HashAlgorithm>(secret: &[u8], unix_time: u64, period: u64, digits: u32) -> String {
    hotp::generate::<H>(secret, unix_time / period, digits)
}

/// Verifies a TOTP code against a secret with drift tolerance
///
/// # Arguments
/// * `code` - Code as submitted by the user
/// * `unix_time` - Current wall-clock time in seconds
/// * `period` - Time-step length in seconds (30 for authenticator apps)
/// * `digits` - Expected code length
/// * `window` - Accepted drift in steps on either side (1 means ±1 step)
///
/// # Behavior
/// The submitted code must be exactly `digits` ASCII digits before any
/// crypto runs. Candidate codes for every counter in `[-window, +window]`
/// are compared with [`constant_time_eq`], and all candidates are checked
/// even after a match so timing does not reveal which step matched.
pub fn verify_at<H: HashAlgorithm>(
    secret: &[u8],
    code: &str,
    unix_time: u64,
    period: u64,
    digits: u32,
    window: u64,
) -> bool {
    if code.len() != digits as usize || !code.chars().all(|c| c.is_ascii_digit()) {
        tracing::warn!("Rejected OTP code with invalid format");
        return false;
    }

    let counter = unix_time / period;
    let mut matched = false;

    for k in -(window as i64)..=(window as i64) {
        let Some(candidate_counter) = counter.checked_add_signed(k) else {
            continue;
        };
        let candidate = hotp::generate::<H>(secret, candidate_counter, digits);
        matched |= constant_time_eq(candidate.as_bytes(), code.as_bytes());
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sha1::Sha1;
    use crate::encoding;

    const RFC6238_SECRET: &[u8] = b"12345678901234567890";
    const PERIOD: u64 = 30;

    #[test]
    fn test_rfc6238_appendix_b_vectors() {
        let vectors = [
            (59u64, "94287082"),
            (1111111109, "07081804"),
            (1111111111, "14050471"),
            (1234567890, "89005924"),
            (2000000000, "69279037"),
        ];
        for (time, want) in vectors {
            assert_eq!(
                code_at::<Sha1>(RFC6238_SECRET, time, PERIOD, 8),
                want,
                "TOTP mismatch at time {}",
                time
            );
        }
    }

    #[test]
    fn test_pinned_reference_code() {
        // Secret JBSWY3DPEHPK3PXP at Unix time 59 (counter 1) must always
        // produce this exact 6-digit code
        let secret = encoding::decode("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(code_at::<Sha1>(&secret, 59, PERIOD, 6), "996554");
        assert!(verify_at::<Sha1>(&secret, "996554", 59, PERIOD, 6, 1));
    }

    #[test]
    fn test_drift_window_accepts_adjacent_steps() {
        let now = 1_700_000_015u64;
        let previous = code_at::<Sha1>(RFC6238_SECRET, now - PERIOD, PERIOD, 6);
        let next = code_at::<Sha1>(RFC6238_SECRET, now + PERIOD, PERIOD, 6);

        assert!(verify_at::<Sha1>(RFC6238_SECRET, &previous, now, PERIOD, 6, 1));
        assert!(verify_at::<Sha1>(RFC6238_SECRET, &next, now, PERIOD, 6, 1));
    }

    #[test]
    fn test_drift_window_rejects_distant_steps() {
        let now = 1_700_000_015u64;
        let two_behind = code_at::<Sha1>(RFC6238_SECRET, now - 2 * PERIOD, PERIOD, 6);
        let two_ahead = code_at::<Sha1>(RFC6238_SECRET, now + 2 * PERIOD, PERIOD, 6);

        assert!(!verify_at::<Sha1>(RFC6238_SECRET, &two_behind, now, PERIOD, 6, 1));
        assert!(!verify_at::<Sha1>(RFC6238_SECRET, &two_ahead, now, PERIOD, 6, 1));
    }

    #[test]
    fn test_verify_rejects_malformed_codes() {
        assert!(!verify_at::<Sha1>(RFC6238_SECRET, "12345", 59, PERIOD, 6, 1));
        assert!(!verify_at::<Sha1>(RFC6238_SECRET, "1234567", 59, PERIOD, 6, 1));
        assert!(!verify_at::<Sha1>(RFC6238_SECRET, "12345a", 59, PERIOD, 6, 1));
        assert!(!verify_at::<Sha1>(RFC6238_SECRET, "", 59, PERIOD, 6, 1));
    }

    #[test]
    fn test_window_zero_is_exact_step_only() {
        let now = 1_700_000_015u64;
        let current = code_at::<Sha1>(RFC6238_SECRET, now, PERIOD, 6);
        let previous = code_at::<Sha1>(RFC6238_SECRET, now - PERIOD, PERIOD, 6);

        assert!(verify_at::<Sha1>(RFC6238_SECRET, &current, now, PERIOD, 6, 0));
        assert!(!verify_at::<Sha1>(RFC6238_SECRET, &previous, now, PERIOD, 6, 0));
    }
}
