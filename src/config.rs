/// MFA engine configuration
///
/// Defaults match what authenticator apps implement: 6-digit SHA-1 codes,
/// 30-second periods, ±1 step of clock drift, 10 recovery codes.
#[derive(Debug, Clone)]
pub struct MfaConfig {
    /// Issuer name embedded in provisioning URIs
    pub issuer: String,
    /// OTP code length
    pub digits: u32,
    /// Time-step length in seconds
    pub period: u64,
    /// Accepted drift in steps on either side of the current one
    pub window: u64,
    /// Size of a recovery-code batch
    pub recovery_code_count: usize,
    /// Whether a recovery code may complete the activation step.
    /// Unusual (recovery codes normally presuppose an active factor), so it
    /// is an explicit policy knob rather than implicit behavior.
    pub allow_recovery_activation: bool,
}

impl Default for MfaConfig {
    fn default() -> Self {
        Self {
            issuer: "SecondFactor".to_string(),
            digits: 6,
            period: 30,
            window: 1,
            recovery_code_count: 10,
            allow_recovery_activation: true,
        }
    }
}

impl MfaConfig {
    /// Builds a config from the environment, falling back to defaults
    ///
    /// # Environment Variables
    /// * `MFA_ISSUER` - issuer label for provisioning URIs
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(issuer) = std::env::var("MFA_ISSUER") {
            if !issuer.is_empty() {
                config.issuer = issuer;
            }
        }
        config
    }
}
