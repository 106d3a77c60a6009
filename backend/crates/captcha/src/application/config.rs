//! Application Configuration
//!
//! Configuration for the captcha application layer.

use std::time::Duration;

/// Captcha application configuration
#[derive(Clone)]
pub struct CaptchaConfig {
    /// Shared HMAC key used to sign challenges
    pub hmac_key: Vec<u8>,
    /// Upper bound of the secret number (proof-of-work difficulty)
    pub max_number: u64,
    /// How long an issued challenge stays solvable
    pub challenge_ttl: Duration,
    /// Random salt length in bytes (hex-encoded on the wire)
    pub salt_len: usize,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            hmac_key: Vec::new(),
            max_number: 100_000,
            challenge_ttl: Duration::from_secs(120),
            salt_len: 12,
        }
    }
}

impl std::fmt::Debug for CaptchaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptchaConfig")
            .field("hmac_key", &"<redacted>")
            .field("max_number", &self.max_number)
            .field("challenge_ttl", &self.challenge_ttl)
            .field("salt_len", &self.salt_len)
            .finish()
    }
}

impl CaptchaConfig {
    pub fn with_key(hmac_key: impl Into<Vec<u8>>) -> Self {
        Self {
            hmac_key: hmac_key.into(),
            ..Default::default()
        }
    }

    /// Config with a random key (for development; proofs die with the process)
    pub fn with_random_key() -> Self {
        Self::with_key(platform::crypto::random_bytes(32))
    }

    pub fn challenge_ttl_secs(&self) -> i64 {
        self.challenge_ttl.as_secs() as i64
    }
}
