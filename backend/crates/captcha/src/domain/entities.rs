//! Domain Entities
//!
//! Core business entities for the captcha domain.

use crate::domain::value_objects::{Algorithm, Salt};

/// Challenge handed to the browser
///
/// The browser searches `0..=max_number` for the number whose
/// `SHA-256(salt ‖ number)` equals `challenge`.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub algorithm: Algorithm,
    /// Lowercase hex SHA-256
    pub challenge: String,
    pub max_number: u64,
    pub salt: Salt,
    /// Lowercase hex HMAC-SHA256 of `challenge`
    pub signature: String,
}

impl Challenge {
    pub fn expires_at_secs(&self) -> Option<i64> {
        self.salt.expires_at_secs()
    }
}

/// Solution submitted back with the form
#[derive(Debug, Clone)]
pub struct Solution {
    /// Algorithm name as sent by the client
    pub algorithm: String,
    pub challenge: String,
    pub number: u64,
    pub salt: Salt,
    pub signature: String,
}
