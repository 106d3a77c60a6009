//! Domain Value Objects
//!
//! Immutable value types for the captcha domain.

use std::fmt;

/// Hash algorithm used for challenges. Only SHA-256 is ever issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Sha256,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sha256 => "SHA-256",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SHA-256" => Some(Algorithm::Sha256),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Challenge salt: random hex followed by `?expires=<unix seconds>`
///
/// The expiry travels inside the salt, so it is covered by the signed
/// challenge hash and cannot be extended by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt(String);

impl Salt {
    pub fn new(random_hex: &str, expires_at_secs: i64) -> Self {
        Self(format!("{random_hex}?expires={expires_at_secs}"))
    }

    /// Wrap a client-supplied salt without validating it
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expiry in unix seconds, if the salt carries a numeric `expires` param
    pub fn expires_at_secs(&self) -> Option<i64> {
        let (_, query) = self.0.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "expires")
            .and_then(|(_, value)| value.parse::<i64>().ok())
    }
}
