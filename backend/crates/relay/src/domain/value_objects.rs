//! Domain Value Objects
//!
//! Immutable value types for the relay domain.

use std::fmt;

/// Telegram chat a message is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database id of a registered owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub i64);

/// Database id of an allow-listed domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainId(pub i64);

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage limit shared by form names and domain names
pub const NAME_MAX_LEN: usize = 50;

/// Form name chosen by the owner (`/get_token NAME`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormName(String);

impl FormName {
    /// A single whitespace-free word of at most 50 characters
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty()
            || raw.chars().count() > NAME_MAX_LEN
            || raw.chars().any(char::is_whitespace)
        {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Allow-listed hostname (`/add_domain DOMAIN`)
///
/// Accepts dotted labels of `[A-Za-z0-9-]` (at least two labels),
/// `localhost` and `127.0.0.1`. Stored as typed; origin hosts must match
/// it exactly, case included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainName(String);

impl DomainName {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() > NAME_MAX_LEN {
            return None;
        }
        if raw == "localhost" || raw == "127.0.0.1" {
            return Some(Self(raw.to_string()));
        }

        let mut labels = 0;
        for label in raw.split('.') {
            if label.is_empty()
                || !label
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-')
            {
                return None;
            }
            labels += 1;
        }
        if labels < 2 {
            return None;
        }

        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
