//! Domain Entities
//!
//! Core business entities for the relay domain.

use crate::domain::value_objects::{ChatId, DomainId, OwnerId};
use chrono::{DateTime, Utc};
use kernel::id::FormTokenId;

/// Account registered through the control channel (`/start`)
#[derive(Debug, Clone)]
pub struct Owner {
    pub id: OwnerId,
    pub telegram_user_id: i64,
    pub telegram_user_name: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Owner {
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }
}

/// Owner data for registration
#[derive(Debug, Clone)]
pub struct NewOwner {
    pub telegram_user_id: i64,
    pub telegram_user_name: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
}

/// Form token: the secret a submitting form posts to
///
/// Immutable once issued; revocation deletes it.
#[derive(Debug, Clone)]
pub struct FormToken {
    pub id: FormTokenId,
    pub owner_id: OwnerId,
    pub name: String,
    /// Chat the token was issued in; submissions are delivered there
    pub chat_id: ChatId,
    pub created_at: DateTime<Utc>,
}

impl FormToken {
    pub fn issue(owner_id: OwnerId, name: String, chat_id: ChatId) -> Self {
        Self {
            id: FormTokenId::new(),
            owner_id,
            name,
            chat_id,
            created_at: Utc::now(),
        }
    }
}

/// Allow-listed origin hostname
#[derive(Debug, Clone)]
pub struct AllowedDomain {
    pub id: DomainId,
    pub owner_id: OwnerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
