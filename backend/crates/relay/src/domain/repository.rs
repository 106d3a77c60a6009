//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entities::{AllowedDomain, FormToken, NewOwner, Owner};
use crate::domain::value_objects::{DomainId, OwnerId};
use crate::error::RelayResult;
use kernel::id::FormTokenId;

/// Owner repository trait
#[trait_variant::make(OwnerRepository: Send)]
pub trait LocalOwnerRepository {
    /// Find owner by Telegram user ID
    async fn find_owner_by_telegram_id(&self, telegram_user_id: i64)
    -> RelayResult<Option<Owner>>;

    /// Register an owner, returning the existing one if already registered
    async fn create_owner(&self, owner: &NewOwner) -> RelayResult<Owner>;
}

/// Form token repository trait
#[trait_variant::make(FormTokenRepository: Send)]
pub trait LocalFormTokenRepository {
    /// Find token by ID
    async fn find_token(&self, id: FormTokenId) -> RelayResult<Option<FormToken>>;

    /// Find an owner's token by form name
    async fn find_token_by_name(
        &self,
        owner_id: OwnerId,
        name: &str,
    ) -> RelayResult<Option<FormToken>>;

    /// Store a newly issued token
    async fn create_token(&self, token: &FormToken) -> RelayResult<()>;

    /// All tokens of an owner, oldest first
    async fn list_tokens(&self, owner_id: OwnerId) -> RelayResult<Vec<FormToken>>;

    /// Revoke a token. Returns false when the owner has no such token.
    async fn delete_token(&self, id: FormTokenId, owner_id: OwnerId) -> RelayResult<bool>;
}

/// Allowed domain repository trait
#[trait_variant::make(AllowedDomainRepository: Send)]
pub trait LocalAllowedDomainRepository {
    /// All domains of an owner, oldest first
    async fn list_domains(&self, owner_id: OwnerId) -> RelayResult<Vec<AllowedDomain>>;

    /// Find an owner's domain by ID
    async fn find_domain(
        &self,
        id: DomainId,
        owner_id: OwnerId,
    ) -> RelayResult<Option<AllowedDomain>>;

    /// Check if the owner already allow-listed this name
    async fn domain_exists(&self, owner_id: OwnerId, name: &str) -> RelayResult<bool>;

    /// Allow-list a domain
    async fn create_domain(&self, owner_id: OwnerId, name: &str) -> RelayResult<AllowedDomain>;

    /// Remove a domain. Returns false when the owner has no such domain.
    async fn delete_domain(&self, id: DomainId, owner_id: OwnerId) -> RelayResult<bool>;
}

/// Everything the relay needs from storage
pub trait RelayRepository:
    OwnerRepository + FormTokenRepository + AllowedDomainRepository + Clone + Send + Sync + 'static
{
}

impl<R> RelayRepository for R where
    R: OwnerRepository
        + FormTokenRepository
        + AllowedDomainRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
