//! Resolve Destination Use Case
//!
//! Maps a form token to its delivery chat and checks the submitting origin
//! against the owner's allow-list.

use crate::domain::entities::FormToken;
use crate::domain::repository::{AllowedDomainRepository, FormTokenRepository};
use crate::error::{RelayError, RelayResult};
use kernel::id::FormTokenId;
use std::sync::Arc;

/// Resolve Destination Use Case
pub struct ResolveDestinationUseCase<R>
where
    R: FormTokenRepository + AllowedDomainRepository + Send + Sync,
{
    repo: Arc<R>,
}

impl<R> ResolveDestinationUseCase<R>
where
    R: FormTokenRepository + AllowedDomainRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Authorize a submission
    ///
    /// Checks run in order and the first failure is returned: token syntax,
    /// token lookup, origin presence, allow-list membership (exact match).
    pub async fn resolve(&self, token: &str, origin_host: Option<&str>) -> RelayResult<FormToken> {
        let form_token = self
            .resolve_token(token)
            .await?
            .ok_or(RelayError::InvalidToken)?;

        let origin = origin_host
            .filter(|host| !host.is_empty())
            .ok_or(RelayError::InvalidOrigin)?;

        let domains = self.repo.list_domains(form_token.owner_id).await?;
        if !domains.iter().any(|domain| domain.name == origin) {
            return Err(RelayError::DomainNotAllowed(origin.to_string()));
        }

        Ok(form_token)
    }

    /// Look up a token without any origin check (CC recipients)
    ///
    /// Malformed tokens resolve to `None` without touching storage.
    pub async fn resolve_token(&self, token: &str) -> RelayResult<Option<FormToken>> {
        let Some(id) = FormTokenId::parse_hyphenated(token.trim()) else {
            return Ok(None);
        };
        self.repo.find_token(id).await
    }
}
