//! Form Relay Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Owners, form tokens, allowed domains, repository and
//!   transport traits, submission normalizing and message composing
//! - `application/` - Use cases (authorize, submit, dispatch, control channel)
//! - `infra/` - PostgreSQL repository and Telegram Bot API client
//! - `presentation/` - HTTP handlers, DTOs, rate limit middleware, router
//!
//! ## Submission pipeline
//! `POST /{token}` is rate limited per client IP, authorized by token and
//! origin domain, normalized, captcha-checked when a proof is present, and
//! answered immediately. Delivery to the owner's chat (and up to two CC
//! recipients) runs on a detached task.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use infra::postgres::PgRelayRepository;
pub use infra::telegram::TelegramClient;
pub use presentation::router::{control_router, public_router};
