//! Relay Router

use crate::domain::repository::RelayRepository;
use crate::domain::transport::MessageTransport;
use crate::presentation::handlers::{self, RelayAppState};
use axum::{
    Router,
    routing::{get, post},
};

/// Public submission endpoint: `POST /{token}`
///
/// Callers add rate limiting and CORS around it.
pub fn public_router<R, T>(state: RelayAppState<R, T>) -> Router
where
    R: RelayRepository,
    T: MessageTransport + Send + Sync + 'static,
{
    Router::new()
        .route("/{token}", post(handlers::submit_form::<R, T>))
        .with_state(state)
}

/// Bot webhook at `webhook_path` and `GET /health`
pub fn control_router<R, T>(state: RelayAppState<R, T>, webhook_path: &str) -> Router
where
    R: RelayRepository,
    T: MessageTransport + Send + Sync + 'static,
{
    Router::new()
        .route(webhook_path, post(handlers::telegram_webhook::<R, T>))
        .route("/health", get(handlers::health))
        .with_state(state)
}
