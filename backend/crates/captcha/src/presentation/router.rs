//! Captcha Router

use crate::application::config::CaptchaConfig;
use crate::presentation::handlers::{self, CaptchaAppState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Create the captcha router
pub fn captcha_router(config: Arc<CaptchaConfig>) -> Router {
    let state = CaptchaAppState { config };

    Router::new()
        .route("/captcha", get(handlers::issue_challenge))
        .with_state(state)
}
