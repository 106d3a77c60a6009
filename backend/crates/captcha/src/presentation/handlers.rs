//! HTTP Handlers

use crate::application::config::CaptchaConfig;
use crate::application::issue_challenge::IssueChallengeUseCase;
use crate::error::CaptchaResult;
use crate::presentation::dto::ChallengeResponse;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;

/// Shared state for captcha handlers
#[derive(Clone)]
pub struct CaptchaAppState {
    pub config: Arc<CaptchaConfig>,
}

/// GET /captcha
pub async fn issue_challenge(
    State(state): State<CaptchaAppState>,
) -> CaptchaResult<Json<ChallengeResponse>> {
    let use_case = IssueChallengeUseCase::new(state.config.clone());
    let challenge = use_case.execute()?;
    Ok(Json(challenge.into()))
}
