//! Issue Challenge Use Case

use crate::application::config::CaptchaConfig;
use crate::domain::entities::Challenge;
use crate::domain::services::build_challenge;
use crate::domain::value_objects::Salt;
use crate::error::{CaptchaError, CaptchaResult};
use platform::crypto::{random_bytes, random_up_to, to_hex};
use std::sync::Arc;

/// Issue Challenge Use Case
pub struct IssueChallengeUseCase {
    config: Arc<CaptchaConfig>,
}

impl IssueChallengeUseCase {
    pub fn new(config: Arc<CaptchaConfig>) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> CaptchaResult<Challenge> {
        self.execute_at(chrono::Utc::now().timestamp())
    }

    pub fn execute_at(&self, now_secs: i64) -> CaptchaResult<Challenge> {
        if self.config.hmac_key.is_empty() {
            return Err(CaptchaError::Internal("captcha HMAC key is not set".into()));
        }

        let expires_at = now_secs + self.config.challenge_ttl_secs();
        let salt = Salt::new(&to_hex(&random_bytes(self.config.salt_len)), expires_at);
        let number = random_up_to(self.config.max_number);

        let challenge = build_challenge(&self.config.hmac_key, salt, number, self.config.max_number);

        tracing::debug!(
            expires_at,
            max_number = self.config.max_number,
            "Issued captcha challenge"
        );

        Ok(challenge)
    }
}
