//! Verify Solution Use Case

use crate::application::config::CaptchaConfig;
use crate::domain::services::check_solution;
use crate::error::CaptchaResult;
use crate::presentation::dto::SolutionPayload;
use std::sync::Arc;

/// Verifies captcha proofs submitted with forms
///
/// Cheap to clone; shares the configuration.
#[derive(Debug, Clone)]
pub struct CaptchaVerifier {
    config: Arc<CaptchaConfig>,
}

impl CaptchaVerifier {
    pub fn new(config: Arc<CaptchaConfig>) -> Self {
        Self { config }
    }

    /// `true` only for a well-formed, correctly signed, unexpired proof
    pub fn verify(&self, proof: &str) -> bool {
        match self.check(proof) {
            Ok(()) => true,
            Err(e) => {
                e.log();
                false
            }
        }
    }

    pub fn check(&self, proof: &str) -> CaptchaResult<()> {
        self.check_at(proof, chrono::Utc::now().timestamp())
    }

    pub fn check_at(&self, proof: &str, now_secs: i64) -> CaptchaResult<()> {
        let solution = SolutionPayload::decode(proof)?.into_solution();
        check_solution(
            &solution,
            &self.config.hmac_key,
            self.config.max_number,
            now_secs,
        )
    }
}
