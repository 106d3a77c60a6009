//! API DTOs (Data Transfer Objects)

use crate::domain::entities::{Challenge, Solution};
use crate::domain::value_objects::Salt;
use crate::error::{CaptchaError, CaptchaResult};
use serde::{Deserialize, Serialize};

/// Response for GET /captcha
///
/// Field names follow the ALTCHA widget's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub algorithm: String,
    pub challenge: String,
    pub maxnumber: u64,
    pub salt: String,
    pub signature: String,
}

impl From<Challenge> for ChallengeResponse {
    fn from(challenge: Challenge) -> Self {
        Self {
            algorithm: challenge.algorithm.as_str().to_string(),
            challenge: challenge.challenge,
            maxnumber: challenge.max_number,
            salt: challenge.salt.as_str().to_string(),
            signature: challenge.signature,
        }
    }
}

/// Solved challenge as posted in the `altcha` form field (base64 JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionPayload {
    pub algorithm: String,
    pub challenge: String,
    pub number: u64,
    pub salt: String,
    pub signature: String,
}

impl SolutionPayload {
    pub fn decode(encoded: &str) -> CaptchaResult<Self> {
        let bytes =
            platform::crypto::from_base64(encoded.trim()).map_err(|_| CaptchaError::MalformedPayload)?;
        serde_json::from_slice(&bytes).map_err(|_| CaptchaError::MalformedPayload)
    }

    pub fn encode(&self) -> String {
        // Serializing a plain struct of strings and integers cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        platform::crypto::to_base64(&json)
    }

    pub fn into_solution(self) -> Solution {
        Solution {
            algorithm: self.algorithm,
            challenge: self.challenge,
            number: self.number,
            salt: Salt::from_raw(self.salt),
            signature: self.signature,
        }
    }
}
