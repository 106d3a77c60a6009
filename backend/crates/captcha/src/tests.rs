//! Unit tests for the captcha crate

#[cfg(test)]
mod support {
    use crate::application::config::CaptchaConfig;
    use crate::domain::entities::Challenge;
    use crate::domain::services::challenge_hash;
    use crate::presentation::dto::SolutionPayload;

    pub const KEY: &[u8] = b"unit-test-hmac-key";

    pub fn small_config() -> CaptchaConfig {
        CaptchaConfig {
            max_number: 2_000,
            ..CaptchaConfig::with_key(KEY)
        }
    }

    /// Brute-force the secret number the way the browser widget does
    pub fn solve(challenge: &Challenge) -> u64 {
        (0..=challenge.max_number)
            .find(|n| challenge_hash(&challenge.salt, *n) == challenge.challenge)
            .expect("challenge must be solvable within its bound")
    }

    pub fn encode_solution(challenge: &Challenge, number: u64) -> String {
        SolutionPayload {
            algorithm: challenge.algorithm.as_str().to_string(),
            challenge: challenge.challenge.clone(),
            number,
            salt: challenge.salt.as_str().to_string(),
            signature: challenge.signature.clone(),
        }
        .encode()
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = CaptchaConfig::default();

        assert!(config.hmac_key.is_empty());
        assert_eq!(config.max_number, 100_000);
        assert_eq!(config.challenge_ttl, Duration::from_secs(120));
        assert_eq!(config.salt_len, 12);
        assert_eq!(config.challenge_ttl_secs(), 120);
    }

    #[test]
    fn test_with_random_key() {
        let config1 = CaptchaConfig::with_random_key();
        let config2 = CaptchaConfig::with_random_key();

        assert_eq!(config1.hmac_key.len(), 32);
        assert_ne!(config1.hmac_key, config2.hmac_key);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = CaptchaConfig::with_key(b"super-secret".to_vec());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}

#[cfg(test)]
mod issue_tests {
    use super::support::*;
    use crate::application::config::CaptchaConfig;
    use crate::application::issue_challenge::IssueChallengeUseCase;
    use crate::domain::services::sign_challenge;
    use crate::error::CaptchaError;
    use std::sync::Arc;

    #[test]
    fn test_issued_challenge_shape() {
        let use_case = IssueChallengeUseCase::new(Arc::new(small_config()));
        let challenge = use_case.execute_at(1_000).unwrap();

        assert_eq!(challenge.max_number, 2_000);
        assert_eq!(challenge.expires_at_secs(), Some(1_120));
        assert_eq!(challenge.challenge.len(), 64);
        assert_eq!(challenge.signature, sign_challenge(KEY, &challenge.challenge));

        // 12 random bytes, hex encoded, before the expiry parameter.
        let (random, _) = challenge.salt.as_str().split_once('?').unwrap();
        assert_eq!(random.len(), 24);
        assert!(random.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_salts_are_unique() {
        let use_case = IssueChallengeUseCase::new(Arc::new(small_config()));
        let a = use_case.execute_at(0).unwrap();
        let b = use_case.execute_at(0).unwrap();
        assert_ne!(a.salt, b.salt);
    }

    #[test]
    fn test_issued_challenge_is_solvable() {
        let use_case = IssueChallengeUseCase::new(Arc::new(small_config()));
        let challenge = use_case.execute().unwrap();
        assert!(solve(&challenge) <= challenge.max_number);
    }

    #[test]
    fn test_missing_key_is_internal_error() {
        let use_case = IssueChallengeUseCase::new(Arc::new(CaptchaConfig::default()));
        assert!(matches!(use_case.execute(), Err(CaptchaError::Internal(_))));
    }
}

#[cfg(test)]
mod verify_tests {
    use super::support::*;
    use crate::application::config::CaptchaConfig;
    use crate::application::issue_challenge::IssueChallengeUseCase;
    use crate::application::verify_solution::CaptchaVerifier;
    use crate::error::CaptchaError;
    use std::sync::Arc;

    fn setup() -> (IssueChallengeUseCase, CaptchaVerifier) {
        let config = Arc::new(small_config());
        (
            IssueChallengeUseCase::new(config.clone()),
            CaptchaVerifier::new(config),
        )
    }

    #[test]
    fn test_solved_challenge_verifies() {
        let (issuer, verifier) = setup();
        let challenge = issuer.execute().unwrap();
        let proof = encode_solution(&challenge, solve(&challenge));

        assert!(verifier.verify(&proof));
    }

    #[test]
    fn test_proof_is_replayable_until_expiry() {
        let (issuer, verifier) = setup();
        let challenge = issuer.execute_at(1_000).unwrap();
        let proof = encode_solution(&challenge, solve(&challenge));

        assert!(verifier.check_at(&proof, 1_010).is_ok());
        assert!(verifier.check_at(&proof, 1_100).is_ok());
        assert!(matches!(
            verifier.check_at(&proof, 1_121),
            Err(CaptchaError::Expired)
        ));
    }

    #[test]
    fn test_wrong_number_rejected() {
        let (issuer, verifier) = setup();
        let challenge = issuer.execute().unwrap();
        let number = solve(&challenge);
        let wrong = if number == 0 { 1 } else { number - 1 };

        assert!(!verifier.verify(&encode_solution(&challenge, wrong)));
    }

    #[test]
    fn test_other_server_key_rejected() {
        let (issuer, _) = setup();
        let challenge = issuer.execute().unwrap();
        let proof = encode_solution(&challenge, solve(&challenge));

        let foreign = CaptchaVerifier::new(Arc::new(CaptchaConfig {
            max_number: 2_000,
            ..CaptchaConfig::with_key(b"another-key".to_vec())
        }));
        assert!(matches!(foreign.check(&proof), Err(CaptchaError::Mismatch)));
    }

    #[test]
    fn test_garbage_rejected() {
        let (_, verifier) = setup();

        for proof in ["", "not base64 !!", "e30=", "bnVsbA=="] {
            assert!(
                matches!(verifier.check(proof), Err(CaptchaError::MalformedPayload)),
                "{proof:?} should be malformed"
            );
            assert!(!verifier.verify(proof));
        }
    }
}

#[cfg(test)]
mod router_tests {
    use super::support::*;
    use crate::application::verify_solution::CaptchaVerifier;
    use crate::domain::entities::Challenge;
    use crate::domain::value_objects::{Algorithm, Salt};
    use crate::presentation::dto::ChallengeResponse;
    use crate::presentation::router::captcha_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_get_captcha_returns_challenge() {
        let config = Arc::new(small_config());
        let app = captcha_router(config.clone());

        let response = app
            .oneshot(Request::get("/captcha").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let dto: ChallengeResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(dto.algorithm, "SHA-256");
        assert_eq!(dto.maxnumber, 2_000);
        assert!(dto.salt.contains("?expires="));

        let challenge = Challenge {
            algorithm: Algorithm::Sha256,
            challenge: dto.challenge,
            max_number: dto.maxnumber,
            salt: Salt::from_raw(dto.salt),
            signature: dto.signature,
        };
        let proof = encode_solution(&challenge, solve(&challenge));
        assert!(CaptchaVerifier::new(config).verify(&proof));
    }

    #[tokio::test]
    async fn test_unconfigured_key_is_500() {
        let app = captcha_router(Arc::new(Default::default()));

        let response = app
            .oneshot(Request::get("/captcha").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::app_error::AppError;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(CaptchaError, StatusCode)> = vec![
            (CaptchaError::MalformedPayload, StatusCode::UNPROCESSABLE_ENTITY),
            (
                CaptchaError::UnsupportedAlgorithm("MD5".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (CaptchaError::MissingExpiry, StatusCode::UNPROCESSABLE_ENTITY),
            (CaptchaError::Expired, StatusCode::UNPROCESSABLE_ENTITY),
            (CaptchaError::NumberOutOfRange, StatusCode::UNPROCESSABLE_ENTITY),
            (CaptchaError::Mismatch, StatusCode::UNPROCESSABLE_ENTITY),
            (
                CaptchaError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let app: AppError = CaptchaError::Internal("key file missing".into()).into();
        assert!(!app.to_string().contains("key file"));
    }
}
