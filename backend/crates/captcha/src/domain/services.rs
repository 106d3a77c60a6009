//! Domain Services
//!
//! Pure challenge hashing, signing and solution checking.

use crate::domain::entities::{Challenge, Solution};
use crate::domain::value_objects::{Algorithm, Salt};
use crate::error::{CaptchaError, CaptchaResult};
use platform::crypto::{constant_time_eq, hmac_sha256, sha256, to_hex};

/// Hex SHA-256 of the salt followed by the decimal number
pub fn challenge_hash(salt: &Salt, number: u64) -> String {
    let mut data = salt.as_str().as_bytes().to_vec();
    data.extend_from_slice(number.to_string().as_bytes());
    to_hex(&sha256(&data))
}

/// Hex HMAC-SHA256 of the challenge hash
pub fn sign_challenge(hmac_key: &[u8], challenge: &str) -> String {
    to_hex(&hmac_sha256(hmac_key, challenge.as_bytes()))
}

/// Build a signed challenge for a known secret number
pub fn build_challenge(hmac_key: &[u8], salt: Salt, number: u64, max_number: u64) -> Challenge {
    let challenge = challenge_hash(&salt, number);
    let signature = sign_challenge(hmac_key, &challenge);
    Challenge {
        algorithm: Algorithm::Sha256,
        challenge,
        max_number,
        salt,
        signature,
    }
}

/// Check a solution against the key, the number bound and the clock
///
/// Steps mirror how the challenge was produced: the algorithm must be ours,
/// the salt must carry an unexpired `expires`, the number must be within the
/// bound, and both the recomputed hash and its signature must match.
pub fn check_solution(
    solution: &Solution,
    hmac_key: &[u8],
    max_number: u64,
    now_secs: i64,
) -> CaptchaResult<()> {
    if Algorithm::parse(&solution.algorithm).is_none() {
        return Err(CaptchaError::UnsupportedAlgorithm(
            solution.algorithm.clone(),
        ));
    }

    let expires = solution
        .salt
        .expires_at_secs()
        .ok_or(CaptchaError::MissingExpiry)?;
    if now_secs > expires {
        return Err(CaptchaError::Expired);
    }

    if solution.number > max_number {
        return Err(CaptchaError::NumberOutOfRange);
    }

    let expected_challenge = challenge_hash(&solution.salt, solution.number);
    let expected_signature = sign_challenge(hmac_key, &expected_challenge);

    let challenge_ok =
        constant_time_eq(expected_challenge.as_bytes(), solution.challenge.as_bytes());
    let signature_ok =
        constant_time_eq(expected_signature.as_bytes(), solution.signature.as_bytes());

    if challenge_ok && signature_ok {
        Ok(())
    } else {
        Err(CaptchaError::Mismatch)
    }
}
