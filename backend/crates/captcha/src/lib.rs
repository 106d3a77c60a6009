//! Captcha (stateless proof-of-work) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Challenge/solution entities and the hashing rules
//! - `application/` - Use cases (issue, verify) and configuration
//! - `presentation/` - HTTP handler, DTOs, router
//!
//! ## Security Model
//! - The server is the sole authority for the salt, number bound and expiry
//! - Nothing is stored: a challenge is trusted because its hash is signed
//!   with the server's HMAC key and its salt carries the expiry
//! - Verification rejects foreign algorithms, tampered salts, numbers above
//!   the issued bound and expired salts
//! - Proofs are not single-use; a solved payload can be replayed until its
//!   salt expires

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::CaptchaConfig;
pub use application::verify_solution::CaptchaVerifier;
pub use error::{CaptchaError, CaptchaResult};
pub use presentation::router::captcha_router;

#[cfg(test)]
mod tests;
