//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, hex/Base64, OS randomness)
//! - Client identification (source IP, submitting page hostname)
//! - Per-client token bucket rate limiting
//! - HTML escaping for untrusted form input

pub mod client;
pub mod crypto;
pub mod rate_limit;
pub mod text;
