//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of the relay's vocabulary:
//! - Common error types and result aliases
//! - Typed ID wrappers shared by the captcha and relay crates
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
