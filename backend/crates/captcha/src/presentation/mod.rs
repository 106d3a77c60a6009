//! Presentation Layer
//!
//! HTTP handler and DTOs for the captcha API.

pub mod dto;
pub mod handlers;
pub mod router;
