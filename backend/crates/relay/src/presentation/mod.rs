//! Presentation Layer
//!
//! HTTP handlers, DTOs, result pages and middleware for the API.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod page;
pub mod router;
