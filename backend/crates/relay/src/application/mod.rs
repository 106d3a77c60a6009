//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and repository operations.

pub mod config;
pub mod control;
pub mod dispatch;
pub mod resolve_destination;
pub mod submit_form;
