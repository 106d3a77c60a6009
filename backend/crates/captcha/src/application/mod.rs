//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic with configuration and the clock.

pub mod config;
pub mod issue_challenge;
pub mod verify_solution;
