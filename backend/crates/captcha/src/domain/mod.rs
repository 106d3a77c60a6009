//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Challenge, Solution)
//! - Domain value objects (Algorithm, Salt)
//! - Domain services (challenge hashing and signing)

pub mod entities;
pub mod services;
pub mod value_objects;
