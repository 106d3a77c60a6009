//! Domain Layer
//!
//! Entities, value objects, repository and transport traits, and the pure
//! submission services.

pub mod entities;
pub mod repository;
pub mod services;
pub mod transport;
pub mod value_objects;
