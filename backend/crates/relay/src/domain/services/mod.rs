//! Domain Services
//!
//! Pure functions over submissions and bot replies.

pub mod compose;
pub mod markdown;
pub mod normalize;
