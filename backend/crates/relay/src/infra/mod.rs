//! Infrastructure Layer
//!
//! PostgreSQL storage and the Telegram Bot API client.

pub mod postgres;
pub mod telegram;
