//! Application Configuration
//!
//! Configuration for the relay application layer.

/// Maximum number of CC recipients per submission
pub const CC_MAX: usize = 2;

/// Telegram's message length limit, in characters
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

pub const DEFAULT_SUBJECT: &str = "New form submission";

/// Relay application configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// CC recipients honored per submission
    pub cc_max: usize,
    /// Chunk size for outbound messages
    pub message_limit: usize,
    /// Subject used when `_subject` is absent or blank
    pub default_subject: String,
    /// Public URL of this service, linked from result pages
    pub base_url: String,
    /// Delivery tasks allowed to run at once; the rest wait
    pub max_concurrent_deliveries: usize,
    /// Reject submissions that carry no captcha proof
    pub require_captcha: bool,
    /// Secret token Telegram must echo on webhook calls. `None` accepts any caller.
    pub webhook_secret: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            cc_max: CC_MAX,
            message_limit: TELEGRAM_MESSAGE_LIMIT,
            default_subject: DEFAULT_SUBJECT.to_string(),
            base_url: String::new(),
            max_concurrent_deliveries: 64,
            require_captcha: false,
            webhook_secret: None,
        }
    }
}
