//! Messaging Transport
//!
//! Outbound interface to the chat platform. The Telegram implementation
//! lives in the infrastructure layer.

use crate::domain::value_objects::ChatId;
use thiserror::Error;

/// Text formatting mode understood by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
    MarkdownV2,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
            ParseMode::MarkdownV2 => "MarkdownV2",
        }
    }
}

/// Inline button carrying callback data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

/// Inline keyboard, one button per row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn single_column(buttons: impl IntoIterator<Item = InlineButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }
}

/// New message to a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub reply_markup: Option<InlineKeyboard>,
}

impl OutgoingMessage {
    pub fn html(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: Some(ParseMode::Html),
            reply_markup: None,
        }
    }

    pub fn markdown(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: Some(ParseMode::MarkdownV2),
            reply_markup: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.reply_markup = Some(keyboard);
        self
    }
}

/// Replacement text for a message the bot sent earlier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditMessage {
    pub chat_id: ChatId,
    pub message_id: i64,
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub reply_markup: Option<InlineKeyboard>,
}

/// Transport failures. Never retried.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Request did not complete (connect, timeout, body)
    #[error("request failed: {0}")]
    Http(String),

    /// Platform answered `ok: false`
    #[error("api error {code}: {description}")]
    Api { code: i64, description: String },
}

/// Messaging transport trait
#[trait_variant::make(MessageTransport: Send)]
pub trait LocalMessageTransport {
    /// Send a new message
    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), TransportError>;

    /// Edit a previously sent message
    async fn edit_message(&self, edit: &EditMessage) -> Result<(), TransportError>;
}
