//! API DTOs (Data Transfer Objects)

use crate::application::control::{ControlEvent, Sender};
use crate::domain::value_objects::ChatId;
use serde::{Deserialize, Serialize};

/// Response for GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Telegram `Update`, reduced to the fields the control channel reads
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
    #[serde(default)]
    pub callback_query: Option<TelegramCallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    pub chat: TelegramChat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramCallbackQuery {
    pub id: String,
    pub from: TelegramUser,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
    #[serde(default)]
    pub data: Option<String>,
}

impl TelegramUpdate {
    /// Event for the control channel, if the update carries one
    ///
    /// Messages take precedence over callbacks. Messages without a sender
    /// (channel posts) and callbacks without their message are ignored.
    pub fn into_event(self) -> Option<ControlEvent> {
        if let Some(message) = self.message {
            let from = message.from?;
            return Some(ControlEvent::Message {
                chat_id: ChatId(message.chat.id),
                chat_user_name: message.chat.username,
                sender: Sender {
                    id: from.id,
                    first_name: from.first_name,
                },
                text: message.text.unwrap_or_default(),
            });
        }

        let callback = self.callback_query?;
        let message = callback.message?;
        Some(ControlEvent::Callback {
            chat_id: ChatId(message.chat.id),
            message_id: message.message_id,
            sender_id: callback.from.id,
            data: callback.data.unwrap_or_default(),
        })
    }
}
