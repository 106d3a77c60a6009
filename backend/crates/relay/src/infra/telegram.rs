//! Telegram Bot API client

use crate::domain::transport::{
    EditMessage, InlineKeyboard, MessageTransport, OutgoingMessage, TransportError,
};
use platform::crypto::{hmac_sha256, to_hex};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Header Telegram echoes the `setWebhook` secret token in
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Default webhook route: unguessable without the bot token, and unlike
/// `/{bot_token}` it does not leak the token into access logs.
pub fn webhook_path(bot_token: &str) -> String {
    let digest = to_hex(&hmac_sha256(bot_token.as_bytes(), b"relay webhook path"));
    format!("/telegram/{}", &digest[..32])
}

/// Default `secret_token` for `setWebhook`, derived like [`webhook_path`]
pub fn webhook_secret(bot_token: &str) -> String {
    to_hex(&hmac_sha256(bot_token.as_bytes(), b"relay webhook secret"))
}

/// Bot API client over HTTPS
///
/// One instance is shared by the dispatcher and the control channel.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    /// `{api_url}/bot{token}`
    endpoint: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("endpoint", &"<redacted>")
            .finish()
    }
}

/// Bot identity returned by `getMe`
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

impl TelegramClient {
    /// `api_url` may point at a compatible proxy instead of Telegram.
    pub fn new(api_url: &str, bot_token: &str) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/bot{}", api_url.trim_end_matches('/'), bot_token),
        })
    }

    /// Identity of the bot; fails fast on a bad token
    pub async fn get_me(&self) -> Result<BotUser, TransportError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Point the bot's updates at `url`
    ///
    /// Telegram then sends `secret_token` in [`SECRET_TOKEN_HEADER`] on every
    /// update.
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<(), TransportError> {
        let _: bool = self
            .call("setWebhook", &SetWebhookRequest { url, secret_token })
            .await?;
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}/{}", self.endpoint, method))
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.without_url().to_string()))?;

        let status = response.status();
        let api: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TransportError::Http(e.without_url().to_string()))?;

        match (api.ok, api.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TransportError::Api {
                code: api.error_code.unwrap_or(i64::from(status.as_u16())),
                description: api
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }
}

impl MessageTransport for TelegramClient {
    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), TransportError> {
        let body = SendMessageRequest {
            chat_id: message.chat_id.0,
            text: &message.text,
            parse_mode: message.parse_mode.map(|mode| mode.as_str()),
            reply_markup: message.reply_markup.as_ref().map(KeyboardMarkup::from),
        };
        let _: IgnoredAny = self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn edit_message(&self, edit: &EditMessage) -> Result<(), TransportError> {
        let body = EditMessageRequest {
            chat_id: edit.chat_id.0,
            message_id: edit.message_id,
            text: &edit.text,
            parse_mode: edit.parse_mode.map(|mode| mode.as_str()),
            reply_markup: edit.reply_markup.as_ref().map(KeyboardMarkup::from),
        };
        let _: IgnoredAny = self.call("editMessageText", &body).await?;
        Ok(())
    }
}

// Wire types
#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
    result: Option<T>,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<KeyboardMarkup<'a>>,
}

#[derive(Serialize)]
struct SetWebhookRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_token: Option<&'a str>,
}

#[derive(Serialize)]
struct EditMessageRequest<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<KeyboardMarkup<'a>>,
}

#[derive(Serialize)]
struct KeyboardMarkup<'a> {
    inline_keyboard: Vec<Vec<KeyboardButton<'a>>>,
}

#[derive(Serialize)]
struct KeyboardButton<'a> {
    text: &'a str,
    callback_data: &'a str,
}

impl<'a> From<&'a InlineKeyboard> for KeyboardMarkup<'a> {
    fn from(keyboard: &'a InlineKeyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| KeyboardButton {
                            text: &button.text,
                            callback_data: &button.callback_data,
                        })
                        .collect()
                })
                .collect(),
        }
    }
}
