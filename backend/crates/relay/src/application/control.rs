//! Control Channel Use Case
//!
//! Bot commands and inline-button callbacks through which owners register,
//! issue and revoke form tokens, and manage their allowed domains.

use crate::domain::entities::{FormToken, NewOwner, Owner};
use crate::domain::repository::RelayRepository;
use crate::domain::services::markdown::escape_markdown;
use crate::domain::transport::{
    EditMessage, InlineButton, InlineKeyboard, MessageTransport, OutgoingMessage, ParseMode,
};
use crate::domain::value_objects::{ChatId, DomainId, DomainName, FormName};
use crate::error::RelayResult;
use chrono::Utc;
use kernel::id::FormTokenId;
use std::sync::Arc;

// MarkdownV2 reply texts
const UNKNOWN_COMMAND: &str = "I don't know that command\\.";
const GENERIC_ERROR: &str = "Error occurred\\! Please try again\\.";
const USER_NOT_FOUND: &str = "User not found\\! Start the bot first\\.";
const USER_NOT_VALIDATED: &str = "User not validated\\!";
const GET_TOKEN_USAGE: &str =
    "Invalid command format\\.\n\nTo get form token run: \\/get\\_token FORM\\_NAME";
const ADD_DOMAIN_USAGE: &str =
    "Invalid command format\\.\n\nTo add allowed domain run: \\/add\\_domain DOMAIN";
const TOKEN_NAME_TAKEN: &str = "Form name is exist for your user\\! Please try another name\\.";
const DOMAIN_TAKEN: &str = "Domain is exist for your user\\! Please try another domain\\.";
const NO_TOKENS: &str =
    "You don't have any form tokens yet\\.\n\nTo get form token run: \\/get\\_token FORM\\_NAME";
const NO_DOMAINS: &str = "You don't have any allowed domains yet\\.\n\nTo add allowed domain run: \\/add\\_domain DOMAIN";
const TOKENS_HEADER: &str = "*Your form tokens:*\nSelect a token below to see details\\.";
const DOMAINS_HEADER: &str = "*Your domains:*\nSelect a domain below to see details\\.";
const DOMAIN_CREATED: &str =
    "✅ Domain created successfully\\.\n\nSend \\/domains\\_list to see domains\\.";

// Plain-text edit results
const TOKEN_REVOKED: &str = "✅ Token revoked successfully!\n\nSend /tokens_list to see tokens.";
const DOMAIN_DELETED: &str = "✅ Domain deleted successfully!\n\nSend /domains_list to see domains.";

pub const CALLBACK_TOKEN: &str = "token_";
pub const CALLBACK_REVOKE_TOKEN: &str = "revoke_token_";
pub const CALLBACK_DOMAIN: &str = "domain_";
pub const CALLBACK_DELETE_DOMAIN: &str = "delete_domain_";

/// Telegram user behind a command
#[derive(Debug, Clone)]
pub struct Sender {
    pub id: i64,
    pub first_name: String,
}

/// Inbound control channel event
#[derive(Debug, Clone)]
pub enum ControlEvent {
    /// Text message (commands and anything else)
    Message {
        chat_id: ChatId,
        chat_user_name: Option<String>,
        sender: Sender,
        text: String,
    },
    /// Inline keyboard button press on one of our messages
    Callback {
        chat_id: ChatId,
        message_id: i64,
        sender_id: i64,
        data: String,
    },
}

/// Parsed bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Start,
    GetToken(&'a str),
    TokensList,
    AddDomain(&'a str),
    DomainsList,
    Unknown,
}

impl<'a> Command<'a> {
    /// Split `/command[@bot] args`. Text without a leading `/` is unknown.
    pub fn parse(text: &'a str) -> Self {
        let Some(rest) = text.trim().strip_prefix('/') else {
            return Command::Unknown;
        };
        let (word, args) = match rest.split_once(char::is_whitespace) {
            Some((word, args)) => (word, args.trim()),
            None => (rest, ""),
        };
        let name = word.split('@').next().unwrap_or(word);

        match name {
            "start" => Command::Start,
            "get_token" => Command::GetToken(args),
            "tokens_list" => Command::TokensList,
            "add_domain" => Command::AddDomain(args),
            "domains_list" => Command::DomainsList,
            _ => Command::Unknown,
        }
    }
}

/// Parsed callback data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    ShowToken(FormTokenId),
    RevokeToken(FormTokenId),
    ShowDomain(DomainId),
    DeleteDomain(DomainId),
}

impl Callback {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(id) = data.strip_prefix(CALLBACK_REVOKE_TOKEN) {
            return FormTokenId::parse_hyphenated(id).map(Callback::RevokeToken);
        }
        if let Some(id) = data.strip_prefix(CALLBACK_TOKEN) {
            return FormTokenId::parse_hyphenated(id).map(Callback::ShowToken);
        }
        if let Some(id) = data.strip_prefix(CALLBACK_DELETE_DOMAIN) {
            return id.parse().ok().map(|id| Callback::DeleteDomain(DomainId(id)));
        }
        if let Some(id) = data.strip_prefix(CALLBACK_DOMAIN) {
            return id.parse().ok().map(|id| Callback::ShowDomain(DomainId(id)));
        }
        None
    }
}

/// Control Channel Use Case
pub struct ControlChannelUseCase<R, T>
where
    R: RelayRepository,
    T: MessageTransport + Send + Sync + 'static,
{
    repo: Arc<R>,
    transport: Arc<T>,
}

impl<R, T> ControlChannelUseCase<R, T>
where
    R: RelayRepository,
    T: MessageTransport + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, transport: Arc<T>) -> Self {
        Self { repo, transport }
    }

    /// Handle one event and send the resulting reply, if any
    ///
    /// Storage failures become an apology to the user. Only transport
    /// failures are returned.
    pub async fn handle(&self, event: ControlEvent) -> RelayResult<()> {
        match event {
            ControlEvent::Message {
                chat_id,
                chat_user_name,
                sender,
                text,
            } => {
                let reply = match self
                    .handle_command(chat_id, chat_user_name, &sender, &text)
                    .await
                {
                    Ok(reply) => reply,
                    Err(e) => {
                        e.log();
                        OutgoingMessage::markdown(chat_id, GENERIC_ERROR)
                    }
                };
                self.transport.send_message(&reply).await?;
            }
            ControlEvent::Callback {
                chat_id,
                message_id,
                sender_id,
                data,
            } => {
                let edit = match self.handle_callback(chat_id, message_id, sender_id, &data).await {
                    Ok(edit) => edit,
                    Err(e) => {
                        e.log();
                        None
                    }
                };
                if let Some(edit) = edit {
                    self.transport.edit_message(&edit).await?;
                }
            }
        }
        Ok(())
    }

    async fn handle_command(
        &self,
        chat_id: ChatId,
        chat_user_name: Option<String>,
        sender: &Sender,
        text: &str,
    ) -> RelayResult<OutgoingMessage> {
        let command = Command::parse(text);
        tracing::debug!(chat_id = %chat_id, command = ?command, "Bot command");

        let reply = match command {
            Command::Start => self.start(chat_user_name, sender).await?,
            Command::GetToken(args) => self.get_token(chat_id, sender, args).await?,
            Command::TokensList => return self.tokens_list(chat_id, sender).await,
            Command::AddDomain(args) => self.add_domain(sender, args).await?,
            Command::DomainsList => return self.domains_list(chat_id, sender).await,
            Command::Unknown => UNKNOWN_COMMAND.to_string(),
        };

        Ok(OutgoingMessage::markdown(chat_id, reply))
    }

    async fn start(&self, chat_user_name: Option<String>, sender: &Sender) -> RelayResult<String> {
        if self
            .repo
            .find_owner_by_telegram_id(sender.id)
            .await?
            .is_none()
        {
            let owner = self
                .repo
                .create_owner(&NewOwner {
                    telegram_user_id: sender.id,
                    telegram_user_name: chat_user_name,
                    verified_at: Some(Utc::now()),
                })
                .await?;
            tracing::info!(telegram_user_id = owner.telegram_user_id, "Owner registered");
        }

        Ok(format!(
            "Hello, *{}* 👋\n\
             Thank you for choosing Formy\\! 🎉\n\n\
             Below are commands you can do:\n\
             To get a new form token, type: \\/get\\_token FORM\\_NAME\n\
             To view all your form tokens, type: \\/tokens\\_list\n\
             To add a new domain, type: \\/add\\_domain DOMAIN\n\
             To view all your allowed domains, type: \\/domains\\_list\n",
            escape_markdown(&sender.first_name)
        ))
    }

    /// Registered and verified owner, or the reply explaining why not
    async fn verified_owner(&self, sender: &Sender) -> RelayResult<Result<Owner, &'static str>> {
        Ok(match self.repo.find_owner_by_telegram_id(sender.id).await? {
            None => Err(USER_NOT_FOUND),
            Some(owner) if !owner.is_verified() => Err(USER_NOT_VALIDATED),
            Some(owner) => Ok(owner),
        })
    }

    async fn get_token(&self, chat_id: ChatId, sender: &Sender, args: &str) -> RelayResult<String> {
        let owner = match self.verified_owner(sender).await? {
            Ok(owner) => owner,
            Err(reply) => return Ok(reply.to_string()),
        };
        let Some(name) = FormName::parse(args) else {
            return Ok(GET_TOKEN_USAGE.to_string());
        };

        if self
            .repo
            .find_token_by_name(owner.id, name.as_str())
            .await?
            .is_some()
        {
            return Ok(TOKEN_NAME_TAKEN.to_string());
        }

        let token = FormToken::issue(owner.id, name.into_inner(), chat_id);
        self.repo.create_token(&token).await?;

        tracing::info!(form_token = %token.id, chat_id = %chat_id, "Form token issued");

        Ok(format!(
            "Use this token for your form:\n`{}`\n\nSend \\/tokens\\_list to see tokens\\.",
            token.id
        ))
    }

    async fn tokens_list(&self, chat_id: ChatId, sender: &Sender) -> RelayResult<OutgoingMessage> {
        let Some(owner) = self.repo.find_owner_by_telegram_id(sender.id).await? else {
            return Ok(OutgoingMessage::markdown(chat_id, USER_NOT_FOUND));
        };

        let tokens = self.repo.list_tokens(owner.id).await?;
        if tokens.is_empty() {
            return Ok(OutgoingMessage::markdown(chat_id, NO_TOKENS));
        }

        let keyboard = InlineKeyboard::single_column(tokens.into_iter().map(|token| InlineButton {
            text: token.name,
            callback_data: format!("{CALLBACK_TOKEN}{}", token.id),
        }));
        Ok(OutgoingMessage::markdown(chat_id, TOKENS_HEADER).with_keyboard(keyboard))
    }

    async fn add_domain(&self, sender: &Sender, args: &str) -> RelayResult<String> {
        let owner = match self.verified_owner(sender).await? {
            Ok(owner) => owner,
            Err(reply) => return Ok(reply.to_string()),
        };
        let Some(domain) = DomainName::parse(args) else {
            return Ok(ADD_DOMAIN_USAGE.to_string());
        };

        if self.repo.domain_exists(owner.id, domain.as_str()).await? {
            return Ok(DOMAIN_TAKEN.to_string());
        }

        let created = self.repo.create_domain(owner.id, domain.as_str()).await?;
        tracing::info!(domain = %created.name, domain_id = %created.id, "Domain allow-listed");

        Ok(DOMAIN_CREATED.to_string())
    }

    async fn domains_list(&self, chat_id: ChatId, sender: &Sender) -> RelayResult<OutgoingMessage> {
        let Some(owner) = self.repo.find_owner_by_telegram_id(sender.id).await? else {
            return Ok(OutgoingMessage::markdown(chat_id, USER_NOT_FOUND));
        };

        let domains = self.repo.list_domains(owner.id).await?;
        if domains.is_empty() {
            return Ok(OutgoingMessage::markdown(chat_id, NO_DOMAINS));
        }

        let keyboard =
            InlineKeyboard::single_column(domains.into_iter().map(|domain| InlineButton {
                text: domain.name,
                callback_data: format!("{CALLBACK_DOMAIN}{}", domain.id),
            }));
        Ok(OutgoingMessage::markdown(chat_id, DOMAINS_HEADER).with_keyboard(keyboard))
    }

    async fn handle_callback(
        &self,
        chat_id: ChatId,
        message_id: i64,
        sender_id: i64,
        data: &str,
    ) -> RelayResult<Option<EditMessage>> {
        let Some(callback) = Callback::parse(data) else {
            tracing::debug!(data = %data, "Unrecognized callback data");
            return Ok(None);
        };
        let Some(owner) = self.repo.find_owner_by_telegram_id(sender_id).await? else {
            return Ok(None);
        };

        let edit = |text: String, parse_mode: Option<ParseMode>, reply_markup| EditMessage {
            chat_id,
            message_id,
            text,
            parse_mode,
            reply_markup,
        };

        match callback {
            Callback::ShowToken(id) => {
                let Some(token) = self.repo.find_token(id).await? else {
                    return Ok(None);
                };
                if token.owner_id != owner.id {
                    tracing::warn!(form_token = %id, "Callback for a token of another owner");
                    return Ok(None);
                }
                let keyboard = InlineKeyboard::single_column([InlineButton {
                    text: "Revoke".to_string(),
                    callback_data: format!("{CALLBACK_REVOKE_TOKEN}{}", token.id),
                }]);
                Ok(Some(edit(
                    format!("*{}*: `{}`\n", escape_markdown(&token.name), token.id),
                    Some(ParseMode::MarkdownV2),
                    Some(keyboard),
                )))
            }
            Callback::RevokeToken(id) => {
                if !self.repo.delete_token(id, owner.id).await? {
                    return Ok(None);
                }
                tracing::info!(form_token = %id, "Form token revoked");
                Ok(Some(edit(TOKEN_REVOKED.to_string(), None, None)))
            }
            Callback::ShowDomain(id) => {
                let Some(domain) = self.repo.find_domain(id, owner.id).await? else {
                    return Ok(None);
                };
                let keyboard = InlineKeyboard::single_column([InlineButton {
                    text: "Delete".to_string(),
                    callback_data: format!("{CALLBACK_DELETE_DOMAIN}{}", domain.id),
                }]);
                Ok(Some(edit(
                    format!("*{}*", escape_markdown(&domain.name)),
                    Some(ParseMode::MarkdownV2),
                    Some(keyboard),
                )))
            }
            Callback::DeleteDomain(id) => {
                if !self.repo.delete_domain(id, owner.id).await? {
                    return Ok(None);
                }
                tracing::info!(domain_id = %id, "Domain removed from allow-list");
                Ok(Some(edit(DOMAIN_DELETED.to_string(), None, None)))
            }
        }
    }
}
