//! Slash commands: /start, /help, /export, /clear.

use anki_deck::DeckEncoder;
use async_trait::async_trait;
use card_store::{CardRecord, CardStore};
use std::sync::Arc;
use teloxide::utils::command::{BotCommands, ParseError};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use crate::core::{Bot, Handler, HandlerError, HandlerResponse, Message, OutgoingDocument, Result};
use crate::messages;

/// Commands the bot understands. Descriptions are what Telegram shows in the command menu.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Startet den Bot")]
    Start,
    #[command(description = "Zeigt diese Hilfe")]
    Help,
    #[command(description = "Exportiert alle gesammelten Karten als .apkg-Datei")]
    Export,
    #[command(description = "Löscht alle gesammelten Karten")]
    Clear,
}

impl Command {
    /// Parses the leading `/command` of `text`; arguments after it are ignored. The command name
    /// is case-insensitive (`/Export` works); the `@name` suffix is kept as sent.
    /// `bot_username` resolves `/cmd@name` addressing; pass `""` when unknown.
    pub fn parse_leading(text: &str, bot_username: &str) -> std::result::Result<Self, ParseError> {
        let head = text.split_whitespace().next().unwrap_or_default();
        let head = match head.split_once('@') {
            Some((name, addressee)) => format!("{}@{}", name.to_lowercase(), addressee),
            None => head.to_lowercase(),
        };
        Self::parse(&head, bot_username)
    }
}

/// Handles every message starting with `/`. Unknown commands and commands addressed to other bots
/// are dropped without a reply.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    store: CardStore,
    encoder: Arc<DeckEncoder>,
    export_file_name: String,
    bot_username: Arc<RwLock<Option<String>>>,
}

impl CommandHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        store: CardStore,
        encoder: Arc<DeckEncoder>,
        export_file_name: String,
        bot_username: Arc<RwLock<Option<String>>>,
    ) -> Self {
        Self {
            bot,
            store,
            encoder,
            export_file_name,
            bot_username,
        }
    }

    async fn reply(&self, message: &Message, text: String) -> Result<HandlerResponse> {
        self.bot.reply_to(message, &text).await?;
        Ok(HandlerResponse::Reply(text))
    }

    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn export(&self, message: &Message) -> Result<HandlerResponse> {
        if self.store.is_empty().await {
            info!("Export requested with no cards");
            return self.reply(message, messages::NOTHING_TO_EXPORT.to_string()).await;
        }

        let records = self.store.snapshot().await;
        let count = records.len();
        let result = match self.encode(records).await {
            Ok(bytes) => {
                let document = OutgoingDocument {
                    file_name: self.export_file_name.clone(),
                    bytes,
                    caption: Some(messages::export_caption(count)),
                };
                self.bot
                    .send_document(&message.chat, document)
                    .await
                    .map_err(|e| HandlerError::Export(e.to_string()))
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!(count = count, file_name = %self.export_file_name, "Cards exported");
                Ok(HandlerResponse::Stop)
            }
            Err(e) => {
                error!(error = %e, "Error exporting cards");
                self.reply(message, messages::error_text(&e)).await
            }
        }
    }

    /// Encodes on the blocking pool; the snapshot is owned, so later appends cannot affect it.
    async fn encode(&self, records: Vec<CardRecord>) -> std::result::Result<Vec<u8>, HandlerError> {
        let encoder = self.encoder.clone();
        let bytes = tokio::task::spawn_blocking(move || encoder.encode(&records))
            .await
            .map_err(|e| HandlerError::Export(e.to_string()))??;
        Ok(bytes)
    }

    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn clear(&self, message: &Message) -> Result<HandlerResponse> {
        let removed = self.store.clear().await;
        info!(removed = removed, "Cards cleared");
        self.reply(message, messages::cleared(removed)).await
    }
}

#[async_trait]
impl Handler for CommandHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let text = message.content.trim_start();
        if !text.starts_with('/') {
            return Ok(HandlerResponse::Continue);
        }

        let bot_username = self.bot_username.read().await.clone().unwrap_or_default();
        let command = match Command::parse_leading(text, &bot_username) {
            Ok(command) => command,
            Err(e) => {
                debug!(error = ?e, text = %text, "Ignoring command");
                return Ok(HandlerResponse::Stop);
            }
        };

        info!(user_id = message.user.id, command = ?command, "Command received");
        match command {
            Command::Start => self.reply(message, messages::GREETING.to_string()).await,
            Command::Help => self.reply(message, messages::HELP.to_string()).await,
            Command::Export => self.export(message).await,
            Command::Clear => self.clear(message).await,
        }
    }
}
