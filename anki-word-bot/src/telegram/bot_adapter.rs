//! Wraps teloxide::Bot and implements [`crate::core::Bot`].

use async_trait::async_trait;
use teloxide::payloads::{SendDocumentSetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatId, InputFile, MessageId, ReplyParameters};
use tracing::debug;

use crate::core::{Bot as CoreBot, BotError, Chat, Message, OutgoingDocument, Result};

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    /// Quotes the user's message so replies stay attached to it in group chats. Falls back to a
    /// plain message when the id is not a Telegram message id.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        let Ok(message_id) = message.id.parse::<i32>() else {
            debug!(message_id = %message.id, "Not a Telegram message id, sending without quote");
            return self.send_message(&message.chat, text).await;
        };
        self.bot
            .send_message(ChatId(message.chat.id), text.to_string())
            .reply_parameters(ReplyParameters::new(MessageId(message_id)))
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_document(&self, chat: &Chat, document: OutgoingDocument) -> Result<()> {
        let file = InputFile::memory(document.bytes).file_name(document.file_name);
        let request = self.bot.send_document(ChatId(chat.id), file);
        let request = match document.caption {
            Some(caption) => request.caption(caption),
            None => request,
        };
        request.await.map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat.id), ChatAction::Typing)
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }
}
