//! Outbound side of the transport.
//!
//! [`Bot`] is transport-agnostic; the Telegram implementation lives in
//! [`crate::telegram::TelegramBotAdapter`]. Tests substitute a recording implementation.

use async_trait::async_trait;

use super::error::Result;
use super::types::{Chat, Message};

/// A file to send, held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub caption: Option<String>,
}

/// Sends replies, documents and chat actions.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }
    /// Uploads a document to the given chat.
    async fn send_document(&self, chat: &Chat, document: OutgoingDocument) -> Result<()>;
    /// Shows the "typing…" indicator while a slow operation runs.
    async fn send_typing(&self, chat: &Chat) -> Result<()>;
}
