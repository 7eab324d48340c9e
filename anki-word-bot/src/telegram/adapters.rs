//! Adapters from Telegram (teloxide) types to core types.

use crate::core::{Chat, Message, ToCoreMessage, ToCoreUser, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl ToCoreUser for TelegramUserWrapper<'_> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`]. Only text messages with a sender
/// convert; stickers, photos, channel posts and service messages yield `None`.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl ToCoreMessage for TelegramMessageWrapper<'_> {
    fn to_core(&self) -> Option<Message> {
        let text = self.0.text()?;
        let user = self.0.from.as_ref()?;
        Some(Message {
            id: self.0.id.0.to_string(),
            user: TelegramUserWrapper(user).to_core(),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: chat_type(&self.0.chat),
            },
            content: text.to_string(),
            created_at: self.0.date,
        })
    }
}

fn chat_type(chat: &teloxide::types::Chat) -> String {
    if chat.is_private() {
        "private"
    } else if chat.is_group() {
        "group"
    } else if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_channel() {
        "channel"
    } else {
        "unknown"
    }
    .to_string()
}
