//! Shared fixtures: a recording Bot, a scripted CardGenerator and message builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anki_word_bot::{
    build_chain_only, AllowList, Bot, BotComponents, BotConfig, BotError, Chat, HandlerChain, Message,
    OutgoingDocument, User,
};
use async_trait::async_trait;
use card_generator::{CardGenerator, GenerationError};
use card_store::CardRecord;

/// What the bot sent, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Document { chat_id: i64, document: OutgoingDocument },
    Typing { chat_id: i64 },
}

/// Bot that records every outgoing call instead of talking to Telegram.
#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<Sent>>,
    reject_documents: bool,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Bot whose document uploads fail as if Telegram rejected them; nothing is recorded for them.
    pub fn rejecting_documents() -> Arc<Self> {
        Arc::new(Self {
            reject_documents: true,
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn documents(&self) -> Vec<OutgoingDocument> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Document { document, .. } => Some(document),
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts().pop()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> anki_word_bot::Result<()> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        chat: &Chat,
        document: OutgoingDocument,
    ) -> anki_word_bot::Result<()> {
        if self.reject_documents {
            return Err(BotError::Bot("Request Entity Too Large".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Document {
            chat_id: chat.id,
            document,
        });
        Ok(())
    }

    async fn send_typing(&self, chat: &Chat) -> anki_word_bot::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Typing { chat_id: chat.id });
        Ok(())
    }
}

/// Generator answering from a fixed word → (sentence, translation) table; unknown words fail
/// with an upstream error. Words can be given a latency to simulate a slow model.
#[derive(Default)]
pub struct MockGenerator {
    answers: HashMap<String, (String, String)>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(mut self, word: &str, sentence: &str, translation: &str) -> Self {
        self.answers
            .insert(word.to_string(), (sentence.to_string(), translation.to_string()));
        self
    }

    pub fn with_delay(mut self, word: &str, delay: Duration) -> Self {
        self.delays.insert(word.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CardGenerator for MockGenerator {
    async fn generate(&self, word: &str) -> Result<CardRecord, GenerationError> {
        self.calls.lock().unwrap().push(word.to_string());
        if let Some(delay) = self.delays.get(word) {
            tokio::time::sleep(*delay).await;
        }
        match self.answers.get(word) {
            Some((sentence, translation)) => Ok(CardRecord::new(word, sentence, translation)),
            None => Err(GenerationError::Upstream(format!(
                "model unavailable for {}",
                word
            ))),
        }
    }
}

pub const TEST_BOT_USERNAME: &str = "wordbot";

/// Config that never touches the environment.
pub fn test_config(allowed_users: AllowList) -> BotConfig {
    BotConfig {
        bot_token: "test_bot_token_12345".to_string(),
        telegram_api_url: None,
        log_file: "logs/test.log".to_string(),
        openai_api_key: "test_key".to_string(),
        openai_base_url: "http://127.0.0.1:1".to_string(),
        ai_model: "test-model".to_string(),
        deck_name: "German Words".to_string(),
        model_name: "German Word Learning".to_string(),
        export_file_name: "german_words.apkg".to_string(),
        allowed_users,
    }
}

/// Builds the full handler chain around the given mocks; the cached bot username is preset as
/// the REPL would after getMe.
pub async fn build_chain(
    allowed_users: AllowList,
    bot: Arc<MockBot>,
    generator: Arc<MockGenerator>,
) -> (HandlerChain, BotComponents) {
    let config = test_config(allowed_users);
    let (chain, components) = build_chain_only(&config, bot, generator).unwrap();
    *components.bot_username.write().await = Some(TEST_BOT_USERNAME.to_string());
    (chain, components)
}

pub fn message_from(user_id: i64, content: &str) -> Message {
    Message {
        id: format!("{}-{}", user_id, content.len()),
        user: User {
            id: user_id,
            username: Some(format!("user{}", user_id)),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: user_id,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        created_at: chrono::Utc::now(),
    }
}
