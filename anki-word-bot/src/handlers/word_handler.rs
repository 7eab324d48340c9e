//! Word submissions: any non-command text becomes a card.

use async_trait::async_trait;
use card_generator::CardGenerator;
use card_store::CardStore;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::core::{Bot, Handler, HandlerError, HandlerResponse, Message, Result};
use crate::messages;

/// Generates a card for the submitted word and appends it to the shared store.
///
/// The store is only touched after generation succeeded; the generation call itself runs without
/// any lock held.
pub struct WordHandler {
    bot: Arc<dyn Bot>,
    store: CardStore,
    generator: Arc<dyn CardGenerator>,
}

impl WordHandler {
    pub fn new(bot: Arc<dyn Bot>, store: CardStore, generator: Arc<dyn CardGenerator>) -> Self {
        Self {
            bot,
            store,
            generator,
        }
    }

    async fn reply(&self, message: &Message, text: String) -> Result<HandlerResponse> {
        self.bot.reply_to(message, &text).await?;
        Ok(HandlerResponse::Reply(text))
    }
}

#[async_trait]
impl Handler for WordHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let word = message.content.trim();
        if word.starts_with('/') {
            return Ok(HandlerResponse::Ignore);
        }
        if word.is_empty() {
            return self
                .reply(message, messages::error_text(&HandlerError::EmptyInput))
                .await;
        }

        if let Err(e) = self.bot.send_typing(&message.chat).await {
            warn!(error = %e, "Failed to send typing action");
        }

        match self.generator.generate(word).await {
            Ok(record) => {
                let total = self.store.append(record.clone()).await;
                info!(word = %record.word, total = total, "Card added");
                self.reply(message, messages::card_created(&record, total)).await
            }
            Err(e) => {
                error!(word = %word, error = %e, "Error generating example");
                self.reply(message, messages::error_text(&HandlerError::Generation(e)))
                    .await
            }
        }
    }
}
