//! # Card generator
//!
//! Turns a submitted word into a [`CardRecord`] by asking an LLM for an example sentence and its
//! translation. The reply must match a two-field JSON schema; anything else is a
//! [`GenerationError`]. The generator never touches the card store: callers append on success.

mod prompt;

use async_trait::async_trait;
use card_store::CardRecord;
use openai_client::{ChatCompletionRequestUserMessageArgs, OpenAIClient};
use thiserror::Error;
use tracing::{info, instrument, warn};

pub use prompt::{build_prompt, parse_response, response_schema, ExampleResponse, SCHEMA_NAME};

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Empty word")]
    EmptyWord,

    #[error("{0}")]
    Upstream(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Produces a card record for a word.
#[async_trait]
pub trait CardGenerator: Send + Sync {
    /// Generates sentence and translation for `word`. `word` is trimmed; blank input fails with
    /// [`GenerationError::EmptyWord`] without any network call.
    async fn generate(&self, word: &str) -> Result<CardRecord, GenerationError>;
}

/// [`CardGenerator`] backed by an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct OpenAICardGenerator {
    client: OpenAIClient,
    model: String,
}

impl OpenAICardGenerator {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CardGenerator for OpenAICardGenerator {
    #[instrument(skip(self), fields(model = %self.model))]
    async fn generate(&self, word: &str) -> Result<CardRecord, GenerationError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(GenerationError::EmptyWord);
        }

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(build_prompt(word))
            .build()
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let raw = self
            .client
            .structured_completion(&self.model, vec![message.into()], SCHEMA_NAME, response_schema())
            .await
            .map_err(|e| {
                warn!(error = %e, "Generation request failed");
                GenerationError::Upstream(e.to_string())
            })?;

        let record = parse_response(word, &raw)?;
        info!(word = %record.word, "Generated card");
        Ok(record)
    }
}
