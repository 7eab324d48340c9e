//! Error types for the bot core.
//!
//! [`BotError`] is what handlers and the chain return; [`HandlerError`] classifies the failures a
//! single message can run into. Handlers report `HandlerError`s to the user themselves, so only
//! transport failures normally reach the chain caller.

use anki_deck::EncodingError;
use card_generator::GenerationError;
use thiserror::Error;

/// Top-level error for the bot (transport, handler).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

/// Per-message failures. None of them are fatal.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Unauthorized access")]
    AuthorizationDenied,

    #[error("Empty input")]
    EmptyInput,

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("{0}")]
    Export(String),
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
