//! Core types and traits: Handler, Bot, Message, HandlerResponse, error, logger. Transport-agnostic.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{Bot, OutgoingDocument};
pub use error::{BotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{Chat, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User};
