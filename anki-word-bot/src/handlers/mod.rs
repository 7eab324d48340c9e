//! Handlers making up the dispatch chain: logging, auth gate, commands, word submissions.

mod command_handler;
mod logging_auth;
mod word_handler;

pub use command_handler::{Command, CommandHandler};
pub use logging_auth::{AuthHandler, LoggingHandler};
pub use word_handler::WordHandler;
