//! # Anki word bot
//!
//! Telegram bot that collects German words, asks an OpenAI-compatible model for an example
//! sentence and translation, and exports the collected cards as an Anki `.apkg` deck.
//! Core (Handler, Bot, Message), chain (HandlerChain), handlers and telegram (run_repl,
//! adapters) are wired together by the runner.

pub mod access;
pub mod chain;
pub mod cli;
pub mod components;
pub mod config;
pub mod core;
pub mod handlers;
pub mod messages;
pub mod runner;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};

pub use core::{
    init_tracing, Bot, BotError, Chat, Handler, HandlerError, HandlerResponse, Message,
    OutgoingDocument, Result, ToCoreMessage, ToCoreUser, User,
};

pub use access::AllowList;
pub use chain::HandlerChain;
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::BotConfig;
pub use handlers::{AuthHandler, Command, CommandHandler, LoggingHandler, WordHandler};
pub use runner::{build_chain_only, run_bot};
pub use telegram::{
    process_message, run_repl, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper,
};
