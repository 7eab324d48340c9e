use anyhow::Result;
use card_generator::CardGenerator;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, instrument, warn};

use crate::chain::HandlerChain;
use crate::components::{build_bot_components, build_handler_chain, BotComponents};
use crate::config::BotConfig;
use crate::core::{init_tracing, Bot as CoreBot};
use crate::handlers::Command;
use crate::telegram::run_repl;

/// Main entry: validate config, init logging, build components and chain, register the command
/// menu, then run the REPL until shutdown.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        deck_name = %config.deck_name,
        model = %config.ai_model,
        allowed_users = config.allowed_users.len(),
        "Initializing bot"
    );
    if config.allowed_users.is_open() {
        warn!("ALLOWED_USER_IDS is empty; every Telegram user can use this bot");
    }

    let components = build_bot_components(&config, None, None)?;
    let handler_chain = build_handler_chain(&components);
    let teloxide_bot = components.teloxide_bot.clone();

    if let Err(e) = teloxide_bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    info!("Bot started successfully");

    run_repl(teloxide_bot, handler_chain, components.bot_username.clone()).await
}

/// Builds the handler chain without starting the REPL or touching the network. Used by
/// integration tests that inject a mock bot and generator.
pub fn build_chain_only(
    config: &BotConfig,
    bot: Arc<dyn CoreBot>,
    generator: Arc<dyn CardGenerator>,
) -> Result<(HandlerChain, BotComponents)> {
    config.validate()?;
    let components = build_bot_components(config, Some(bot), Some(generator))?;
    let handler_chain = build_handler_chain(&components);
    Ok((handler_chain, components))
}
