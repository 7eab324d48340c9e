//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use anki_deck::DeckEncoder;
use anyhow::Result;
use card_generator::{CardGenerator, OpenAICardGenerator};
use card_store::CardStore;
use openai_client::{mask_token, OpenAIClient};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::access::AllowList;
use crate::chain::HandlerChain;
use crate::config::BotConfig;
use crate::core::Bot as CoreBot;
use crate::handlers::{AuthHandler, CommandHandler, LoggingHandler, WordHandler};
use crate::telegram::TelegramBotAdapter;

/// Everything the handler chain and the REPL need; produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    /// Outgoing side used by handlers; the Telegram adapter unless overridden.
    pub bot: Arc<dyn CoreBot>,
    pub bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
    pub store: CardStore,
    pub generator: Arc<dyn CardGenerator>,
    pub encoder: Arc<DeckEncoder>,
    pub allow_list: AllowList,
    pub export_file_name: String,
}

/// Builds BotComponents from config.
///
/// `bot_override` replaces the Telegram adapter and `generator_override` the OpenAI-backed
/// generator; integration tests use both to drive the chain without network access.
#[instrument(skip(config, bot_override, generator_override))]
pub fn build_bot_components(
    config: &BotConfig,
    bot_override: Option<Arc<dyn CoreBot>>,
    generator_override: Option<Arc<dyn CardGenerator>>,
) -> Result<BotComponents> {
    let teloxide_bot = {
        let bot = teloxide::Bot::new(config.bot_token.clone());
        if let Some(ref url_str) = config.telegram_api_url {
            match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            }
        } else {
            bot
        }
    };

    let bot: Arc<dyn CoreBot> = match bot_override {
        Some(bot) => bot,
        None => Arc::new(TelegramBotAdapter::new(teloxide_bot.clone())),
    };

    let generator: Arc<dyn CardGenerator> = match generator_override {
        Some(generator) => generator,
        None => {
            info!(
                base_url = %config.openai_base_url,
                model = %config.ai_model,
                api_key = %mask_token(&config.openai_api_key),
                "Using OpenAI-compatible card generator"
            );
            let client = OpenAIClient::with_base_url(
                config.openai_api_key.clone(),
                config.openai_base_url.clone(),
            );
            Arc::new(OpenAICardGenerator::new(client, config.ai_model.clone()))
        }
    };

    let encoder = Arc::new(DeckEncoder::new(
        config.deck_name.clone(),
        config.model_name.clone(),
    ));

    Ok(BotComponents {
        teloxide_bot,
        bot,
        bot_username: Arc::new(tokio::sync::RwLock::new(None)),
        store: CardStore::new(),
        generator,
        encoder,
        allow_list: config.allowed_users.clone(),
        export_file_name: config.export_file_name.clone(),
    })
}

/// Builds the handler chain (logging → auth → commands → words).
pub fn build_handler_chain(components: &BotComponents) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(AuthHandler::new(
            components.allow_list.clone(),
            components.bot.clone(),
        )))
        .add_handler(Arc::new(CommandHandler::new(
            components.bot.clone(),
            components.store.clone(),
            components.encoder.clone(),
            components.export_file_name.clone(),
            components.bot_username.clone(),
        )))
        .add_handler(Arc::new(WordHandler::new(
            components.bot.clone(),
            components.store.clone(),
            components.generator.clone(),
        )))
}
