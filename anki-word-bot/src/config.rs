//! Bot configuration, loaded from environment variables (`.env` is read by the binary).

use anyhow::{Context, Result};
use std::env;

use crate::access::AllowList;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_AI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_DECK_NAME: &str = anki_deck::DEFAULT_DECK_NAME;
pub const DEFAULT_MODEL_NAME: &str = anki_deck::DEFAULT_MODEL_NAME;
pub const DEFAULT_EXPORT_FILENAME: &str = "german_words.apkg";
pub const DEFAULT_LOG_FILE: &str = "logs/anki-word-bot.log";

/// Runtime configuration of the bot.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN or TELEGRAM_BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    pub log_file: String,
    /// OPENAI_API_KEY or GEMINI_API_KEY
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub ai_model: String,
    pub deck_name: String,
    pub model_name: String,
    pub export_file_name: String,
    /// ALLOWED_USER_IDS; empty means everybody may use the bot.
    pub allowed_users: AllowList,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN")
                .or_else(|_| env::var("TELEGRAM_BOT_TOKEN"))
                .context("BOT_TOKEN not set")?,
        };
        let openai_api_key = env::var("OPENAI_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .context("OPENAI_API_KEY (or GEMINI_API_KEY) not set")?;
        let openai_base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string());
        let ai_model = env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string());
        let deck_name =
            env::var("ANKI_DECK_NAME").unwrap_or_else(|_| DEFAULT_DECK_NAME.to_string());
        let model_name =
            env::var("ANKI_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string());
        let export_file_name = env::var("ANKI_EXPORT_FILENAME")
            .unwrap_or_else(|_| DEFAULT_EXPORT_FILENAME.to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();

        let allowed_users = match env::var("ALLOWED_USER_IDS") {
            Ok(value) => AllowList::parse(&value)
                .with_context(|| format!("ALLOWED_USER_IDS is not a list of integers: {}", value))?,
            Err(_) => AllowList::open(),
        };

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            openai_api_key,
            openai_base_url,
            ai_model,
            deck_name,
            model_name,
            export_file_name,
            allowed_users,
        })
    }

    /// Validate config (URLs must parse, names must be non-blank).
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if self.openai_api_key.trim().is_empty() {
            anyhow::bail!("OPENAI_API_KEY is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if reqwest::Url::parse(&self.openai_base_url).is_err() {
            anyhow::bail!("OPENAI_BASE_URL is not a valid URL: {}", self.openai_base_url);
        }
        for (name, value) in [
            ("AI_MODEL", &self.ai_model),
            ("ANKI_DECK_NAME", &self.deck_name),
            ("ANKI_MODEL_NAME", &self.model_name),
            ("ANKI_EXPORT_FILENAME", &self.export_file_name),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{} must not be blank", name);
            }
        }
        Ok(())
    }
}
