//! REPL runner: converts teloxide messages to core::Message and passes them to HandlerChain.

use crate::chain::HandlerChain;
use crate::core::{Message as CoreMessage, ToCoreMessage};
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use super::adapters::TelegramMessageWrapper;

/// Starts the REPL with the given teloxide Bot, HandlerChain, and bot_username cache.
/// Calls get_me() before starting and writes username into bot_username; each text message is
/// converted to core::Message and run through the chain. Messages of one chat are handled one
/// after another (so cards keep submission order); different chats run concurrently.
#[instrument(skip(bot, handler_chain, bot_username))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => {
            if let Some(username) = &me.user.username {
                *bot_username.write().await = Some(username.clone());
                info!(username = %username, "Bot username set before repl");
            }
        }
        Err(e) => warn!(error = %e, "getMe failed; commands addressed as /cmd@bot will be ignored"),
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();

        async move {
            let Some(core_msg) = TelegramMessageWrapper(&msg).to_core() else {
                debug!(chat_id = msg.chat.id.0, "Skipping non-text message");
                return respond(());
            };

            process_message(&chain, &core_msg).await;
            respond(())
        }
    })
    .await;

    Ok(())
}

/// Runs one message through the chain to completion. Chain errors are logged, never propagated.
pub async fn process_message(chain: &HandlerChain, message: &CoreMessage) {
    if let Err(e) = chain.handle(message).await {
        error!(
            error = %e,
            user_id = message.user.id,
            chat_id = message.chat.id,
            "Handler chain failed"
        );
    }
}
