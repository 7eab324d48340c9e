//! Handlers for logging and the allow-list gate.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::access::AllowList;
use crate::core::{Bot, Handler, HandlerError, HandlerResponse, Message, Result};
use crate::messages;

/// Logs each message in before() and the final response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            username = %message.user.display_name(),
            message_content = %message.content,
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        debug!(
            message_id = %message.id,
            response = ?response,
            "Processed message"
        );
        Ok(())
    }
}

/// Stops the chain for users outside the allow list and tells them so.
pub struct AuthHandler {
    allow_list: AllowList,
    bot: Arc<dyn Bot>,
}

impl AuthHandler {
    pub fn new(allow_list: AllowList, bot: Arc<dyn Bot>) -> Self {
        Self { allow_list, bot }
    }
}

#[async_trait]
impl Handler for AuthHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let user_id = message.user.id;
        if self.allow_list.is_authorized(user_id) {
            debug!(user_id = user_id, "User authorized");
            return Ok(true);
        }

        warn!(
            user_id = user_id,
            username = %message.user.display_name(),
            "Unauthorized access attempt"
        );
        self.bot
            .reply_to(message, &messages::error_text(&HandlerError::AuthorizationDenied))
            .await?;
        Ok(false)
    }
}
