//! # Handler chain
//!
//! Per-message dispatch. Every handler's `before` runs first, in order; the auth gate lives there
//! and a `false` ends processing (the message is rejected). Then `handle` runs in order until one
//! handler returns Stop or Reply (routing). Finally every `after` runs in reverse order with the
//! final response. Nothing is carried over between messages.

use crate::core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered handlers: before (all) → handle (until Stop/Reply) → after (reverse).
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs one message through the chain and returns the final response (`Stop` when a `before`
    /// rejected it, `Continue` when no handler claimed it).
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        debug!(message_id = %message.id, "handler_chain started");

        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            if !h.before(message).await? {
                info!(handler = %name, "Message rejected in before phase");
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            let response = h.handle(message).await?;
            debug!(handler = %name, response = ?response, "Handler processed");

            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    let reply_len = match &response {
                        HandlerResponse::Reply(s) => Some(s.len()),
                        _ => None,
                    };
                    info!(handler = %name, reply_len = ?reply_len, "Message handled");
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => {}
            }
        }

        for h in self.handlers.iter().rev() {
            h.after(message, &final_response).await?;
        }

        debug!(message_id = %message.id, response = ?final_response, "handler_chain finished");
        Ok(final_response)
    }
}
