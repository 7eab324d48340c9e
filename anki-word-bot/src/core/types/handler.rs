//! Handler trait and transport conversion traits.

use async_trait::async_trait;

use super::{message::Message, response::HandlerResponse, user::User};
use crate::core::error::Result;

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`]. Returns `None` for messages
/// the bot does not process (no text, no sender).
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Option<Message>;
}

/// One step of the chain: optional before / handle / after. The chain runs every `before` in
/// order, then `handle` until Stop/Reply, then every `after` in reverse.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> Result<bool> {
        Ok(true)
    }
    /// Processes the message. Default: Continue.
    async fn handle(&self, _message: &Message) -> Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(&self, _message: &Message, _response: &HandlerResponse) -> Result<()> {
        Ok(())
    }
}
