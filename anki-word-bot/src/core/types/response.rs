//! Handler chain result type.

/// Result of one handler. The first `Stop` or `Reply` ends the handle phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Message handled (or deliberately dropped); stop the chain.
    Stop,
    /// Not for this handler; try the next one.
    Ignore,
    /// Stop the chain; carries the text that was sent back so `after()` hooks can log it.
    Reply(String),
}
