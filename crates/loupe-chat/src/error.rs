//! Error types for the conversational layer.

use uuid::Uuid;

/// Errors from the conversation store and orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("question cannot be empty")]
    EmptyQuestion,
    #[error("message not found: {0}")]
    MessageNotFound(Uuid),
    #[error("result can only be attached to an assistant message: {0}")]
    NotAssistant(Uuid),
    #[error("store error: {0}")]
    Store(String),
}
