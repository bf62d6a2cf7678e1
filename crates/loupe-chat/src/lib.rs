//! Conversational layer for Loupe.
//!
//! Owns the ordered message sequence and the in-flight processing flag,
//! and coordinates one question's lifecycle from user message through
//! placeholder to resolved answer.

pub mod error;
pub mod orchestrator;
pub mod store;
pub mod types;

pub use error::ChatError;
pub use orchestrator::{success_summary, QueryOrchestrator};
pub use store::{ConversationState, ConversationStore};
pub use types::{Message, MessageRole};
