//! Conversation state and its single source of truth.
//!
//! The store owns the ordered message sequence, the processing flag, and
//! the draft question. It is an explicitly constructed instance handed to
//! the orchestrator and the presentation layer; there is no process-wide
//! singleton. All mutations are synchronous and observers only ever see
//! complete snapshots.

use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use serde::Serialize;
use uuid::Uuid;

use loupe_core::QueryResult;

use crate::error::ChatError;
use crate::types::{Message, MessageRole};

/// Observable conversation state. Insertion order is display order and is
/// never reordered.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub is_processing: bool,
    pub current_question: String,
}

/// Owner of one conversation's state.
#[derive(Debug, Default)]
pub struct ConversationStore {
    inner: Mutex<ConversationState>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, ConversationState>, ChatError> {
        self.inner
            .lock()
            .map_err(|e| ChatError::Store(format!("conversation lock poisoned: {}", e)))
    }

    /// Append a user message and return its id.
    pub fn append_user(&self, content: &str) -> Result<Uuid, ChatError> {
        self.append(MessageRole::User, content)
    }

    /// Append an assistant message and return its id. Content may be
    /// empty, which marks a typing placeholder.
    pub fn append_assistant(&self, content: &str) -> Result<Uuid, ChatError> {
        self.append(MessageRole::Assistant, content)
    }

    fn append(&self, role: MessageRole, content: &str) -> Result<Uuid, ChatError> {
        let mut state = self.lock()?;
        let message = Message {
            id: Uuid::new_v4(),
            role,
            content: content.to_string(),
            created_at: Local::now().timestamp(),
            result: None,
        };
        let id = message.id;
        state.messages.push(message);
        Ok(id)
    }

    /// Replace the content of the message with the given id.
    pub fn update_content(&self, id: Uuid, content: &str) -> Result<(), ChatError> {
        let mut state = self.lock()?;
        let message = state
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ChatError::MessageNotFound(id))?;
        message.content = content.to_string();
        Ok(())
    }

    /// Attach a query result to the assistant message with the given id.
    pub fn attach_result(&self, id: Uuid, result: QueryResult) -> Result<(), ChatError> {
        let mut state = self.lock()?;
        let message = state
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ChatError::MessageNotFound(id))?;
        if message.role != MessageRole::Assistant {
            return Err(ChatError::NotAssistant(id));
        }
        message.result = Some(result);
        Ok(())
    }

    pub fn set_processing(&self, processing: bool) -> Result<(), ChatError> {
        self.lock()?.is_processing = processing;
        Ok(())
    }

    pub fn set_current_question(&self, question: &str) -> Result<(), ChatError> {
        self.lock()?.current_question = question.to_string();
        Ok(())
    }

    /// Discard the whole message sequence and the draft question.
    pub fn clear(&self) -> Result<(), ChatError> {
        let mut state = self.lock()?;
        state.messages.clear();
        state.current_question.clear();
        Ok(())
    }

    /// Remove a single message by id.
    pub fn remove(&self, id: Uuid) -> Result<(), ChatError> {
        let mut state = self.lock()?;
        let index = state
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or(ChatError::MessageNotFound(id))?;
        state.messages.remove(index);
        Ok(())
    }

    /// A complete snapshot of the current state.
    pub fn snapshot(&self) -> Result<ConversationState, ChatError> {
        Ok(self.lock()?.clone())
    }

    pub fn is_processing(&self) -> Result<bool, ChatError> {
        Ok(self.lock()?.is_processing)
    }

    pub fn current_question(&self) -> Result<String, ChatError> {
        Ok(self.lock()?.current_question.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use loupe_core::{CellValue, Row};

    fn sample_result() -> QueryResult {
        QueryResult {
            question: "q".to_string(),
            generated_sql: "SELECT 1;".to_string(),
            rows: vec![Row::from_pairs([("one", CellValue::Int(1))])],
            row_count: 1,
        }
    }

    // ---- Append ----

    #[test]
    fn test_append_user_and_assistant_in_order() {
        let store = ConversationStore::new();
        store.append_user("질문").unwrap();
        store.append_assistant("").unwrap();

        let state = store.snapshot().unwrap();
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].role, MessageRole::User);
        assert_eq!(state.messages[0].content, "질문");
        assert_eq!(state.messages[1].role, MessageRole::Assistant);
        assert!(state.messages[1].is_pending());
    }

    #[test]
    fn test_ids_are_unique() {
        let store = ConversationStore::new();
        let mut ids = Vec::new();
        for _ in 0..50 {
            ids.push(store.append_user("x").unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    // ---- Update ----

    #[test]
    fn test_update_content() {
        let store = ConversationStore::new();
        let id = store.append_assistant("").unwrap();
        store.update_content(id, "answer").unwrap();
        let state = store.snapshot().unwrap();
        assert_eq!(state.messages[0].content, "answer");
    }

    #[test]
    fn test_update_content_unknown_id() {
        let store = ConversationStore::new();
        let err = store.update_content(Uuid::new_v4(), "x").unwrap_err();
        assert!(matches!(err, ChatError::MessageNotFound(_)));
    }

    // ---- Attach result ----

    #[test]
    fn test_attach_result_to_assistant() {
        let store = ConversationStore::new();
        let id = store.append_assistant("").unwrap();
        store.attach_result(id, sample_result()).unwrap();
        let state = store.snapshot().unwrap();
        assert!(state.messages[0].result.is_some());
    }

    #[test]
    fn test_attach_result_to_user_rejected() {
        let store = ConversationStore::new();
        let id = store.append_user("질문").unwrap();
        let err = store.attach_result(id, sample_result()).unwrap_err();
        assert!(matches!(err, ChatError::NotAssistant(_)));
        // Nothing was attached.
        assert!(store.snapshot().unwrap().messages[0].result.is_none());
    }

    #[test]
    fn test_attach_result_unknown_id() {
        let store = ConversationStore::new();
        let err = store
            .attach_result(Uuid::new_v4(), sample_result())
            .unwrap_err();
        assert!(matches!(err, ChatError::MessageNotFound(_)));
    }

    // ---- Flags and draft ----

    #[test]
    fn test_processing_flag() {
        let store = ConversationStore::new();
        assert!(!store.is_processing().unwrap());
        store.set_processing(true).unwrap();
        assert!(store.is_processing().unwrap());
        store.set_processing(false).unwrap();
        assert!(!store.is_processing().unwrap());
    }

    #[test]
    fn test_current_question() {
        let store = ConversationStore::new();
        store.set_current_question("총 이벤트 수").unwrap();
        assert_eq!(store.current_question().unwrap(), "총 이벤트 수");
    }

    // ---- Clear and remove ----

    #[test]
    fn test_clear_discards_messages_and_draft() {
        let store = ConversationStore::new();
        store.append_user("a").unwrap();
        store.append_assistant("b").unwrap();
        store.set_current_question("draft").unwrap();
        store.clear().unwrap();

        let state = store.snapshot().unwrap();
        assert!(state.messages.is_empty());
        assert!(state.current_question.is_empty());
    }

    #[test]
    fn test_remove_message() {
        let store = ConversationStore::new();
        let first = store.append_user("a").unwrap();
        store.append_user("b").unwrap();
        store.remove(first).unwrap();

        let state = store.snapshot().unwrap();
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, "b");
    }

    #[test]
    fn test_remove_unknown_id() {
        let store = ConversationStore::new();
        let err = store.remove(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ChatError::MessageNotFound(_)));
    }

    // ---- Snapshot isolation ----

    #[test]
    fn test_snapshot_is_detached() {
        let store = ConversationStore::new();
        store.append_user("a").unwrap();
        let mut snapshot = store.snapshot().unwrap();
        snapshot.messages.clear();
        assert_eq!(store.snapshot().unwrap().messages.len(), 1);
    }

    // ---- Ordering under interleaved operations ----

    #[test]
    fn test_insertion_order_is_display_order() {
        let store = ConversationStore::new();
        for i in 0..10 {
            store.append_user(&format!("q{}", i)).unwrap();
            store.append_assistant(&format!("a{}", i)).unwrap();
        }
        let state = store.snapshot().unwrap();
        for i in 0..10 {
            assert_eq!(state.messages[2 * i].content, format!("q{}", i));
            assert_eq!(state.messages[2 * i + 1].content, format!("a{}", i));
        }
    }
}
