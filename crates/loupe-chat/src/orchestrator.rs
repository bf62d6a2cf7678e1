//! Turn lifecycle orchestration.
//!
//! A single `ask` call owns one full question/answer exchange: it appends
//! the user message, posts an assistant placeholder, runs the active
//! strategy, and resolves the placeholder with either a success summary
//! plus the attached result or the error's user-facing sentence.

use std::sync::Arc;

use loupe_core::QueryResult;
use loupe_query::QueryStrategy;
use loupe_table::group_thousands;

use crate::error::ChatError;
use crate::store::ConversationStore;

/// Drives question/answer turns against a [`ConversationStore`].
///
/// Overlapping `ask` calls on the same store are outside the contract;
/// callers sequence turns and use `is_processing` to gate input.
#[derive(Debug, Clone)]
pub struct QueryOrchestrator {
    store: Arc<ConversationStore>,
}

impl QueryOrchestrator {
    pub fn new(store: Arc<ConversationStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Run one question through the given strategy.
    ///
    /// A blank question leaves the conversation untouched and returns
    /// [`ChatError::EmptyQuestion`]. Otherwise exactly one user message
    /// and one assistant message are appended, in that order, and the
    /// processing flag is false again by the time this returns.
    pub async fn ask(&self, question: &str, strategy: &QueryStrategy) -> Result<(), ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }

        tracing::info!(strategy = strategy.name(), "dispatching question");

        self.store.append_user(question)?;
        let assistant_id = self.store.append_assistant("")?;
        self.store.set_processing(true)?;
        self.store.set_current_question("")?;

        let outcome = strategy.execute(question).await;

        let resolution = match outcome {
            Ok(result) => self
                .store
                .update_content(assistant_id, &success_summary(&result))
                .and_then(|_| self.store.attach_result(assistant_id, result)),
            Err(err) => {
                tracing::warn!(error = %err, "query execution failed");
                self.store.update_content(assistant_id, err.user_message())
            }
        };

        // The flag must drop even when resolving the placeholder failed.
        let stopped = self.store.set_processing(false);
        resolution?;
        stopped
    }
}

/// The assistant text shown above a successful result table.
pub fn success_summary(result: &QueryResult) -> String {
    format!(
        "✅ 쿼리가 성공적으로 실행되었습니다.\n\n**실행된 SQL:**\n```sql\n{}\n```\n\n**결과:** {}개의 레코드가 조회되었습니다.",
        result.generated_sql,
        group_thousands(result.row_count)
    )
}

// =============================================================================
// Tests
// =============================================================================
