//! Message types for the conversation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loupe_core::QueryResult;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a conversation.
///
/// Assistant messages start as placeholders with empty content and no
/// result; the presentation layer renders an in-progress indicator for
/// that combination while a query is processing. A query result may only
/// ever be attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    /// Creation time, epoch seconds.
    pub created_at: i64,
    /// Attached query result, assistant messages only.
    pub result: Option<QueryResult>,
}

impl Message {
    /// True for an assistant placeholder still awaiting its answer.
    pub fn is_pending(&self) -> bool {
        self.role == MessageRole::Assistant && self.content.is_empty() && self.result.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_role_as_str() {
        assert_eq!(MessageRole::User.as_str(), "user");
        assert_eq!(MessageRole::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_placeholder_is_pending() {
        let message = Message {
            id: Uuid::new_v4(),
            role: MessageRole::Assistant,
            content: String::new(),
            created_at: Local::now().timestamp(),
            result: None,
        };
        assert!(message.is_pending());
    }

    #[test]
    fn test_resolved_message_not_pending() {
        let message = Message {
            id: Uuid::new_v4(),
            role: MessageRole::Assistant,
            content: "done".to_string(),
            created_at: Local::now().timestamp(),
            result: None,
        };
        assert!(!message.is_pending());
    }

    #[test]
    fn test_user_message_never_pending() {
        let message = Message {
            id: Uuid::new_v4(),
            role: MessageRole::User,
            content: String::new(),
            created_at: Local::now().timestamp(),
            result: None,
        };
        assert!(!message.is_pending());
    }

    #[test]
    fn test_message_serde_round_trip() {
        let message = Message {
            id: Uuid::new_v4(),
            role: MessageRole::User,
            content: "국가별 사용자 수".to_string(),
            created_at: 1_700_000_000,
            result: None,
        };
        let json = serde_json::to_string(&message).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(message, back);
    }
}
