//! Error taxonomy for query execution.

use thiserror::Error;

/// Classified query execution failure.
///
/// Every transport or validation fault is mapped onto one of these kinds
/// before returning to the orchestrator. The `Display` form carries the
/// technical detail for logs; [`QueryError::user_message`] is what the
/// conversation shows.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Question was empty or whitespace-only.
    #[error("question cannot be empty")]
    EmptyQuestion,
    /// Transport unreachable: connection refused, DNS, reset.
    #[error("network error: {0}")]
    Network(String),
    /// The enforced deadline expired (health-check path only).
    #[error("backend timed out after {0} seconds")]
    Timeout(u64),
    /// Non-success HTTP status, or a `success: false` response body.
    #[error("backend error: {0}")]
    Backend(String),
    /// Response body missing required fields or of the wrong shape.
    #[error("malformed backend response: {0}")]
    Malformed(String),
    /// Anything uncaught.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl QueryError {
    /// The one user-facing sentence for this kind of failure.
    ///
    /// The mapping is total and the sentences are literal product copy;
    /// no backend internals or transport detail leak through.
    pub fn user_message(&self) -> &'static str {
        match self {
            QueryError::EmptyQuestion => "질문을 입력해주세요.",
            QueryError::Network(_) => "네트워크 연결 오류가 발생했습니다.",
            QueryError::Timeout(_) => "백엔드 서버 응답 시간이 초과되었습니다.",
            QueryError::Backend(_) => {
                "백엔드 서버 오류가 발생했습니다. 잠시 후 다시 시도해주세요."
            }
            QueryError::Malformed(_) => "잘못된 API 응답 형식입니다.",
            QueryError::Unknown(_) => {
                "예상치 못한 오류가 발생했습니다. 잠시 후 다시 시도해주세요."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_detail() {
        let err = QueryError::Backend("HTTP 503: server busy".to_string());
        assert_eq!(err.to_string(), "backend error: HTTP 503: server busy");

        let err = QueryError::Timeout(5);
        assert_eq!(err.to_string(), "backend timed out after 5 seconds");

        let err = QueryError::EmptyQuestion;
        assert_eq!(err.to_string(), "question cannot be empty");
    }

    #[test]
    fn test_user_message_is_total() {
        let kinds = [
            QueryError::EmptyQuestion,
            QueryError::Network("x".to_string()),
            QueryError::Timeout(5),
            QueryError::Backend("x".to_string()),
            QueryError::Malformed("x".to_string()),
            QueryError::Unknown("x".to_string()),
        ];
        for kind in kinds {
            assert!(!kind.user_message().is_empty());
        }
    }

    #[test]
    fn test_user_message_hides_technical_detail() {
        let err = QueryError::Backend("connection reset by peer at 10.0.0.5".to_string());
        assert!(!err.user_message().contains("10.0.0.5"));
        assert!(!err.user_message().contains("reset"));
    }

    #[test]
    fn test_same_kind_same_sentence() {
        let a = QueryError::Network("dns failure".to_string());
        let b = QueryError::Network("connection refused".to_string());
        assert_eq!(a.user_message(), b.user_message());
    }
}
