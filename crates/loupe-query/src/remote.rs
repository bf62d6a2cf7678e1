//! Remote execution strategy: POST the question to the backend's `/quick`
//! endpoint and validate the response shape into a typed [`QueryResult`].
//!
//! Validation is staged: HTTP status, then the boolean `success`
//! discriminator, then the full quick-mode shape. Nothing downstream ever
//! sees an unvalidated payload.

use serde::Deserialize;
use tracing::debug;

use loupe_core::{QueryResult, Row};

use crate::error::QueryError;
use crate::transport::{DynQuickTransport, HttpTransport, QuickTransport, TransportReply};

/// Executes questions against the live query backend.
pub struct RemoteStrategy {
    transport: Box<dyn DynQuickTransport>,
}

impl RemoteStrategy {
    pub fn new(transport: impl QuickTransport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Convenience constructor over the standard HTTP transport.
    pub fn over_http(base_url: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(base_url))
    }

    /// Execute one question. Two calls with the same question perform two
    /// independent executions; nothing is cached.
    pub async fn execute(&self, question: &str) -> Result<QueryResult, QueryError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QueryError::EmptyQuestion);
        }

        debug!(question, "dispatching quick query");
        let reply = self.transport.post_quick_boxed(question).await?;
        parse_quick_reply(reply)
    }
}

/// Successful quick-mode response body. `success` is checked separately
/// before this shape is required.
#[derive(Debug, Deserialize)]
struct QuickBody {
    mode: String,
    original_question: String,
    generated_sql: String,
    data: Vec<Row>,
    row_count: u64,
}

fn parse_quick_reply(reply: TransportReply) -> Result<QueryResult, QueryError> {
    if !(200..300).contains(&reply.status) {
        // A failure body may still carry the backend's own error text;
        // prefer it over the bare status line.
        if let Some(text) = backend_error_text(&reply.body) {
            return Err(QueryError::Backend(text));
        }
        return Err(QueryError::Backend(format!("HTTP {}", reply.status)));
    }

    let value: serde_json::Value = serde_json::from_str(&reply.body)
        .map_err(|e| QueryError::Malformed(format!("response is not JSON: {}", e)))?;

    let Some(success) = value.get("success").and_then(serde_json::Value::as_bool) else {
        return Err(QueryError::Malformed(
            "missing boolean `success` field".to_string(),
        ));
    };

    if !success {
        let text = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unspecified backend failure")
            .to_string();
        return Err(QueryError::Backend(text));
    }

    let body: QuickBody = serde_json::from_value(value)
        .map_err(|e| QueryError::Malformed(format!("invalid quick response: {}", e)))?;

    if body.mode != "quick" {
        return Err(QueryError::Malformed(format!(
            "unsupported response mode `{}`",
            body.mode
        )));
    }

    Ok(QueryResult {
        question: body.original_question,
        generated_sql: body.generated_sql,
        rows: body.data,
        row_count: body.row_count,
    })
}

/// Error text of a `success: false` body, if the body parses as one.
fn backend_error_text(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    if value.get("success")?.as_bool()? {
        return None;
    }
    value
        .get("error")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

// =============================================================================
// Tests
// =============================================================================
