//! Backend transport trait and reqwest-based HTTP implementation.
//!
//! The transport only moves bytes: it returns the HTTP status and raw body
//! and reclassifies connection-level faults into [`QueryError`]. All
//! response interpretation happens above it, so strategies are testable
//! with stub transports.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;

use crate::error::QueryError;

/// Raw reply from the backend: HTTP status plus unparsed body text.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

/// Transport to the query backend's two endpoints.
pub trait QuickTransport: Send + Sync {
    /// POST the question to `/quick` and return the raw reply.
    fn post_quick(
        &self,
        question: &str,
    ) -> impl Future<Output = Result<TransportReply, QueryError>> + Send;

    /// GET `/health` under the enforced deadline and return the raw reply.
    fn get_health(&self) -> impl Future<Output = Result<TransportReply, QueryError>> + Send;
}

/// Object-safe version of [`QuickTransport`] for dynamic dispatch.
///
/// `QuickTransport` methods return `impl Future` and are not object-safe;
/// this trait boxes the futures so strategies can hold
/// `Box<dyn DynQuickTransport>` without generics. A blanket implementation
/// covers every `QuickTransport`.
pub trait DynQuickTransport: Send + Sync {
    fn post_quick_boxed<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TransportReply, QueryError>> + Send + 'a>>;

    fn get_health_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<TransportReply, QueryError>> + Send + '_>>;
}

impl<T: QuickTransport> DynQuickTransport for T {
    fn post_quick_boxed<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TransportReply, QueryError>> + Send + 'a>> {
        Box::pin(self.post_quick(question))
    }

    fn get_health_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<TransportReply, QueryError>> + Send + '_>> {
        Box::pin(self.get_health())
    }
}

/// Health-check deadline. There is no deadline on the query path; once a
/// question is dispatched there is no abort path for it.
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// reqwest-backed transport. JSON bodies both ways,
/// `Content-Type: application/json`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    health_timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            health_timeout: Duration::from_secs(HEALTH_TIMEOUT_SECS),
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn read_reply(response: reqwest::Response) -> Result<TransportReply, QueryError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;
        Ok(TransportReply { status, body })
    }
}

impl QuickTransport for HttpTransport {
    async fn post_quick(&self, question: &str) -> Result<TransportReply, QueryError> {
        let response = self
            .client
            .post(self.endpoint("quick"))
            .json(&serde_json::json!({ "question": question }))
            .send()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;
        Self::read_reply(response).await
    }

    async fn get_health(&self) -> Result<TransportReply, QueryError> {
        // The deadline covers the whole fetch, body included; a backend
        // that sends headers and then stalls the body must still time out.
        let probe = async {
            let response = self
                .client
                .get(self.endpoint("health"))
                .send()
                .await
                .map_err(|e| QueryError::Network(e.to_string()))?;
            Self::read_reply(response).await
        };
        tokio::time::timeout(self.health_timeout, probe)
            .await
            .map_err(|_| QueryError::Timeout(self.health_timeout.as_secs()))?
    }
}
