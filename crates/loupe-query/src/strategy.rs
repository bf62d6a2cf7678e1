//! Strategy selection: one capability, two variants.
//!
//! The caller picks the variant per invocation; there is no trait-object
//! hierarchy behind this, just tagged dispatch.

use loupe_core::QueryResult;

use crate::error::QueryError;
use crate::mock::MockStrategy;
use crate::remote::RemoteStrategy;

/// An interchangeable question executor.
pub enum QueryStrategy {
    /// Live backend over HTTP.
    Remote(RemoteStrategy),
    /// Local sample catalog.
    Mock(MockStrategy),
}

impl QueryStrategy {
    /// Execute one question through the selected variant.
    ///
    /// Contract shared by both variants: a trimmed-empty question yields
    /// [`QueryError::EmptyQuestion`] without any I/O, and repeated calls
    /// with the same question run independently.
    pub async fn execute(&self, question: &str) -> Result<QueryResult, QueryError> {
        match self {
            QueryStrategy::Remote(strategy) => strategy.execute(question).await,
            QueryStrategy::Mock(strategy) => strategy.execute(question).await,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QueryStrategy::Remote(_) => "remote",
            QueryStrategy::Mock(_) => "mock",
        }
    }
}
