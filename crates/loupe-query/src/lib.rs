//! Query execution strategies for Loupe.
//!
//! A question is executed by one of two interchangeable strategies: the
//! remote strategy posts it to the natural-language query backend over
//! HTTP, the mock strategy answers it from a fixed local sample catalog.
//! Every failure path is classified into a [`QueryError`] before it leaves
//! this crate; raw transport faults never escape.

pub mod error;
pub mod health;
pub mod mock;
pub mod remote;
pub mod strategy;
pub mod transport;

pub use error::QueryError;
pub use health::{HealthChecker, HealthReport};
pub use mock::MockStrategy;
pub use remote::RemoteStrategy;
pub use strategy::QueryStrategy;
pub use transport::{DynQuickTransport, HttpTransport, QuickTransport, TransportReply};
