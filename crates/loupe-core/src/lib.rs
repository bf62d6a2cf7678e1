//! Core types shared across the Loupe crates.
//!
//! Defines the tabular data model (cells, rows, query results), the TOML
//! configuration, and the top-level error type.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BackendConfig, ChatConfig, GeneralConfig, LoupeConfig, TableConfig};
pub use error::{LoupeError, Result};
pub use types::{CellValue, QueryResult, Row};
