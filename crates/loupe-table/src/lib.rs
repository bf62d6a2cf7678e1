//! Pure presentation model for tabular query results.
//!
//! Classifies individual cells for rendering, slices bounded row sets into
//! pages, and serializes row sets to CSV. No state, no I/O; the
//! presentation layer pulls these on render.

pub mod export;
pub mod format;
pub mod paginate;

pub use export::{columns, export_filename, to_csv};
pub use format::{format_cell, group_thousands, CellRender};
pub use paginate::{paginate, Page};
