//! Dataset storage for superstore-insight.
//!
//! Loads the Superstore CSV into an in-memory SQLite relation and executes
//! read-only SQL against it.

mod dataset;
pub mod loader;
pub mod schema;
mod types;

pub use dataset::{Dataset, MAX_ROWS};
pub use loader::OrderLine;
pub use schema::{ColumnKind, DatasetColumn, COLUMNS, TABLE_NAME};
pub use types::{format_float, ColumnInfo, QueryResult, Row, Value};
