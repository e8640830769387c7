//! Error type shared by every layer.
//!
//! Each variant carries a human-readable message. `category` names the
//! failure class the way reports print it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    /// The model endpoint was unreachable, answered with an error status or
    /// sent a body we could not read.
    #[error("Model error: {0}")]
    Model(String),

    /// Neither the model nor any fallback rule produced SQL for the question.
    #[error("Could not turn the question into SQL: {0}")]
    Unresolved(String),

    /// The engine rejected the SQL, or the read-only guard did.
    #[error("Query error: {0}")]
    Query(String),

    /// The CSV could not be read or parsed.
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl InsightError {
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    pub fn unresolved(msg: impl Into<String>) -> Self {
        Self::Unresolved(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Heading used in `Error: <category>: <message>` report lines.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Model(_) => "Model Error",
            Self::Unresolved(_) => "Unresolved Question",
            Self::Query(_) => "Query Error",
            Self::Dataset(_) => "Dataset Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// The bare message, without the variant's display prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Model(msg)
            | Self::Unresolved(msg)
            | Self::Query(msg)
            | Self::Dataset(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
