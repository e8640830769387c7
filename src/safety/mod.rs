//! Read-only guard for dataset queries.
//!
//! The dataset never changes after load. Statements that would write are
//! refused here, before they reach the engine.

mod parser;

pub use parser::{find_write, guard_read_only};

use std::fmt;

/// Statement kinds the guard tells apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Explain,
    Insert,
    Update,
    Delete,
    Drop,
    Create,
    Alter,
    Pragma,
    /// Anything else the parser understands: transactions, ATTACH, VACUUM and so on.
    Other,
}

impl StatementKind {
    /// True for statements that leave the dataset untouched.
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::Select | Self::Explain)
    }

    /// Leading SQL keyword, used in refusal messages.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Explain => "EXPLAIN",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Drop => "DROP",
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Pragma => "PRAGMA",
            Self::Other => "non-query",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
