//! Statement inspection with sqlparser's SQLite dialect.
//!
//! SQL that fails to parse goes through a keyword scan instead. Anything the
//! scan does not recognise as a write is let through; the engine's own error
//! names the problem more precisely than sqlparser would.

use sqlparser::ast::{Query, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use tracing::debug;

use super::StatementKind;
use crate::error::{InsightError, Result};

/// Leading keywords SQLite executes that never just read.
const EXECUTABLE_NON_READS: &[&str] = &[
    "INSERT", "REPLACE", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "PRAGMA", "ATTACH",
    "DETACH", "VACUUM", "REINDEX", "BEGIN", "COMMIT", "END", "ROLLBACK", "SAVEPOINT", "RELEASE",
    "ANALYZE",
];

/// Keywords that mark a write wherever they appear in a statement.
const WRITING_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "PRAGMA", "ATTACH", "DETACH",
    "VACUUM",
];

/// Returns the kind of the first writing statement in `sql`, if any.
///
/// Writes hidden in CTEs, subqueries, joins and set operations count, as does
/// a write following a harmless first statement.
///
/// When sqlparser rejects the SQL, each statement is scanned for bare
/// keywords instead, so dialect gaps such as `PRAGMA query_only = OFF` are
/// still caught.
pub fn find_write(sql: &str) -> Option<StatementKind> {
    match Parser::parse_sql(&SQLiteDialect {}, sql) {
        Ok(statements) => statements.iter().find_map(statement_write),
        Err(e) => {
            debug!("sqlparser rejected statement, scanning keywords: {e}");
            keyword_write(sql)
        }
    }
}

/// Fails with a query error when `sql` would modify the dataset.
pub fn guard_read_only(sql: &str) -> Result<()> {
    match find_write(sql) {
        Some(kind) => Err(InsightError::query(format!(
            "The dataset is read-only; {kind} statements are not allowed"
        ))),
        None => Ok(()),
    }
}

fn statement_write(statement: &Statement) -> Option<StatementKind> {
    let kind = match statement {
        Statement::Query(query) => return query_write(query),
        // EXPLAIN plans the wrapped statement without running it.
        Statement::Explain { .. } | Statement::ExplainTable { .. } => return None,
        Statement::Insert(_) => StatementKind::Insert,
        Statement::Update { .. } => StatementKind::Update,
        Statement::Delete(_) => StatementKind::Delete,
        Statement::Drop { .. } => StatementKind::Drop,
        Statement::CreateTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. }
        | Statement::CreateVirtualTable { .. } => StatementKind::Create,
        Statement::AlterTable { .. } => StatementKind::Alter,
        Statement::Pragma { .. } => StatementKind::Pragma,
        _ => StatementKind::Other,
    };
    Some(kind)
}

fn query_write(query: &Query) -> Option<StatementKind> {
    query
        .with
        .iter()
        .flat_map(|with| &with.cte_tables)
        .find_map(|cte| query_write(&cte.query))
        .or_else(|| body_write(&query.body))
}

fn body_write(body: &SetExpr) -> Option<StatementKind> {
    match body {
        SetExpr::Insert(stmt) | SetExpr::Update(stmt) => statement_write(stmt),
        SetExpr::Query(query) => query_write(query),
        SetExpr::Select(select) => select.from.iter().find_map(from_write),
        SetExpr::SetOperation { left, right, .. } => {
            body_write(left).or_else(|| body_write(right))
        }
        _ => None,
    }
}

fn from_write(from: &TableWithJoins) -> Option<StatementKind> {
    std::iter::once(&from.relation)
        .chain(from.joins.iter().map(|join| &join.relation))
        .find_map(|relation| match relation {
            TableFactor::Derived { subquery, .. } => query_write(subquery),
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => from_write(table_with_joins),
            _ => None,
        })
}

fn keyword_write(sql: &str) -> Option<StatementKind> {
    split_words(sql).iter().find_map(|words| {
        let mut rest = words.as_slice();
        if rest.first().map(String::as_str) == Some("EXPLAIN") {
            rest = &rest[1..];
            if rest.len() >= 2 && rest[0] == "QUERY" && rest[1] == "PLAN" {
                rest = &rest[2..];
            }
        }
        let first = rest.first()?;
        if EXECUTABLE_NON_READS.contains(&first.as_str()) {
            return Some(keyword_kind(first));
        }
        rest.iter()
            .find(|word| WRITING_KEYWORDS.contains(&word.as_str()))
            .map(|word| keyword_kind(word))
    })
}

fn keyword_kind(word: &str) -> StatementKind {
    match word {
        "INSERT" | "REPLACE" => StatementKind::Insert,
        "UPDATE" => StatementKind::Update,
        "DELETE" => StatementKind::Delete,
        "DROP" => StatementKind::Drop,
        "CREATE" => StatementKind::Create,
        "ALTER" => StatementKind::Alter,
        "PRAGMA" => StatementKind::Pragma,
        _ => StatementKind::Other,
    }
}

/// Splits `sql` on `;` into statements of uppercased bare words.
///
/// Quoted strings, quoted identifiers and comments are skipped.
fn split_words(sql: &str) -> Vec<Vec<String>> {
    let mut statements = vec![Vec::new()];
    let mut word = String::new();
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            word.extend(c.to_uppercase());
            continue;
        }
        if !word.is_empty() {
            if let Some(current) = statements.last_mut() {
                current.push(std::mem::take(&mut word));
            }
        }
        match c {
            '\'' | '"' | '`' => {
                for next in chars.by_ref() {
                    if next == c {
                        break;
                    }
                }
            }
            '[' => {
                for next in chars.by_ref() {
                    if next == ']' {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut star = false;
                for next in chars.by_ref() {
                    if star && next == '/' {
                        break;
                    }
                    star = next == '*';
                }
            }
            ';' => statements.push(Vec::new()),
            _ => {}
        }
    }
    if !word.is_empty() {
        if let Some(current) = statements.last_mut() {
            current.push(word);
        }
    }
    statements
}
