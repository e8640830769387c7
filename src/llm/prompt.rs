//! Prompt construction for text-to-SQL requests.
//!
//! The prompt is fixed apart from the question: it names the table and lists
//! every column so the model can only refer to real names.

use crate::db::schema::{column_list, TABLE_NAME};

/// Marker preceding the user's question in the prompt.
pub const QUESTION_MARKER: &str = "Question:";

/// Prompt template for the SQL generator.
const PROMPT_TEMPLATE: &str = r#"Translate the question into a single SQLite query.
Table: {table}
Columns: {columns}
Quote column names that contain spaces or dashes with double quotes.
Question: {question}
SQL:"#;

/// Builds the prompt with table name, columns and question injected.
pub fn build_prompt(question: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{table}", TABLE_NAME)
        .replace("{columns}", &column_list())
        .replace("{question}", question.trim())
}
