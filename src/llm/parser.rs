//! SQL extraction from raw model output.
//!
//! Models wrap SQL in prose, fenced code blocks, or nothing at all. The first
//! `SELECT` statement wins, and the result always ends with exactly one `;`.

use regex::Regex;
use std::sync::OnceLock;

/// Case-insensitive, dot-all, non-greedy: from a `SELECT` keyword to the first
/// `;` or the end of the text.
const SELECT_PATTERN: &str = r"(?is)\bselect\b.*?(?:;|\z)";

fn select_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SELECT_PATTERN).expect("SELECT_PATTERN is a valid regex"))
}

/// Extracts the first SELECT statement from a model response.
///
/// Code blocks are searched first (```` ```sql ```` before a bare fence) so a
/// trailing closing fence never leaks into the statement. Returns `None` when
/// no `SELECT` appears anywhere.
pub fn extract_sql(response: &str) -> Option<String> {
    let blocks = [
        extract_code_block(response, "sql"),
        extract_code_block(response, ""),
    ];

    blocks
        .iter()
        .flatten()
        .find_map(|block| find_select(block))
        .or_else(|| find_select(response))
}

/// Finds the first SELECT statement in `text` and normalizes its terminator.
fn find_select(text: &str) -> Option<String> {
    let matched = select_regex().find(text)?;
    Some(normalize_terminator(matched.as_str()))
}

/// Trims the statement and guarantees a single trailing semicolon.
pub fn normalize_terminator(sql: &str) -> String {
    let body = sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    format!("{body};")
}

/// Extracts content from a markdown code block with the specified language.
///
/// Pass an empty string for `lang` to match blocks without a language specifier.
fn extract_code_block(text: &str, lang: &str) -> Option<String> {
    let start_pattern = format!("```{}", lang);

    let start_idx = text.find(&start_pattern)?;

    // Content starts after the newline that ends the opening fence
    let content_start = text[start_idx + start_pattern.len()..]
        .find('\n')
        .map(|i| start_idx + start_pattern.len() + i + 1)?;

    // A generic fence followed by text is a block in some other language
    if lang.is_empty() {
        let after_fence = &text[start_idx + 3..content_start - 1];
        if !after_fence.trim().is_empty() {
            return None;
        }
    }

    let end_idx = text[content_start..].find("```")?;

    Some(text[content_start..content_start + end_idx].to_string())
}
