//! Result tables as aligned text.

use crate::db::{QueryResult, Value};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Renders a query result as a bordered text table.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
    max_rows: usize,
}

impl<'a> ResultTable<'a> {
    /// Creates a table showing every row of the result.
    pub fn new(result: &'a QueryResult) -> Self {
        Self {
            result,
            max_rows: usize::MAX,
        }
    }

    /// Limits the number of printed rows.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    fn visible_rows(&self) -> &'a [Vec<Value>] {
        let shown = self.result.rows.len().min(self.max_rows);
        &self.result.rows[..shown]
    }

    /// Calculates the optimal width for each column.
    fn calculate_column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .result
            .columns
            .iter()
            .map(|col| display_width(&col.name).max(MIN_COLUMN_WIDTH))
            .collect();

        for row in self.visible_rows() {
            for (width, value) in widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(&value.to_display_string()));
            }
        }

        widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
    }

    /// Truncates a string to fit within the given width, adding ellipsis if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if display_width(s) <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let kept: String = s.chars().take(max_width - 3).collect();
            format!("{kept}...")
        }
    }

    /// Renders the table, one string per line.
    pub fn render_to_lines(&self) -> Vec<String> {
        if self.result.columns.is_empty() {
            return vec!["(empty result)".to_string()];
        }

        let widths = self.calculate_column_widths();
        let mut lines = Vec::new();

        lines.push(render_border(&widths, '┌', '┬', '┐'));
        lines.push(render_row(
            self.result.columns.iter().map(|c| c.name.as_str()),
            &widths,
        ));
        lines.push(render_border(&widths, '├', '┼', '┤'));

        for row in self.visible_rows() {
            let cells: Vec<String> = row.iter().map(Value::to_display_string).collect();
            lines.push(render_row(cells.iter().map(String::as_str), &widths));
        }

        lines.push(render_border(&widths, '└', '┴', '┘'));

        let hidden = self.result.rows.len() - self.visible_rows().len();
        if hidden > 0 {
            lines.push(format!("… {hidden} more row{}", plural(hidden)));
        }

        lines.push(format!(
            "{} row{} returned ({}ms)",
            self.result.row_count,
            plural(self.result.row_count),
            self.result.elapsed.as_millis()
        ));

        if let Some(warning) = self.result.truncation_warning() {
            lines.push(warning);
        }

        lines
    }

    /// Renders the table as a single string.
    pub fn render_to_string(&self) -> String {
        self.render_to_lines().join("\n")
    }
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Renders a horizontal border line.
fn render_border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(&mid.to_string()))
}

/// Renders one row of cells padded to the column widths.
fn render_row<'c>(cells: impl Iterator<Item = &'c str>, widths: &[usize]) -> String {
    let mut line = String::from("│");
    for (cell, &width) in cells.zip(widths) {
        let text = ResultTable::truncate(cell, width);
        let padding = width - display_width(&text);
        line.push(' ');
        line.push_str(&text);
        line.push_str(&" ".repeat(padding + 1));
        line.push('│');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ColumnInfo;
    use pretty_assertions::assert_eq;

    fn sample_result() -> QueryResult {
        QueryResult::with_data(
            vec![
                ColumnInfo::new("Region", "TEXT"),
                ColumnInfo::new("Total_Sales", "REAL"),
            ],
            vec![
                vec![Value::from("West"), Value::Float(725457.8245)],
                vec![Value::from("East"), Value::Null],
            ],
        )
    }

    #[test]
    fn test_calculate_column_widths() {
        let result = sample_result();
        let table = ResultTable::new(&result);
        assert_eq!(table.calculate_column_widths(), vec![6, 11]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(ResultTable::truncate("hello", 10), "hello");
        assert_eq!(ResultTable::truncate("hello world", 8), "hello...");
        assert_eq!(ResultTable::truncate("hi", 2), "hi");
        assert_eq!(ResultTable::truncate("hello", 3), "hel");
        assert_eq!(ResultTable::truncate("Café société", 7), "Café...");
    }

    #[test]
    fn test_render_to_lines() {
        let result = sample_result();
        let lines = ResultTable::new(&result).render_to_lines();

        assert_eq!(
            lines[..6].to_vec(),
            vec![
                "┌────────┬─────────────┐",
                "│ Region │ Total_Sales │",
                "├────────┼─────────────┤",
                "│ West   │ 725457.82   │",
                "│ East   │ NULL        │",
                "└────────┴─────────────┘",
            ]
        );
        assert_eq!(lines[6], "2 rows returned (0ms)");
    }

    #[test]
    fn test_long_values_are_capped() {
        let long = "x".repeat(60);
        let result = QueryResult::with_data(
            vec![ColumnInfo::new("Product Name", "TEXT")],
            vec![vec![Value::from(long.as_str())]],
        );
        let lines = ResultTable::new(&result).render_to_lines();
        assert!(lines[3].contains(&format!("{}...", "x".repeat(37))));
        assert_eq!(lines[3].chars().count(), MAX_COLUMN_WIDTH + 4);
    }

    #[test]
    fn test_max_rows_adds_note() {
        let result = sample_result();
        let lines = ResultTable::new(&result).with_max_rows(1).render_to_lines();
        assert!(lines.contains(&"… 1 more row".to_string()));
        assert!(!lines.iter().any(|l| l.contains("East")));
    }

    #[test]
    fn test_empty_result() {
        let result = QueryResult::default();
        assert_eq!(ResultTable::new(&result).render_to_string(), "(empty result)");
    }

    #[test]
    fn test_no_rows_still_shows_header() {
        let result = QueryResult::with_data(vec![ColumnInfo::new("Region", "TEXT")], vec![]);
        let text = ResultTable::new(&result).render_to_string();
        assert!(text.contains("│ Region │"));
        assert!(text.contains("0 rows returned"));
    }
}
