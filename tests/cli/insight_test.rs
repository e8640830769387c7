//! Integration tests for one-shot and interactive runs of `insight`.

use pretty_assertions::assert_eq;

use super::common::{run_insight, run_insight_with_stdin, run_raw};

const REGION_SQL: &str = "SELECT Region, SUM(Sales) AS Total_Sales, SUM(Profit) AS Total_Profit FROM superstore GROUP BY Region;";

#[test]
fn test_list_presets() {
    let (code, stdout, _) = run_raw(&["--list-presets"]);

    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "1. Show total sales and profit by region.");
}

#[test]
fn test_region_question_text_report() {
    let (code, stdout, stderr) = run_insight(&[
        "--size",
        "80x20",
        "Show total sales and profit by region.",
    ]);

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.starts_with(&format!("Generated SQL: {REGION_SQL}\n")));
    assert!(stdout.contains("Source: fallback (region_sales)"));
    assert!(stdout.contains("Latency: "));
    assert!(stdout.contains("│ Central "), "table should list regions:\n{stdout}");
    assert!(stdout.contains("4 rows returned"));
    assert!(stdout.contains("Sales and Profit by Region"));
}

#[test]
fn test_no_chart_flag() {
    let (code, stdout, _) = run_insight(&["--no-chart", "--preset", "1"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("│ Central "));
    assert!(!stdout.contains("Sales and Profit by Region"));
}

#[test]
fn test_json_output() {
    let (code, stdout, stderr) = run_insight(&["--output", "json", "--preset", "4"]);

    assert_eq!(code, 0, "stderr: {stderr}");
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).expect("valid JSON");

    assert_eq!(report["question"], "Show yearly sales totals from 2014 to 2017.");
    assert_eq!(report["source"]["kind"], "fallback");
    assert_eq!(report["source"]["rule"], "yearly_sales");
    assert_eq!(report["columns"], serde_json::json!(["Year", "Total_Sales"]));
    assert_eq!(report["rows"][0][0], "2014");
    assert_eq!(report["rows"][0][1].as_f64(), Some(600.0));
    assert_eq!(report["chart"]["kind"], "line");
    assert!(report["error"].is_null());
}

#[test]
fn test_unresolved_question_exits_2() {
    let (code, stdout, _) = run_insight(&["What is the weather like?"]);

    assert_eq!(code, 2);
    assert_eq!(
        stdout.trim(),
        "Error: Unresolved Question: What is the weather like?"
    );
}

#[test]
fn test_direct_sql() {
    let (code, stdout, _) = run_insight(&["--sql", "SELECT COUNT(*) AS Lines FROM superstore"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("Source: direct"));
    assert!(!stdout.contains("Latency"));
    assert!(stdout.contains("│ 12 "));
}

#[test]
fn test_bad_sql_exits_2() {
    let (code, stdout, _) = run_insight(&["--sql", "SELECT Revenue FROM superstore"]);

    assert_eq!(code, 2);
    assert!(stdout.contains("Generated SQL: SELECT Revenue FROM superstore;"));
    assert!(stdout.contains("Error: Query Error: no such column"));
}

#[test]
fn test_writes_are_refused() {
    let (code, stdout, _) = run_insight(&["--sql", "DELETE FROM superstore"]);

    assert_eq!(code, 2);
    assert!(stdout.contains("read-only"));
}

#[test]
fn test_missing_dataset_exits_1() {
    let (code, _, stderr) = run_raw(&[
        "--provider",
        "mock",
        "--dataset",
        "/nonexistent/superstore.csv",
        "Show total sales and profit by region.",
    ]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Error: Dataset Error"), "stderr: {stderr}");
}

#[test]
fn test_unknown_provider_exits_1() {
    let (code, _, stderr) = run_raw(&["--provider", "oracle", "total sales"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Error: Configuration Error"), "stderr: {stderr}");
}

#[test]
fn test_invalid_preset_exits_1() {
    let (code, _, stderr) = run_raw(&["--preset", "7"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("choose 1 to 5"));
}

#[test]
fn test_interactive_session() {
    let (code, stdout, _) = run_insight_with_stdin(
        &["--no-chart"],
        "2\n\n/sql SELECT COUNT(*) AS Lines FROM superstore\nWhat is the weather like?\nexit\nShow total sales\n",
    );

    assert_eq!(code, 0);
    assert!(stdout.contains("│ Hank Hill "));
    assert!(stdout.contains("Source: direct"));
    assert!(stdout.contains("Error: Unresolved Question: What is the weather like?"));
    // Input after `exit` is never answered.
    assert!(!stdout.contains("fallback (total_sales)"));
}

#[test]
fn test_interactive_json_lines() {
    let (code, stdout, _) = run_insight_with_stdin(
        &["--output", "json"],
        "1\nHow many orders were placed?\n",
    );

    assert_eq!(code, 0);
    let reports: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("one JSON object per line"))
        .collect();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["source"]["rule"], "region_sales");
    assert_eq!(reports[1]["rows"], serde_json::json!([[10]]));
    assert_eq!(reports[1]["chart"]["kind"], "metric");
}
