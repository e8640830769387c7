//! Report formatting for answers.
//!
//! Provides two output formats: human-readable text and one JSON object per
//! answer.

use serde::Serialize;

use crate::app::Answer;
use crate::chart::ChartSpec;
use crate::db::Row;
use crate::error::{InsightError, Result};
use crate::render::{render_chart, CanvasSize, ResultTable};
use crate::resolver::SqlSource;

/// Output format for answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Text with a table and an optional chart.
    #[default]
    Text,
    /// JSON object with SQL, rows, and chart metadata.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// Display settings for text reports.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub max_rows: usize,
    pub canvas: CanvasSize,
    pub show_chart: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_rows: 50,
            canvas: CanvasSize::default(),
            show_chart: true,
        }
    }
}

/// Formats an answer in the requested format.
pub fn format_answer(answer: &Answer, format: OutputFormat, options: &ReportOptions) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(answer, options)),
        OutputFormat::Json => render_json(answer),
    }
}

/// Formats an error the way every report shows it.
pub fn format_error(error: &InsightError) -> String {
    format!("Error: {}: {}", error.category(), error.message())
}

/// Rounds a latency to two decimals of a second.
fn latency_secs(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

/// Renders the human-readable report.
pub fn render_text(answer: &Answer, options: &ReportOptions) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(resolved) = &answer.resolved {
        let mut header = vec![format!("Generated SQL: {}", resolved.sql)];

        match &resolved.source {
            SqlSource::Fallback { rule, model_error } => {
                header.push(format!("Source: fallback ({rule})"));
                header.push(latency_line(resolved.latency.as_secs_f64()));
                if let Some(msg) = model_error {
                    header.push(format!("Warning: model unavailable, used fallback rule: {msg}"));
                }
            }
            SqlSource::Model => {
                header.push("Source: model".to_string());
                header.push(latency_line(resolved.latency.as_secs_f64()));
            }
            SqlSource::Direct => header.push("Source: direct".to_string()),
        }

        sections.push(header.join("\n"));
    }

    match &answer.outcome {
        Ok(insight) => {
            sections.push(
                ResultTable::new(&insight.result)
                    .with_max_rows(options.max_rows)
                    .render_to_string(),
            );

            if options.show_chart {
                if let Some(chart) = insight
                    .chart
                    .as_ref()
                    .and_then(|spec| render_chart(spec, &insight.result, options.canvas))
                {
                    sections.push(chart);
                }
            }
        }
        Err(e) => sections.push(format_error(e)),
    }

    sections.join("\n\n")
}

fn latency_line(secs: f64) -> String {
    format!("Latency: {:.2} seconds", latency_secs(secs))
}

#[derive(Serialize)]
struct JsonError<'a> {
    category: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    question: &'a str,
    sql: Option<&'a str>,
    source: Option<&'a SqlSource>,
    latency_secs: Option<f64>,
    columns: Vec<&'a str>,
    rows: &'a [Row],
    chart: Option<&'a ChartSpec>,
    error: Option<JsonError<'a>>,
}

/// Renders the answer as a single-line JSON object.
pub fn render_json(answer: &Answer) -> Result<String> {
    let resolved = answer.resolved.as_ref();
    let insight = answer.outcome.as_ref().ok();

    let report = JsonReport {
        question: &answer.question,
        sql: resolved.map(|r| r.sql.as_str()),
        source: resolved.map(|r| &r.source),
        latency_secs: resolved
            .filter(|r| r.source != SqlSource::Direct)
            .map(|r| latency_secs(r.latency.as_secs_f64())),
        columns: insight
            .map(|i| i.result.column_names())
            .unwrap_or_default(),
        rows: insight.map(|i| i.result.rows.as_slice()).unwrap_or(&[]),
        chart: insight.and_then(|i| i.chart.as_ref()),
        error: answer.error().map(|e| JsonError {
            category: e.category(),
            message: e.message(),
        }),
    };

    serde_json::to_string(&report)
        .map_err(|e| InsightError::internal(format!("Failed to serialize report: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Insight;
    use crate::chart::select_chart;
    use crate::db::{ColumnInfo, QueryResult, Value};
    use crate::resolver::ResolvedQuery;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn region_answer() -> Answer {
        let result = QueryResult::with_data(
            vec![
                ColumnInfo::new("Region", "TEXT"),
                ColumnInfo::new("Total_Sales", "REAL"),
                ColumnInfo::new("Total_Profit", "REAL"),
            ],
            vec![
                vec![Value::from("South"), Value::Float(1219.54), Value::Float(-341.12)],
                vec![Value::from("West"), Value::Float(14.62), Value::Float(6.87)],
            ],
        );
        let chart = select_chart(&result);
        Answer {
            question: "Show total sales and profit by region.".to_string(),
            resolved: Some(ResolvedQuery {
                sql: "SELECT Region, SUM(Sales) AS Total_Sales, SUM(Profit) AS Total_Profit FROM superstore GROUP BY Region;".to_string(),
                source: SqlSource::Fallback {
                    rule: "region_sales",
                    model_error: None,
                },
                latency: Duration::from_millis(1234),
            }),
            outcome: Ok(Insight { result, chart }),
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("frames".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_text_report_header() {
        let text = render_text(&region_answer(), &ReportOptions::default());
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Generated SQL: SELECT Region"));
        assert_eq!(lines[1], "Source: fallback (region_sales)");
        assert_eq!(lines[2], "Latency: 1.23 seconds");
        assert!(text.contains("│ South  │"));
        assert!(text.contains("Sales and Profit by Region"));
    }

    #[test]
    fn test_text_report_without_chart() {
        let options = ReportOptions {
            show_chart: false,
            ..ReportOptions::default()
        };
        let text = render_text(&region_answer(), &options);
        assert!(!text.contains("Sales and Profit by Region"));
    }

    #[test]
    fn test_text_report_model_warning() {
        let mut answer = region_answer();
        if let Some(resolved) = answer.resolved.as_mut() {
            resolved.source = SqlSource::Fallback {
                rule: "region_sales",
                model_error: Some("connection refused".to_string()),
            };
        }
        let text = render_text(&answer, &ReportOptions::default());
        assert!(text.contains("Warning: model unavailable, used fallback rule: connection refused"));
        assert!(!text.contains("Model error:"));
    }

    #[test]
    fn test_text_report_error() {
        let answer = Answer {
            question: "What is the weather like?".to_string(),
            resolved: None,
            outcome: Err(InsightError::unresolved("What is the weather like?")),
        };
        assert_eq!(
            render_text(&answer, &ReportOptions::default()),
            "Error: Unresolved Question: What is the weather like?"
        );
    }

    #[test]
    fn test_json_report_shape() {
        let json = render_json(&region_answer()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["question"], "Show total sales and profit by region.");
        assert_eq!(value["source"]["kind"], "fallback");
        assert_eq!(value["source"]["rule"], "region_sales");
        assert_eq!(value["latency_secs"], 1.23);
        assert_eq!(
            value["columns"],
            serde_json::json!(["Region", "Total_Sales", "Total_Profit"])
        );
        assert_eq!(value["rows"][0], serde_json::json!(["South", 1219.54, -341.12]));
        assert_eq!(value["chart"]["kind"], "grouped_bar");
        assert!(value["error"].is_null());
    }

    #[test]
    fn test_json_report_error() {
        let answer = Answer {
            question: "SELECT nope".to_string(),
            resolved: Some(ResolvedQuery::direct("SELECT nope")),
            outcome: Err(InsightError::query("no such column: nope")),
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&answer).unwrap()).unwrap();

        assert_eq!(value["sql"], "SELECT nope;");
        assert_eq!(value["source"]["kind"], "direct");
        assert!(value["latency_secs"].is_null());
        assert_eq!(value["rows"], serde_json::json!([]));
        assert_eq!(value["error"]["category"], "Query Error");
        assert_eq!(value["error"]["message"], "no such column: nope");
    }
}
