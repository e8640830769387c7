//! End-to-end tests: question, resolved SQL, result and chart.

use pretty_assertions::assert_eq;
use superstore_insight::app::App;
use superstore_insight::chart::ChartKind;
use superstore_insight::config::Config;
use superstore_insight::db::Value;
use superstore_insight::error::InsightError;
use superstore_insight::llm::{GenerationOptions, MockLlmClient};
use superstore_insight::render::{render_chart, CanvasSize};
use superstore_insight::resolver::{QueryResolver, SqlSource, EXAMPLE_QUESTIONS};

use super::fixture_path;

fn app_with(client: MockLlmClient) -> App {
    let mut config = Config::default();
    config.dataset.path = fixture_path();
    let resolver = QueryResolver::new(Box::new(client), GenerationOptions::default());
    App::new(config, resolver)
}

fn app() -> App {
    app_with(MockLlmClient::new())
}

#[tokio::test]
async fn test_every_preset_answers_with_a_chart() {
    let app = app();

    for question in EXAMPLE_QUESTIONS {
        let answer = app.ask(question).await;
        let insight = answer
            .outcome
            .as_ref()
            .unwrap_or_else(|e| panic!("{question}: {e}"));

        assert!(!insight.result.is_empty(), "{question} returned no rows");
        let spec = insight
            .chart
            .as_ref()
            .unwrap_or_else(|| panic!("{question} has no chart"));
        assert!(
            render_chart(spec, &insight.result, CanvasSize::new(80, 20)).is_some(),
            "{question} chart did not render"
        );
    }
}

#[tokio::test]
async fn test_region_question_end_to_end() {
    let answer = app().ask("Show total sales and profit by region.").await;

    let resolved = answer.resolved.as_ref().unwrap();
    assert_eq!(
        resolved.sql,
        "SELECT Region, SUM(Sales) AS Total_Sales, SUM(Profit) AS Total_Profit FROM superstore GROUP BY Region;"
    );
    assert_eq!(resolved.source.label(), "fallback");

    let insight = answer.outcome.unwrap();
    assert_eq!(insight.result.row_count, 4);
    assert_eq!(insight.chart.unwrap().kind, ChartKind::GroupedBar);
}

#[tokio::test]
async fn test_yearly_sales_are_ordered() {
    let answer = app().ask("Show yearly sales totals from 2014 to 2017.").await;
    let insight = answer.outcome.unwrap();

    let years: Vec<(String, f64)> = insight
        .result
        .rows
        .iter()
        .map(|row| (row[0].to_display_string(), row[1].as_f64().unwrap()))
        .collect();
    assert_eq!(
        years,
        vec![
            ("2014".to_string(), 600.0),
            ("2015".to_string(), 430.0),
            ("2016".to_string(), 1540.0),
            ("2017".to_string(), 1720.0),
        ]
    );
    assert_eq!(insight.chart.unwrap().kind, ChartKind::Line);
}

#[tokio::test]
async fn test_top_customers_ranked() {
    let answer = app().ask("List the top 10 customers by total sales.").await;
    let insight = answer.outcome.unwrap();

    let names: Vec<String> = insight
        .result
        .rows
        .iter()
        .map(|row| row[0].to_display_string())
        .collect();
    assert_eq!(names.len(), 8);
    assert_eq!(&names[..3], ["Hank Hill", "Eve Evans", "Alice Adams"]);
    assert_eq!(insight.chart.unwrap().kind, ChartKind::HorizontalBar);
}

#[tokio::test]
async fn test_loss_making_products() {
    let answer = app().ask("Which products are making a loss?").await;
    let insight = answer.outcome.unwrap();

    assert_eq!(
        insight.result.rows,
        vec![
            vec![Value::from("Conference Table"), Value::Float(-200.0)],
            vec![Value::from("Office Chair"), Value::Float(-90.0)],
        ]
    );
}

#[tokio::test]
async fn test_total_sales_is_a_metric() {
    let answer = app().ask("What are our total sales?").await;
    let insight = answer.outcome.unwrap();

    assert_eq!(insight.result.rows, vec![vec![Value::Float(4290.0)]]);
    assert_eq!(insight.chart.unwrap().kind, ChartKind::Metric);
}

#[tokio::test]
async fn test_model_sql_is_executed() {
    let client = MockLlmClient::new().with_response(
        "how many states",
        "SELECT COUNT(DISTINCT State) AS States FROM superstore",
    );
    let answer = app_with(client).ask("How many states do we sell to?").await;

    let resolved = answer.resolved.as_ref().unwrap();
    assert_eq!(resolved.source, SqlSource::Model);
    assert_eq!(
        resolved.sql,
        "SELECT COUNT(DISTINCT State) AS States FROM superstore;"
    );
    let insight = answer.outcome.unwrap();
    assert_eq!(insight.result.rows, vec![vec![Value::Int(8)]]);
    assert!(insight.chart.is_none());
}

#[tokio::test]
async fn test_unreachable_model_uses_fallback() {
    let client = MockLlmClient::new().failing("connection refused");
    let answer = app_with(client).ask("Show sales by segment").await;

    match &answer.resolved.as_ref().unwrap().source {
        SqlSource::Fallback { rule, model_error } => {
            assert_eq!(*rule, "segment");
            assert!(model_error.as_deref().unwrap().contains("connection refused"));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert_eq!(answer.outcome.unwrap().result.row_count, 3);
}

#[tokio::test]
async fn test_unresolved_question() {
    let app = app();
    let answer = app.ask("What is the weather like?").await;

    assert!(answer.resolved.is_none());
    assert!(matches!(answer.error(), Some(InsightError::Unresolved(_))));
    assert!(!app.is_dataset_loaded());
}

#[tokio::test]
async fn test_direct_sql_error_keeps_sql() {
    let answer = app().run_sql("SELECT Revenue FROM superstore").await;

    let resolved = answer.resolved.as_ref().unwrap();
    assert_eq!(resolved.source, SqlSource::Direct);
    assert_eq!(resolved.sql, "SELECT Revenue FROM superstore;");
    match answer.error() {
        Some(InsightError::Query(msg)) => assert!(msg.contains("no such column"), "{msg}"),
        other => panic!("expected query error, got {other:?}"),
    }
}
