//! Integration tests for loading and querying the dataset.

use pretty_assertions::assert_eq;
use superstore_insight::db::{Dataset, Value, COLUMNS};
use superstore_insight::error::InsightError;

use super::fixture_path;

async fn load() -> Dataset {
    Dataset::load(&fixture_path())
        .await
        .expect("fixture dataset loads")
}

fn float(value: &Value) -> f64 {
    value.as_f64().expect("numeric value")
}

#[tokio::test]
async fn test_load_counts_rows() {
    let dataset = load().await;
    assert_eq!(dataset.row_count(), 12);

    let result = dataset
        .execute("SELECT COUNT(*) AS n FROM superstore")
        .await
        .unwrap();
    assert_eq!(result.rows[0][0], Value::Int(12));
}

#[tokio::test]
async fn test_every_column_is_queryable() {
    let dataset = load().await;
    let result = dataset.execute("SELECT * FROM superstore LIMIT 1").await.unwrap();

    let expected: Vec<&str> = COLUMNS.iter().map(|c| c.name).collect();
    assert_eq!(result.column_names(), expected);
}

#[tokio::test]
async fn test_region_totals() {
    let dataset = load().await;
    let result = dataset
        .execute(
            "SELECT Region, SUM(Sales) AS Total_Sales, SUM(Profit) AS Total_Profit \
             FROM superstore GROUP BY Region ORDER BY Region;",
        )
        .await
        .unwrap();

    let totals: Vec<(String, f64, f64)> = result
        .rows
        .iter()
        .map(|row| (row[0].to_display_string(), float(&row[1]), float(&row[2])))
        .collect();

    assert_eq!(
        totals,
        vec![
            ("Central".to_string(), 1600.0, -90.0),
            ("East".to_string(), 1820.0, 370.0),
            ("South".to_string(), 440.0, 72.0),
            ("West".to_string(), 430.0, 4.0),
        ]
    );
}

#[tokio::test]
async fn test_quoted_product_name_survives_load() {
    let dataset = load().await;
    let result = dataset
        .execute(r#"SELECT "Product Name" FROM superstore WHERE "Row ID" = 9"#)
        .await
        .unwrap();
    assert_eq!(result.rows[0][0], Value::from("Oak Bookcase, Tall"));
}

#[tokio::test]
async fn test_dates_support_strftime() {
    let dataset = load().await;
    let result = dataset
        .execute(
            r#"SELECT strftime('%Y-%m', "Order Date") AS Month FROM superstore WHERE "Row ID" = 12"#,
        )
        .await
        .unwrap();
    assert_eq!(result.rows[0][0], Value::from("2017-12"));
}

#[tokio::test]
async fn test_missing_postal_code_is_null() {
    let dataset = load().await;
    let result = dataset
        .execute(r#"SELECT COUNT(*) FROM superstore WHERE "Postal Code" IS NULL"#)
        .await
        .unwrap();
    assert_eq!(result.rows[0][0], Value::Int(2));
}

#[tokio::test]
async fn test_writes_are_rejected() {
    let dataset = load().await;

    for sql in [
        "DELETE FROM superstore",
        "UPDATE superstore SET Sales = 0",
        "DROP TABLE superstore",
        "INSERT INTO superstore (\"Row ID\") VALUES (99)",
    ] {
        let err = dataset.execute(sql).await.unwrap_err();
        assert!(matches!(err, InsightError::Query(_)), "{sql} should be rejected");
    }

    let result = dataset.execute("SELECT COUNT(*) FROM superstore").await.unwrap();
    assert_eq!(result.rows[0][0], Value::Int(12));
}

#[tokio::test]
async fn test_missing_file_is_dataset_error() {
    let err = Dataset::load(std::path::Path::new("/nonexistent/superstore.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::Dataset(_)));
}
