//! CSV ingestion for the Superstore export.
//!
//! The public export ships as Windows-1252/Latin-1 with US-style dates, so the
//! loader decodes leniently and normalizes dates to ISO format.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tracing::debug;

use crate::error::{InsightError, Result};

/// Date formats accepted in the CSV, tried in order.
const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// One order line of the dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "Row ID")]
    pub row_id: i64,
    #[serde(rename = "Order ID")]
    pub order_id: String,
    #[serde(rename = "Order Date", deserialize_with = "deserialize_date")]
    pub order_date: NaiveDate,
    #[serde(rename = "Ship Date", deserialize_with = "deserialize_date")]
    pub ship_date: NaiveDate,
    #[serde(rename = "Ship Mode")]
    pub ship_mode: String,
    #[serde(rename = "Customer ID")]
    pub customer_id: String,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Segment")]
    pub segment: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Postal Code")]
    pub postal_code: Option<String>,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Product ID")]
    pub product_id: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Sub-Category")]
    pub sub_category: String,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Sales")]
    pub sales: f64,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(rename = "Discount")]
    pub discount: f64,
    #[serde(rename = "Profit")]
    pub profit: f64,
}

/// Parses a date in any of the accepted formats.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

/// Decodes file bytes as UTF-8, falling back to Latin-1.
fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    };
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Reads and parses the dataset file.
pub async fn read_csv(path: &Path) -> Result<Vec<OrderLine>> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        InsightError::dataset(format!("Failed to read {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read dataset file");

    parse_csv(&decode_text(bytes))
}

/// Parses CSV text with a header row into order lines.
pub fn parse_csv(text: &str) -> Result<Vec<OrderLine>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .deserialize::<OrderLine>()
        .map(|record| record.map_err(|e| InsightError::dataset(format!("Malformed CSV: {e}"))))
        .collect()
}
