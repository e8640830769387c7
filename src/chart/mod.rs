//! Chart selection from result column names.
//!
//! An ordered list of (required columns, chart descriptor) pairs; the first
//! rule whose columns are all present wins. Values are never inspected, so
//! the decision can be made and tested without running a query.

use serde::Serialize;
use std::fmt;

use crate::db::QueryResult;

/// Visualization kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    GroupedBar,
    Line,
    HorizontalBar,
    Pie,
    /// A single scalar value in a box.
    Metric,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bar => "bar",
            Self::GroupedBar => "grouped bar",
            Self::Line => "line",
            Self::HorizontalBar => "horizontal bar",
            Self::Pie => "pie",
            Self::Metric => "metric",
        };
        write!(f, "{name}")
    }
}

/// Data-only description of the chart to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// Column holding the category labels; `None` for metrics.
    pub category: Option<String>,
    /// Numeric columns plotted against the category.
    pub series: Vec<String>,
}

/// One dispatch rule.
#[derive(Debug, Clone, Copy)]
pub struct ChartRule {
    pub kind: ChartKind,
    pub title: &'static str,
    pub category: Option<&'static str>,
    pub series: &'static [&'static str],
    /// Requires the column set to be exactly category + series.
    pub exclusive: bool,
}

impl ChartRule {
    fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.category.into_iter().chain(self.series.iter().copied())
    }

    /// Returns true if the column names satisfy this rule.
    pub fn matches(&self, columns: &[&str]) -> bool {
        let present = self.required().all(|name| columns.contains(&name));
        if !present {
            return false;
        }
        !self.exclusive || columns.iter().all(|c| self.required().any(|name| name == *c))
    }

    fn to_spec(self) -> ChartSpec {
        ChartSpec {
            kind: self.kind,
            title: self.title.to_string(),
            category: self.category.map(str::to_string),
            series: self.series.iter().map(|s| s.to_string()).collect(),
        }
    }
}

const fn rule(
    kind: ChartKind,
    title: &'static str,
    category: &'static str,
    series: &'static [&'static str],
) -> ChartRule {
    ChartRule {
        kind,
        title,
        category: Some(category),
        series,
        exclusive: false,
    }
}

const fn metric(title: &'static str, series: &'static [&'static str]) -> ChartRule {
    ChartRule {
        kind: ChartKind::Metric,
        title,
        category: None,
        series,
        exclusive: true,
    }
}

/// Dispatch table, in priority order.
pub const CHART_RULES: &[ChartRule] = &[
    rule(
        ChartKind::GroupedBar,
        "Sales and Profit by Region",
        "Region",
        &["Total_Sales", "Total_Profit"],
    ),
    rule(ChartKind::Bar, "Sales by Region", "Region", &["Total_Sales"]),
    rule(ChartKind::Line, "Sales by Year", "Year", &["Total_Sales"]),
    rule(ChartKind::Line, "Sales by Month", "Month", &["Total_Sales"]),
    rule(
        ChartKind::Line,
        "Average Profit by Discount",
        "Discount",
        &["Avg_Profit"],
    ),
    rule(
        ChartKind::Bar,
        "Profit Margin by Category",
        "Category",
        &["Profit_Margin"],
    ),
    rule(
        ChartKind::GroupedBar,
        "Sales and Profit by Category",
        "Category",
        &["Total_Sales", "Total_Profit"],
    ),
    rule(
        ChartKind::HorizontalBar,
        "Profit by Sub-Category",
        "Sub-Category",
        &["Total_Profit"],
    ),
    rule(
        ChartKind::HorizontalBar,
        "Top Customers by Sales",
        "Customer Name",
        &["Total_Sales"],
    ),
    rule(
        ChartKind::HorizontalBar,
        "Top Products by Sales",
        "Product Name",
        &["Total_Sales"],
    ),
    rule(
        ChartKind::HorizontalBar,
        "Products by Profit",
        "Product Name",
        &["Total_Profit"],
    ),
    rule(
        ChartKind::HorizontalBar,
        "Top States by Sales",
        "State",
        &["Total_Sales"],
    ),
    rule(
        ChartKind::HorizontalBar,
        "Top Cities by Sales",
        "City",
        &["Total_Sales"],
    ),
    rule(ChartKind::Pie, "Sales by Segment", "Segment", &["Total_Sales"]),
    rule(ChartKind::Pie, "Orders by Ship Mode", "Ship Mode", &["Order_Count"]),
    metric("Total Sales", &["Total_Sales"]),
    metric("Average Order Value", &["Avg_Order_Value"]),
    metric("Number of Orders", &["Order_Count"]),
];

/// Picks a chart for the given result columns.
pub fn select_chart_for_columns(columns: &[&str]) -> Option<ChartSpec> {
    CHART_RULES
        .iter()
        .find(|rule| rule.matches(columns))
        .map(|rule| rule.to_spec())
}

/// Picks a chart for a query result, or `None` for table-only display.
pub fn select_chart(result: &QueryResult) -> Option<ChartSpec> {
    select_chart_for_columns(&result.column_names())
}
