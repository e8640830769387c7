//! Keyword fallback rules.
//!
//! Rules are evaluated top to bottom against the lower-cased question and the
//! first rule whose triggers are all present wins. The order is significant:
//! "discount" + "profit" must be checked before "profit margin", and the
//! region/category rules before the bare "total sales" metric.

/// A single fallback rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackRule {
    /// Short name used in logs.
    pub name: &'static str,
    /// Lower-case substrings that must all appear in the question.
    pub triggers: &'static [&'static str],
    /// SQL template run when the rule matches.
    pub sql: &'static str,
}

impl FallbackRule {
    /// Returns true if every trigger occurs in the already lower-cased text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().all(|trigger| lowered.contains(trigger))
    }
}

/// The rule table, in priority order.
pub const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        name: "top_customers",
        triggers: &["top 10 customers"],
        sql: r#"SELECT "Customer Name", SUM(Sales) AS Total_Sales FROM superstore GROUP BY "Customer Name" ORDER BY Total_Sales DESC LIMIT 10;"#,
    },
    FallbackRule {
        name: "top_products",
        triggers: &["top 10 products"],
        sql: r#"SELECT "Product Name", SUM(Sales) AS Total_Sales FROM superstore GROUP BY "Product Name" ORDER BY Total_Sales DESC LIMIT 10;"#,
    },
    FallbackRule {
        name: "top_states",
        triggers: &["top 10 states"],
        sql: "SELECT State, SUM(Sales) AS Total_Sales FROM superstore GROUP BY State ORDER BY Total_Sales DESC LIMIT 10;",
    },
    FallbackRule {
        name: "top_cities",
        triggers: &["top 10 cities"],
        sql: "SELECT City, SUM(Sales) AS Total_Sales FROM superstore GROUP BY City ORDER BY Total_Sales DESC LIMIT 10;",
    },
    FallbackRule {
        name: "discount_profit",
        triggers: &["discount", "profit"],
        sql: "SELECT Discount, AVG(Profit) AS Avg_Profit FROM superstore GROUP BY Discount ORDER BY Discount;",
    },
    FallbackRule {
        name: "profit_margin",
        triggers: &["profit margin"],
        sql: "SELECT Category, SUM(Profit) / SUM(Sales) AS Profit_Margin FROM superstore GROUP BY Category ORDER BY Profit_Margin DESC;",
    },
    FallbackRule {
        name: "yearly_sales",
        triggers: &["yearly sales"],
        sql: r#"SELECT strftime('%Y', "Order Date") AS Year, SUM(Sales) AS Total_Sales FROM superstore GROUP BY Year ORDER BY Year;"#,
    },
    FallbackRule {
        name: "monthly_sales",
        triggers: &["monthly sales"],
        sql: r#"SELECT strftime('%Y-%m', "Order Date") AS Month, SUM(Sales) AS Total_Sales FROM superstore GROUP BY Month ORDER BY Month;"#,
    },
    FallbackRule {
        name: "region_sales",
        triggers: &["sales", "region"],
        sql: "SELECT Region, SUM(Sales) AS Total_Sales, SUM(Profit) AS Total_Profit FROM superstore GROUP BY Region;",
    },
    FallbackRule {
        name: "sub_category",
        triggers: &["sub-category"],
        sql: r#"SELECT "Sub-Category", SUM(Sales) AS Total_Sales, SUM(Profit) AS Total_Profit FROM superstore GROUP BY "Sub-Category" ORDER BY Total_Profit;"#,
    },
    FallbackRule {
        name: "category",
        triggers: &["category"],
        sql: "SELECT Category, SUM(Sales) AS Total_Sales, SUM(Profit) AS Total_Profit FROM superstore GROUP BY Category ORDER BY Total_Sales DESC;",
    },
    FallbackRule {
        name: "segment",
        triggers: &["segment"],
        sql: "SELECT Segment, SUM(Sales) AS Total_Sales FROM superstore GROUP BY Segment ORDER BY Total_Sales DESC;",
    },
    FallbackRule {
        name: "ship_mode",
        triggers: &["ship mode"],
        sql: r#"SELECT "Ship Mode", COUNT(DISTINCT "Order ID") AS Order_Count FROM superstore GROUP BY "Ship Mode" ORDER BY Order_Count DESC;"#,
    },
    FallbackRule {
        name: "loss_products",
        triggers: &["loss"],
        sql: r#"SELECT "Product Name", SUM(Profit) AS Total_Profit FROM superstore GROUP BY "Product Name" HAVING SUM(Profit) < 0 ORDER BY Total_Profit ASC LIMIT 10;"#,
    },
    FallbackRule {
        name: "average_order_value",
        triggers: &["average order value"],
        sql: r#"SELECT SUM(Sales) / COUNT(DISTINCT "Order ID") AS Avg_Order_Value FROM superstore;"#,
    },
    FallbackRule {
        name: "order_count",
        triggers: &["how many orders"],
        sql: r#"SELECT COUNT(DISTINCT "Order ID") AS Order_Count FROM superstore;"#,
    },
    FallbackRule {
        name: "total_sales",
        triggers: &["total sales"],
        sql: "SELECT SUM(Sales) AS Total_Sales FROM superstore;",
    },
];

/// Returns the first rule matching the question, if any.
pub fn match_fallback(question: &str) -> Option<&'static FallbackRule> {
    let lowered = question.to_lowercase();
    FALLBACK_RULES.iter().find(|rule| rule.matches(&lowered))
}
