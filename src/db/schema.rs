//! The fixed Superstore schema.
//!
//! Column names are reproduced exactly as they appear in the CSV export; the
//! fallback SQL templates and chart rules depend on them.

/// Name of the in-memory table.
pub const TABLE_NAME: &str = "superstore";

/// SQLite storage class used for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
    /// ISO `YYYY-MM-DD` text, so SQLite date functions apply.
    Date,
}

impl ColumnKind {
    /// Returns the SQLite type used in the table definition.
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text | Self::Date => "TEXT",
        }
    }
}

/// A column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetColumn {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

const fn column(name: &'static str, kind: ColumnKind) -> DatasetColumn {
    DatasetColumn {
        name,
        kind,
        nullable: false,
    }
}

/// All columns, in CSV order.
pub const COLUMNS: [DatasetColumn; 21] = [
    column("Row ID", ColumnKind::Integer),
    column("Order ID", ColumnKind::Text),
    column("Order Date", ColumnKind::Date),
    column("Ship Date", ColumnKind::Date),
    column("Ship Mode", ColumnKind::Text),
    column("Customer ID", ColumnKind::Text),
    column("Customer Name", ColumnKind::Text),
    column("Segment", ColumnKind::Text),
    column("Country", ColumnKind::Text),
    column("City", ColumnKind::Text),
    column("State", ColumnKind::Text),
    DatasetColumn {
        name: "Postal Code",
        kind: ColumnKind::Text,
        nullable: true,
    },
    column("Region", ColumnKind::Text),
    column("Product ID", ColumnKind::Text),
    column("Category", ColumnKind::Text),
    column("Sub-Category", ColumnKind::Text),
    column("Product Name", ColumnKind::Text),
    column("Sales", ColumnKind::Real),
    column("Quantity", ColumnKind::Integer),
    column("Discount", ColumnKind::Real),
    column("Profit", ColumnKind::Real),
];

/// Quotes an identifier for SQLite.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Comma-separated column names, unquoted, as shown to the model.
pub fn column_list() -> String {
    COLUMNS
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `CREATE TABLE` statement for the dataset.
pub fn create_table_sql() -> String {
    let columns = COLUMNS
        .iter()
        .map(|c| {
            let null = if c.nullable { "" } else { " NOT NULL" };
            format!("  {} {}{}", quote_ident(c.name), c.kind.sql_type(), null)
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!("CREATE TABLE {} (\n{}\n)", TABLE_NAME, columns)
}

/// Parameterized `INSERT` statement covering every column.
pub fn insert_sql() -> String {
    let names = COLUMNS
        .iter()
        .map(|c| quote_ident(c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; COLUMNS.len()].join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        TABLE_NAME, names, placeholders
    )
}
