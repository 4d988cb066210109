// 📊 Silver layer - tabular model + CSV writer

use crate::error::Result;
use std::fmt;
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

// ============================================================================
// CELL
// ============================================================================

/// One field of a silver table. `Null` is written as an empty field.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(v) => write!(f, "{}", v),
            // Debug keeps the decimal point: 2.0, 0.5, 0.0
            Cell::Float(v) => write!(f, "{:?}", v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Null)
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// TableRow - a typed row that knows its column layout
pub trait TableRow {
    const COLUMNS: &'static [&'static str];

    /// Cells in `COLUMNS` order
    fn cells(&self) -> Vec<Cell>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: &[&str]) -> Self {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows<R: TableRow>(rows: &[R]) -> Self {
        let mut table = Table::new(R::COLUMNS);
        table.rows = rows.iter().map(R::cells).collect();
        table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Write `table` as comma-separated text with a header row.
///
/// The header is always written, even for an empty table. Fields holding a
/// comma, a quote or a newline are quoted. Returns the number of data rows.
pub fn write_table(path: &Path, table: &Table) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(File::create(path)?);

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = table.len(), "table written");
    Ok(table.len())
}
