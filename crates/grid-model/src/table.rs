use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::column::{ColumnDefinition, RECORD_COLUMN};
use crate::record::Record;

/// Default pattern used when a date-time cell is turned into text.
pub const DEFAULT_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One materialized cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Double(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Identifier(Uuid),
    Record(Arc<Record>),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Text form used for display and filtering; `None` for nulls and record handles.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Null | Cell::Record(_) => None,
            Cell::Text(text) => Some(text.clone()),
            Cell::Integer(value) => Some(value.to_string()),
            Cell::Decimal(value) => Some(value.to_string()),
            Cell::Double(value) => Some(value.to_string()),
            Cell::Boolean(value) => Some(value.to_string()),
            Cell::DateTime(value) => Some(value.format(DEFAULT_DATE_TIME_FORMAT).to_string()),
            Cell::Identifier(id) => Some(id.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: BTreeMap<String, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, cell: Cell) {
        self.cells.insert(column.into(), cell);
    }

    /// Cell for `column`; missing entries read as null.
    pub fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&Cell::Null)
    }

    /// The originating record, when the row carries one.
    pub fn record(&self) -> Option<&Arc<Record>> {
        match self.cells.get(RECORD_COLUMN) {
            Some(Cell::Record(record)) => Some(record),
            _ => None,
        }
    }
}

/// Result of one refresh: column definitions plus rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterializedTable {
    pub entity_name: Option<String>,
    pub columns: Vec<ColumnDefinition>,
    pub rows: Vec<Row>,
}

impl MaterializedTable {
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells_read_as_null() {
        let row = Row::new();
        assert!(row.get("email").is_null());
        assert!(row.record().is_none());
    }

    #[test]
    fn null_and_record_have_no_text() {
        let record = Arc::new(Record::new("contact", Uuid::nil()).unwrap());
        assert_eq!(Cell::Null.to_text(), None);
        assert_eq!(Cell::Record(record).to_text(), None);
        assert_eq!(Cell::Integer(3).to_string(), "3");
    }
}
