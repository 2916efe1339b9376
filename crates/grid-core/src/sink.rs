//! The visual grid as seen by the pipeline.

use std::any::Any;
use std::sync::Arc;

use grid_format::format_date_time;
use grid_model::{Cell, ColumnDefinition, Row, SEQUENCE_COLUMN, ViewColumn};

/// Receives materialized tables and exposes its column state for layout reconciliation.
///
/// Rows are handed over by value; a sink must not rely on them outliving the next refresh.
pub trait GridSink {
    fn set_columns(&mut self, columns: &[ColumnDefinition]);

    fn set_rows(&mut self, rows: Vec<Row>);

    fn columns(&self) -> &[ViewColumn];

    fn columns_mut(&mut self) -> &mut Vec<ViewColumn>;

    /// Binds a payload the pipeline does not understand, untouched.
    fn bind_opaque(&mut self, payload: Arc<dyn Any + Send + Sync>);

    fn clear(&mut self);
}

/// In-memory sink, used by the command line front end and tests.
#[derive(Default)]
pub struct MemorySink {
    columns: Vec<ViewColumn>,
    rows: Vec<Row>,
    opaque: Option<Arc<dyn Any + Send + Sync>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn opaque(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.opaque.as_ref()
    }

    /// Visible columns in display order.
    pub fn visible_columns(&self) -> Vec<&ViewColumn> {
        let mut visible: Vec<&ViewColumn> = self.columns.iter().filter(|c| c.visible).collect();
        visible.sort_by_key(|c| c.display_index);
        visible
    }

    /// One-based row number shown in the sequence column.
    pub fn sequence_number(index: usize) -> usize {
        index + 1
    }

    /// Text of every visible cell, row by row, with nulls as empty strings.
    ///
    /// Date-time cells use the column's format when it has one.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        let visible = self.visible_columns();
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                visible
                    .iter()
                    .map(|column| {
                        if column.name == SEQUENCE_COLUMN {
                            Self::sequence_number(index).to_string()
                        } else {
                            cell_text(row.get(&column.name), column)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        self.rows.get(row).map(|r| r.get(column))
    }
}

fn cell_text(cell: &Cell, column: &ViewColumn) -> String {
    match (cell, column.format.as_deref()) {
        (Cell::DateTime(at), Some(pattern)) => format_date_time(*at, pattern)
            .unwrap_or_else(|_| cell.to_text().unwrap_or_default()),
        _ => cell.to_text().unwrap_or_default(),
    }
}

impl GridSink for MemorySink {
    fn set_columns(&mut self, columns: &[ColumnDefinition]) {
        self.opaque = None;
        self.columns = columns
            .iter()
            .enumerate()
            .map(|(index, definition)| ViewColumn::from_definition(definition, index))
            .collect();
    }

    fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    fn columns(&self) -> &[ViewColumn] {
        &self.columns
    }

    fn columns_mut(&mut self) -> &mut Vec<ViewColumn> {
        &mut self.columns
    }

    fn bind_opaque(&mut self, payload: Arc<dyn Any + Send + Sync>) {
        self.columns.clear();
        self.rows.clear();
        self.opaque = Some(payload);
    }

    fn clear(&mut self) {
        self.columns.clear();
        self.rows.clear();
        self.opaque = None;
    }
}
