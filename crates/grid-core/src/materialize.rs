//! Row materialization and text filtering.

use tracing::{debug, warn};

use grid_format::{FormatOptions, fallback_cell, format_value};
use grid_model::{
    Cell, ColumnDefinition, ID_COLUMN, RECORD_COLUMN, Record, RecordCollection, Row,
    SEQUENCE_COLUMN,
};

use crate::diagnostics::Diagnostic;
use crate::options::GridOptions;

/// Builds one row per record that passes the text filter.
///
/// Formatting faults never abort the pass: the cell falls back to the value's
/// plain text and the fault goes to `report`.
pub fn materialize(
    collection: &RecordCollection,
    columns: &[ColumnDefinition],
    options: &GridOptions,
    report: &mut dyn FnMut(Diagnostic),
) -> Vec<Row> {
    let filter = TextFilter::new(&options.filter_text, &options.filter_columns);
    let rows: Vec<Row> = collection
        .records()
        .iter()
        .map(|record| {
            let mut row = Row::new();
            for column in columns {
                if let Some(cell) = build_cell(record, column, options, report) {
                    row.insert(column.name.clone(), cell);
                }
            }
            row
        })
        .filter(|row| filter.matches(row, columns))
        .collect();
    debug!(records = collection.len(), rows = rows.len(), "materialized rows");
    rows
}

fn build_cell(
    record: &std::sync::Arc<Record>,
    column: &ColumnDefinition,
    options: &GridOptions,
    report: &mut dyn FnMut(Diagnostic),
) -> Option<Cell> {
    match column.name.as_str() {
        // numbered by the sink
        SEQUENCE_COLUMN => None,
        ID_COLUMN => Some(Cell::Identifier(record.id())),
        RECORD_COLUMN => Some(Cell::Record(record.clone())),
        name => {
            let value = record.get(name);
            let format = FormatOptions {
                metadata: column.metadata.as_ref(),
                pattern: column.format.as_deref(),
                friendly: options.show_friendly_names,
                local_clock: options.local_clock(),
            };
            let cell = format_value(value, &format).unwrap_or_else(|fault| {
                warn!(record_id = %record.id(), column = name, %fault, "formatting fault");
                report(Diagnostic::for_cell(record.id(), name, fault.to_string()));
                fallback_cell(value)
            });
            Some(cell)
        }
    }
}

/// Case-insensitive substring filter over a set of columns.
pub struct TextFilter<'a> {
    needle: String,
    columns: &'a [String],
}

impl<'a> TextFilter<'a> {
    pub fn new(text: &str, columns: &'a [String]) -> Self {
        Self {
            needle: text.to_lowercase(),
            columns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Whether any filtered column of `row` contains the filter text.
    pub fn matches(&self, row: &Row, columns: &[ColumnDefinition]) -> bool {
        if self.is_empty() {
            return true;
        }
        let contains = |name: &str| {
            row.get(name)
                .to_text()
                .is_some_and(|text| text.to_lowercase().contains(&self.needle))
        };
        if self.columns.is_empty() {
            columns.iter().any(|column| contains(&column.name))
        } else {
            self.columns.iter().any(|name| contains(name))
        }
    }
}
