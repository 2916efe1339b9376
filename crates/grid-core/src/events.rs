use std::sync::Arc;

use grid_model::{Record, Reference};

/// Pointer and focus interactions a sink reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Click,
    DoubleClick,
    Enter,
    Leave,
    MouseEnter,
    MouseLeave,
}

/// A cell in the bound table: row index and column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub column: String,
}

impl CellPosition {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }
}

/// An interaction translated back to the record it happened on.
///
/// `record` and `column` are `None` when the position was outside any cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEvent {
    pub kind: InteractionKind,
    pub record: Option<Arc<Record>>,
    pub column: Option<String>,
    /// Set when reference cells are clickable and the cell holds a reference.
    pub reference: Option<Reference>,
}
