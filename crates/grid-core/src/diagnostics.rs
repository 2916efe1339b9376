use std::fmt;

use uuid::Uuid;

/// A recoverable problem surfaced to the host without aborting the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub record_id: Option<Uuid>,
    pub column: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            record_id: None,
            column: None,
            message: message.into(),
        }
    }

    pub fn for_cell(
        record_id: Uuid,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            record_id: Some(record_id),
            column: Some(column.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.record_id, &self.column) {
            (Some(id), Some(column)) => write!(f, "{id}/{column}: {}", self.message),
            (None, Some(column)) => write!(f, "{column}: {}", self.message),
            _ => f.write_str(&self.message),
        }
    }
}
