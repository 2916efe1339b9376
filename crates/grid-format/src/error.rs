use thiserror::Error;

/// A single cell could not be rendered.
///
/// Faults are recovered per cell by the materializer and never abort a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormattingFault {
    #[error("invalid date-time format pattern '{pattern}'")]
    InvalidPattern { pattern: String },
    #[error("date-time pattern '{pattern}' cannot render {value}")]
    Unrenderable { pattern: String, value: String },
}
