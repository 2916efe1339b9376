use thiserror::Error;

/// Why a layout description could not be read or written.
///
/// Parse faults are never surfaced to grid callers; [`crate::parse_layout`]
/// turns them into "no layout".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("malformed layout xml: {0}")]
    Malformed(String),
    #[error("layout has no row element")]
    MissingRow,
    #[error("unexpected element <{0}> in layout")]
    UnexpectedElement(String),
    #[error("layout cell is missing its '{0}' attribute")]
    MissingAttribute(&'static str),
    #[error("invalid width '{0}' in layout cell")]
    InvalidWidth(String),
    #[error("failed to write layout xml: {0}")]
    Write(String),
}

impl LayoutError {
    pub(crate) fn malformed(source: impl std::fmt::Display) -> Self {
        Self::Malformed(source.to_string())
    }

    pub(crate) fn write(source: impl std::fmt::Display) -> Self {
        Self::Write(source.to_string())
    }
}
