//! Column definitions produced by the resolver and the sink-side column state.

use serde::{Deserialize, Serialize};

use crate::metadata::FieldMetadata;

/// Row sequence column, numbered by the sink.
pub const SEQUENCE_COLUMN: &str = "#no";
/// Record identifier column.
pub const ID_COLUMN: &str = "#id";
/// Hidden column holding the originating record.
pub const RECORD_COLUMN: &str = "#entity";

/// True for the names reserved for synthetic columns.
pub fn is_synthetic(name: &str) -> bool {
    matches!(name, SEQUENCE_COLUMN | ID_COLUMN | RECORD_COLUMN)
}

/// Type a column presents to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayType {
    Text,
    Integer,
    Decimal,
    Double,
    Boolean,
    DateTime,
    Identifier,
    Amount,
    /// Opaque record handle; never rendered.
    Record,
}

impl DisplayType {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            DisplayType::Integer | DisplayType::Decimal | DisplayType::Double | DisplayType::Amount
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Record field key, or one of the synthetic names.
    pub name: String,
    pub display_type: DisplayType,
    pub caption: String,
    /// chrono format pattern for date-time cells.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default, skip_serializing)]
    pub metadata: Option<FieldMetadata>,
    /// Present even when no record populates it.
    #[serde(default)]
    pub forced: bool,
    /// Type before friendly rendering coerced the column to text.
    #[serde(default)]
    pub original_type: Option<DisplayType>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, display_type: DisplayType) -> Self {
        let name = name.into();
        Self {
            caption: name.clone(),
            name,
            display_type,
            format: None,
            metadata: None,
            forced: false,
            original_type: None,
            alignment: Alignment::Left,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn is_synthetic(&self) -> bool {
        is_synthetic(&self.name)
    }

    /// Type whose semantics the column carries, regardless of text coercion.
    pub fn semantic_type(&self) -> DisplayType {
        self.original_type.unwrap_or(self.display_type)
    }
}

/// Column as exposed by the sink after binding; the layout reconciler mutates these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewColumn {
    pub name: String,
    pub caption: String,
    pub display_index: usize,
    /// Width in pixels; `None` leaves the sink default.
    pub width: Option<u32>,
    pub visible: bool,
    /// Date-time pattern carried over from the column definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Added by a layout for a column the data does not provide.
    pub placeholder: bool,
}

impl ViewColumn {
    pub fn from_definition(definition: &ColumnDefinition, display_index: usize) -> Self {
        Self {
            name: definition.name.clone(),
            caption: definition.caption.clone(),
            display_index,
            width: None,
            visible: definition.visible,
            format: definition.format.clone(),
            placeholder: false,
        }
    }

    pub fn placeholder(name: impl Into<String>, display_index: usize) -> Self {
        let name = name.into();
        Self {
            caption: name.clone(),
            name,
            display_index,
            width: None,
            visible: true,
            format: None,
            placeholder: true,
        }
    }
}
