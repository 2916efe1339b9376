use grid_model::{Cell, FieldMetadata, Value};

use crate::datetime::{LocalClock, adjust_clock};
use crate::error::FormattingFault;
use crate::text::friendly_text;

/// Per-column formatting inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions<'a> {
    pub metadata: Option<&'a FieldMetadata>,
    pub pattern: Option<&'a str>,
    pub friendly: bool,
    /// Clock to convert universal timestamps to; `None` renders them as stored.
    pub local_clock: Option<LocalClock>,
}

/// Formats one field value into a cell.
///
/// An absent value is [`Cell::Null`]. Friendly mode always yields text; raw mode
/// yields the unwrapped primitive so numbers stay sortable.
pub fn format_value(
    value: Option<&Value>,
    options: &FormatOptions<'_>,
) -> Result<Cell, FormattingFault> {
    let Some(value) = value else {
        return Ok(Cell::Null);
    };
    if options.friendly {
        friendly_text(value, options.metadata, options.pattern, options.local_clock).map(Cell::Text)
    } else {
        Ok(raw_cell(value, options.local_clock))
    }
}

pub fn raw_cell(value: &Value, local: Option<LocalClock>) -> Cell {
    match value {
        Value::Text(text) => Cell::Text(text.clone()),
        Value::Integer(number) => Cell::Integer(*number),
        Value::Decimal(number) => Cell::Decimal(*number),
        Value::Double(number) => Cell::Double(*number),
        Value::Boolean(flag) => Cell::Boolean(*flag),
        Value::DateTime(stamp) => Cell::DateTime(adjust_clock(stamp, local)),
        Value::Identifier(id) => Cell::Identifier(*id),
        Value::Reference(reference) => Cell::Text(reference.display_text()),
        Value::Choice(choice) => Cell::Integer(i64::from(choice.code)),
        Value::Amount(amount) => Cell::Decimal(amount.value),
        Value::Aliased(aliased) => raw_cell(&aliased.value, local),
    }
}

/// Best-effort cell for a value whose formatting faulted.
pub fn fallback_cell(value: Option<&Value>) -> Cell {
    value.map_or(Cell::Null, |v| Cell::Text(v.to_string()))
}
