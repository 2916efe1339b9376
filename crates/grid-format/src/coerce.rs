//! Display-type inference and alignment hints.

use grid_model::{Alignment, DisplayType, Value, ValueKind};

/// Type a value keeps in raw mode.
///
/// Integers, decimals, doubles, text, amounts and date-times keep their own
/// type. Aliased values are unwrapped first, references become their display
/// text and choices their integer code.
pub fn raw_type(value: &Value) -> DisplayType {
    match value.unaliased() {
        Value::Text(_) | Value::Reference(_) => DisplayType::Text,
        Value::Integer(_) | Value::Choice(_) => DisplayType::Integer,
        Value::Decimal(_) => DisplayType::Decimal,
        Value::Double(_) => DisplayType::Double,
        Value::Boolean(_) => DisplayType::Boolean,
        Value::DateTime(_) => DisplayType::DateTime,
        Value::Identifier(_) => DisplayType::Identifier,
        Value::Amount(_) => DisplayType::Amount,
        // unaliased() never yields a wrapper
        Value::Aliased(_) => DisplayType::Text,
    }
}

/// Type the sink should use for a column whose sample value is `value`.
pub fn display_type(value: &Value, friendly: bool) -> DisplayType {
    if friendly {
        DisplayType::Text
    } else {
        raw_type(value)
    }
}

/// Alignment hint for a column.
///
/// Numeric and currency columns are right-aligned. Choice columns are numeric
/// codes in raw mode, but labels in friendly mode, so they only right-align
/// when not friendly.
pub fn alignment(
    semantic_type: DisplayType,
    source: Option<ValueKind>,
    friendly: bool,
) -> Alignment {
    if friendly && source == Some(ValueKind::Choice) {
        return Alignment::Left;
    }
    if semantic_type.is_numeric() {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

#[cfg(test)]
mod tests {
    use grid_model::{Aliased, Amount, Choice, Reference};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn numbers_stay_numbers_in_raw_mode() {
        assert_eq!(display_type(&Value::Integer(5), false), DisplayType::Integer);
        assert_eq!(display_type(&Value::Double(0.5), false), DisplayType::Double);
        assert_eq!(
            display_type(
                &Value::Amount(Amount {
                    value: Decimal::ONE,
                    currency: None
                }),
                false
            ),
            DisplayType::Amount
        );
    }

    #[test]
    fn friendly_mode_is_text() {
        assert_eq!(display_type(&Value::Integer(5), true), DisplayType::Text);
    }

    #[test]
    fn composites_unwrap_in_raw_mode() {
        let reference = Value::Reference(Reference::new("account", Uuid::nil()));
        assert_eq!(raw_type(&reference), DisplayType::Text);
        assert_eq!(raw_type(&Value::Choice(Choice::new(1))), DisplayType::Integer);

        let aliased = Value::Aliased(Aliased::new("account", "revenue", Value::Double(1.0)));
        assert_eq!(raw_type(&aliased), DisplayType::Double);
    }

    #[test]
    fn choice_alignment_depends_on_mode() {
        assert_eq!(
            alignment(DisplayType::Integer, Some(ValueKind::Choice), false),
            Alignment::Right
        );
        assert_eq!(
            alignment(DisplayType::Integer, Some(ValueKind::Choice), true),
            Alignment::Left
        );
        assert_eq!(
            alignment(DisplayType::Text, Some(ValueKind::Text), false),
            Alignment::Left
        );
    }
}
