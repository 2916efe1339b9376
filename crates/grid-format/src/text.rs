//! Friendly (human-readable) rendering.

use rust_decimal::RoundingStrategy;

use grid_model::{Amount, DEFAULT_DATE_TIME_FORMAT, FieldMetadata, Value};

use crate::datetime::{DATE_ONLY_FORMAT, LocalClock, adjust_clock, format_date_time};
use crate::error::FormattingFault;

/// Renders `value` as text using labels and patterns instead of raw values.
pub fn friendly_text(
    value: &Value,
    metadata: Option<&FieldMetadata>,
    pattern: Option<&str>,
    local: Option<LocalClock>,
) -> Result<String, FormattingFault> {
    let text = match value {
        Value::Text(text) => text.clone(),
        Value::Integer(number) => number.to_string(),
        Value::Decimal(number) => number.to_string(),
        Value::Double(number) => number.to_string(),
        Value::Boolean(flag) => {
            let code = i32::from(*flag);
            match metadata.and_then(|m| m.option_label(code)) {
                Some(label) => label.to_string(),
                None if *flag => "Yes".to_string(),
                None => "No".to_string(),
            }
        }
        Value::DateTime(stamp) => {
            let at = adjust_clock(stamp, local);
            let pattern = pattern.unwrap_or_else(|| {
                if metadata.is_some_and(|m| m.date_only) {
                    DATE_ONLY_FORMAT
                } else {
                    DEFAULT_DATE_TIME_FORMAT
                }
            });
            format_date_time(at, pattern)?
        }
        Value::Identifier(id) => id.to_string(),
        Value::Reference(reference) => reference.display_text(),
        Value::Choice(choice) => metadata
            .and_then(|m| m.option_label(choice.code))
            .map(str::to_string)
            .or_else(|| choice.label.clone())
            .unwrap_or_else(|| choice.code.to_string()),
        Value::Amount(amount) => format_amount(amount),
        Value::Aliased(aliased) => friendly_text(&aliased.value, metadata, pattern, local)?,
    };
    Ok(text)
}

/// Two decimals, grouped thousands, currency marker as prefix.
pub fn format_amount(amount: &Amount) -> String {
    let mut value = amount
        .value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(2);
    let text = value.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    let marker = amount.currency.as_deref().unwrap_or_default();
    format!("{sign}{marker}{}.{fraction}", group_thousands(whole))
}

/// Inserts `,` every three digits from the right.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
