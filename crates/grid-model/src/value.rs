//! Field values carried by records.
//!
//! Records have no fixed schema, so a value is a closed set of variants:
//! plain primitives plus the composite shapes produced by the record source
//! (references, choices, amounts) and the aliased wrapper produced by
//! aggregate and joined queries.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Clock basis of a stored timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockBasis {
    /// Stored on the neutral universal clock.
    Utc,
    /// Already expressed on the caller's local clock.
    Local,
    /// No basis recorded; rendered as-is.
    #[default]
    Unspecified,
}

/// A timestamp together with the clock it was stored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeValue {
    pub at: NaiveDateTime,
    #[serde(default)]
    pub basis: ClockBasis,
}

impl DateTimeValue {
    pub fn utc(at: NaiveDateTime) -> Self {
        Self {
            at,
            basis: ClockBasis::Utc,
        }
    }

    pub fn local(at: NaiveDateTime) -> Self {
        Self {
            at,
            basis: ClockBasis::Local,
        }
    }

    /// True when the stored value carries sub-second precision.
    pub fn has_subsecond(&self) -> bool {
        self.at.nanosecond() != 0
    }
}

/// Pointer to another record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub logical_name: String,
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}

impl Reference {
    pub fn new(logical_name: impl Into<String>, id: Uuid) -> Self {
        Self {
            logical_name: logical_name.into(),
            id,
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display text: the name when known, otherwise the identifier.
    pub fn display_text(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }
}

/// Option-set value: an integer code with an optional label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub code: i32,
    #[serde(default)]
    pub label: Option<String>,
}

impl Choice {
    pub fn new(code: i32) -> Self {
        Self { code, label: None }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Monetary value with an optional currency marker (symbol or code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Value produced by an aggregate or joined query.
///
/// `entity` and `attribute` name the origin of the wrapped value, which is what
/// metadata lookups need to know the true type of the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aliased {
    pub entity: String,
    pub attribute: String,
    pub value: Box<Value>,
}

impl Aliased {
    pub fn new(entity: impl Into<String>, attribute: impl Into<String>, value: Value) -> Self {
        Self {
            entity: entity.into(),
            attribute: attribute.into(),
            value: Box::new(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Double(f64),
    Boolean(bool),
    DateTime(DateTimeValue),
    Identifier(Uuid),
    Reference(Reference),
    Choice(Choice),
    Amount(Amount),
    Aliased(Aliased),
}

/// Discriminant of a [`Value`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Integer,
    Decimal,
    Double,
    Boolean,
    DateTime,
    Identifier,
    Reference,
    Choice,
    Amount,
    Aliased,
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Integer(_) => ValueKind::Integer,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Double(_) => ValueKind::Double,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Identifier(_) => ValueKind::Identifier,
            Value::Reference(_) => ValueKind::Reference,
            Value::Choice(_) => ValueKind::Choice,
            Value::Amount(_) => ValueKind::Amount,
            Value::Aliased(_) => ValueKind::Aliased,
        }
    }

    /// Strips any number of aliased wrappers.
    pub fn unaliased(&self) -> &Value {
        let mut current = self;
        while let Value::Aliased(aliased) = current {
            current = &aliased.value;
        }
        current
    }

    pub fn is_aliased(&self) -> bool {
        matches!(self, Value::Aliased(_))
    }

    pub fn as_date_time(&self) -> Option<&DateTimeValue> {
        match self.unaliased() {
            Value::DateTime(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self.unaliased() {
            Value::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Decimal(value) => write!(f, "{value}"),
            Value::Double(value) => write!(f, "{value}"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::DateTime(value) => write!(f, "{}", value.at),
            Value::Identifier(id) => write!(f, "{id}"),
            Value::Reference(reference) => f.write_str(&reference.display_text()),
            Value::Choice(choice) => match &choice.label {
                Some(label) => f.write_str(label),
                None => write!(f, "{}", choice.code),
            },
            Value::Amount(amount) => match &amount.currency {
                Some(currency) => write!(f, "{currency}{}", amount.value),
                None => write!(f, "{}", amount.value),
            },
            Value::Aliased(aliased) => aliased.value.fmt(f),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Identifier(value)
    }
}

impl From<Reference> for Value {
    fn from(value: Reference) -> Self {
        Value::Reference(value)
    }
}

impl From<Choice> for Value {
    fn from(value: Choice) -> Self {
        Value::Choice(value)
    }
}

impl From<Amount> for Value {
    fn from(value: Amount) -> Self {
        Value::Amount(value)
    }
}

impl From<Aliased> for Value {
    fn from(value: Aliased) -> Self {
        Value::Aliased(value)
    }
}

impl From<DateTimeValue> for Value {
    fn from(value: DateTimeValue) -> Self {
        Value::DateTime(value)
    }
}
