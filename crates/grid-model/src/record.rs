//! Records and the shapes a record source can take.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ModelError, Result};
use crate::value::Value;

/// One schemaless key-value entity.
///
/// Attribute order is the order in which fields were inserted, which is
/// what column discovery uses as "first seen" order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    logical_name: String,
    id: Uuid,
    #[serde(default)]
    attributes: IndexMap<String, Value>,
}

impl Record {
    pub fn new(logical_name: impl Into<String>, id: Uuid) -> Result<Self> {
        let logical_name = logical_name.into();
        let trimmed = logical_name.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidLogicalName(logical_name));
        }
        Ok(Self {
            logical_name: trimmed.to_string(),
            id,
            attributes: IndexMap::new(),
        })
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(field.into(), value.into());
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// True when the record populates `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.attributes.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// A named collection of records, all expected to share one type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordCollection {
    entity_name: Option<String>,
    records: Vec<Arc<Record>>,
}

impl RecordCollection {
    pub fn new(entity_name: Option<String>, records: Vec<Record>) -> Self {
        Self {
            entity_name,
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_shared(entity_name: Option<String>, records: Vec<Arc<Record>>) -> Self {
        Self {
            entity_name,
            records,
        }
    }

    /// The collection's declared entity name, or the first record's type.
    pub fn entity_name(&self) -> Option<&str> {
        self.entity_name
            .as_deref()
            .or_else(|| self.records.first().map(|r| r.logical_name()))
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Checks that every record shares one type identity.
    ///
    /// Returns the records' type name, or the collection's name when it holds no
    /// records (`None` for an empty, unnamed collection).
    pub fn validate_single_type(&self) -> Result<Option<&str>> {
        let Some((first, rest)) = self.records.split_first() else {
            return Ok(self.entity_name.as_deref());
        };
        let expected = first.logical_name();
        if let Some(other) = rest.iter().find(|record| record.logical_name() != expected) {
            return Err(ModelError::MixedRecordTypes {
                expected: expected.to_string(),
                found: other.logical_name().to_string(),
            });
        }
        Ok(Some(expected))
    }
}

/// Everything a caller can hand to the grid as its data.
#[derive(Clone)]
pub enum DataSource {
    Collection(RecordCollection),
    Records(Vec<Record>),
    /// Unrecognized shape; bound straight to the sink without materialization.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl DataSource {
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        DataSource::Opaque(Arc::new(value))
    }

    /// Converts the record shapes into a collection; `Err` hands back opaque payloads.
    pub fn into_collection(
        self,
    ) -> std::result::Result<RecordCollection, Arc<dyn Any + Send + Sync>> {
        match self {
            DataSource::Collection(collection) => Ok(collection),
            DataSource::Records(records) => Ok(RecordCollection::new(None, records)),
            DataSource::Opaque(payload) => Err(payload),
        }
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Collection(collection) => f
                .debug_struct("Collection")
                .field("entity_name", &collection.entity_name())
                .field("records", &collection.len())
                .finish(),
            DataSource::Records(records) => {
                f.debug_tuple("Records").field(&records.len()).finish()
            }
            DataSource::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<RecordCollection> for DataSource {
    fn from(value: RecordCollection) -> Self {
        DataSource::Collection(value)
    }
}

impl From<Vec<Record>> for DataSource {
    fn from(value: Vec<Record>) -> Self {
        DataSource::Records(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str) -> Record {
        Record::new(kind, Uuid::nil()).unwrap()
    }

    #[test]
    fn blank_logical_name_is_rejected() {
        assert!(matches!(
            Record::new("  ", Uuid::nil()),
            Err(ModelError::InvalidLogicalName(_))
        ));
    }

    #[test]
    fn fields_keep_insertion_order() {
        let record = record("contact")
            .with("lastname", "Smith")
            .with("firstname", "Ann")
            .with("age", 41_i64);
        let fields: Vec<&str> = record.fields().collect();
        assert_eq!(fields, vec!["lastname", "firstname", "age"]);
    }

    #[test]
    fn mixed_types_fail_validation() {
        let collection = RecordCollection::new(None, vec![record("contact"), record("account")]);
        let err = collection.validate_single_type().unwrap_err();
        assert_eq!(
            err,
            ModelError::MixedRecordTypes {
                expected: "contact".to_string(),
                found: "account".to_string(),
            }
        );
    }

    #[test]
    fn collection_name_does_not_have_to_match_records() {
        let collection = RecordCollection::new(
            Some("contacts".to_string()),
            vec![record("contact"), record("contact")],
        );
        assert_eq!(collection.validate_single_type().unwrap(), Some("contact"));

        let empty = RecordCollection::new(Some("account".to_string()), vec![]);
        assert_eq!(empty.validate_single_type().unwrap(), Some("account"));
        assert_eq!(RecordCollection::new(None, vec![]).validate_single_type().unwrap(), None);
    }

    #[test]
    fn opaque_source_does_not_convert() {
        let source = DataSource::opaque(42_u32);
        assert!(source.into_collection().is_err());
    }
}
