//! Field and type metadata, and the read-only lookup service that supplies them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Schema kind of a field as reported by the metadata provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
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
    Other,
}

/// Descriptive schema information about one field of one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Record type that owns the field.
    pub entity: String,
    pub logical_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub is_primary_id: bool,
    /// Date-time fields that only carry a calendar date.
    #[serde(default)]
    pub date_only: bool,
    /// Localized labels for choice codes (and `1`/`0` for booleans).
    #[serde(default)]
    pub options: BTreeMap<i32, String>,
}

impl FieldMetadata {
    pub fn new(
        entity: impl Into<String>,
        logical_name: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        Self {
            entity: entity.into(),
            logical_name: logical_name.into(),
            display_name: None,
            kind,
            is_primary_id: false,
            date_only: false,
            options: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn primary_id(mut self) -> Self {
        self.is_primary_id = true;
        self
    }

    #[must_use]
    pub fn date_only(mut self) -> Self {
        self.date_only = true;
        self
    }

    #[must_use]
    pub fn with_option(mut self, code: i32, label: impl Into<String>) -> Self {
        self.options.insert(code, label.into());
        self
    }

    pub fn option_label(&self, code: i32) -> Option<&str> {
        self.options.get(&code).map(String::as_str)
    }
}

/// Descriptive schema information about one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMetadata {
    pub logical_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub primary_id_attribute: Option<String>,
    #[serde(default)]
    pub primary_name_attribute: Option<String>,
}

impl TypeMetadata {
    pub fn new(logical_name: impl Into<String>) -> Self {
        Self {
            logical_name: logical_name.into(),
            display_name: None,
            primary_id_attribute: None,
            primary_name_attribute: None,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn with_primary_id(mut self, attribute: impl Into<String>) -> Self {
        self.primary_id_attribute = Some(attribute.into());
        self
    }
}

/// Read-only metadata lookup.
///
/// Implementations must be side-effect free; every method may return `None`.
/// `sample` is a value observed for the field, which lets aliased fields be
/// resolved against their origin type.
pub trait MetadataProvider {
    fn field_meta(&self, type_name: &str, field: &str, sample: Option<&Value>)
    -> Option<FieldMetadata>;

    fn type_meta(&self, type_name: &str) -> Option<TypeMetadata>;
}

/// Provider that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataProvider for NoMetadata {
    fn field_meta(&self, _: &str, _: &str, _: Option<&Value>) -> Option<FieldMetadata> {
        None
    }

    fn type_meta(&self, _: &str) -> Option<TypeMetadata> {
        None
    }
}

/// In-memory metadata catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "MetadataDocument", into = "MetadataDocument")]
pub struct StaticMetadata {
    types: BTreeMap<String, TypeMetadata>,
    fields: BTreeMap<(String, String), FieldMetadata>,
}

/// Flat wire shape of [`StaticMetadata`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MetadataDocument {
    #[serde(default)]
    types: Vec<TypeMetadata>,
    #[serde(default)]
    fields: Vec<FieldMetadata>,
}

impl From<MetadataDocument> for StaticMetadata {
    fn from(document: MetadataDocument) -> Self {
        let mut catalog = StaticMetadata::new();
        for ty in document.types {
            catalog.add_type(ty);
        }
        for field in document.fields {
            catalog.add_field(field);
        }
        catalog
    }
}

impl From<StaticMetadata> for MetadataDocument {
    fn from(catalog: StaticMetadata) -> Self {
        MetadataDocument {
            types: catalog.types.into_values().collect(),
            fields: catalog.fields.into_values().collect(),
        }
    }
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, ty: TypeMetadata) {
        self.types.insert(ty.logical_name.clone(), ty);
    }

    pub fn add_field(&mut self, field: FieldMetadata) {
        self.fields
            .insert((field.entity.clone(), field.logical_name.clone()), field);
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeMetadata) -> Self {
        self.add_type(ty);
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldMetadata) -> Self {
        self.add_field(field);
        self
    }
}

impl MetadataProvider for StaticMetadata {
    fn field_meta(
        &self,
        type_name: &str,
        field: &str,
        sample: Option<&Value>,
    ) -> Option<FieldMetadata> {
        // Aliased values know where they came from; plain ones belong to the record type.
        let key = match sample {
            Some(Value::Aliased(aliased)) => (aliased.entity.clone(), aliased.attribute.clone()),
            _ => (type_name.to_string(), field.to_string()),
        };
        let mut meta = self.fields.get(&key).cloned()?;
        if !meta.is_primary_id
            && let Some(ty) = self.types.get(&key.0)
            && ty.primary_id_attribute.as_deref() == Some(key.1.as_str())
        {
            meta.is_primary_id = true;
        }
        Some(meta)
    }

    fn type_meta(&self, type_name: &str) -> Option<TypeMetadata> {
        self.types.get(type_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Aliased;

    fn catalog() -> StaticMetadata {
        StaticMetadata::new()
            .with_type(TypeMetadata::new("account").with_primary_id("accountid"))
            .with_field(FieldMetadata::new("account", "accountid", FieldKind::Identifier))
            .with_field(
                FieldMetadata::new("account", "name", FieldKind::Text)
                    .with_display_name("Account Name"),
            )
            .with_field(
                FieldMetadata::new("contact", "fullname", FieldKind::Text)
                    .with_display_name("Full Name"),
            )
    }

    #[test]
    fn primary_id_is_inferred_from_type() {
        let meta = catalog().field_meta("account", "accountid", None).unwrap();
        assert!(meta.is_primary_id);
    }

    #[test]
    fn aliased_sample_redirects_lookup() {
        let sample = Value::Aliased(Aliased::new("contact", "fullname", Value::text("Ann")));
        let meta = catalog()
            .field_meta("account", "c.fullname", Some(&sample))
            .unwrap();
        assert_eq!(meta.entity, "contact");
        assert_eq!(meta.display_name.as_deref(), Some("Full Name"));
    }

    #[test]
    fn document_round_trip() {
        let json = serde_json::to_string(&catalog()).unwrap();
        let parsed: StaticMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.type_meta("account"),
            catalog().type_meta("account")
        );
        assert!(parsed.field_meta("account", "name", None).is_some());
    }
}
