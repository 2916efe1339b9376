//! Column resolution.
//!
//! Decides which columns a refresh materializes, in what order, and with which
//! display type, caption and format. Three inputs are merged: columns the caller
//! declared up front, an explicit ordering hint, and the field keys observed in
//! the records themselves.

use indexmap::IndexSet;
use tracing::debug;

use grid_format::{MILLISECOND_FORMAT, alignment, display_type, raw_type};
use grid_layout::Layout;
use grid_model::{
    Alignment, ColumnDefinition, DisplayType, FieldKind, FieldMetadata, ID_COLUMN,
    MetadataProvider, RECORD_COLUMN, RecordCollection, SEQUENCE_COLUMN, Value, is_synthetic,
};

use crate::error::Result;
use crate::options::GridOptions;

pub struct ColumnResolver<'a> {
    options: &'a GridOptions,
    metadata: &'a dyn MetadataProvider,
    declared: &'a [ColumnDefinition],
    layout: Option<&'a Layout>,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(options: &'a GridOptions, metadata: &'a dyn MetadataProvider) -> Self {
        Self {
            options,
            metadata,
            declared: &[],
            layout: None,
        }
    }

    /// Columns the caller fixed up front.
    #[must_use]
    pub fn with_declared(mut self, declared: &'a [ColumnDefinition]) -> Self {
        self.declared = declared;
        self
    }

    /// A layout overrides declared columns and, absent an explicit order, orders the fields.
    #[must_use]
    pub fn with_layout(mut self, layout: Option<&'a Layout>) -> Self {
        self.layout = layout;
        self
    }

    /// Resolves the column set for `collection`.
    ///
    /// Fails before any other work when the records do not share one type.
    pub fn resolve(&self, collection: &RecordCollection) -> Result<Vec<ColumnDefinition>> {
        let entity = collection.validate_single_type()?.unwrap_or_default();

        let columns = if !self.declared.is_empty() && self.layout.is_none() {
            self.resolve_declared(entity, collection)
        } else {
            self.discover(entity, collection)
        };
        debug!(entity, columns = columns.len(), "resolved columns");
        Ok(columns)
    }

    fn resolve_declared(
        &self,
        entity: &str,
        collection: &RecordCollection,
    ) -> Vec<ColumnDefinition> {
        let mut columns: Vec<ColumnDefinition> = self
            .declared
            .iter()
            .map(|declared| {
                let mut column = declared.clone();
                if column.is_synthetic() {
                    return column;
                }
                let sample = first_value(collection, &column.name);
                let meta = self.metadata.field_meta(entity, &column.name, sample);
                if self.options.show_friendly_names {
                    if let Some(label) = meta.as_ref().and_then(|m| m.display_name.clone()) {
                        column.caption = label;
                    }
                    if column.display_type != DisplayType::Text {
                        column.original_type = Some(column.display_type);
                        column.display_type = DisplayType::Text;
                    }
                }
                if column.format.is_none() {
                    column.format = precision_format(meta.as_ref(), collection, &column.name);
                }
                column.alignment = alignment(
                    column.semantic_type(),
                    sample.map(|v| v.unaliased().kind()),
                    self.options.show_friendly_names,
                );
                column.metadata = meta;
                column
            })
            .collect();

        // Interaction events recover the originating record through this column.
        if !columns.iter().any(|c| c.name == RECORD_COLUMN) {
            columns.push(record_column());
        }
        columns
    }

    fn discover(&self, entity: &str, collection: &RecordCollection) -> Vec<ColumnDefinition> {
        let ordering = self.ordering();
        let mut candidates: IndexSet<&str> = ordering
            .iter()
            .map(String::as_str)
            .filter(|name| !is_synthetic(name))
            .collect();
        if self.options.show_unordered_columns || ordering.is_empty() {
            for record in collection.records() {
                candidates.extend(record.fields().filter(|name| !is_synthetic(name)));
            }
        }

        let mut sequence = ColumnDefinition::new(SEQUENCE_COLUMN, DisplayType::Integer);
        sequence.alignment = Alignment::Right;
        sequence.visible = self.options.show_index_column;
        let mut id = ColumnDefinition::new(ID_COLUMN, DisplayType::Identifier);
        id.visible = self.options.show_id_column;

        let mut columns = vec![sequence, id];
        for name in candidates {
            let ordered = ordering.iter().any(|o| o == name);
            if let Some(column) = self.resolve_field(entity, collection, name, ordered) {
                columns.push(column);
            }
        }
        columns.push(record_column());
        columns
    }

    fn ordering(&self) -> Vec<String> {
        if !self.options.column_order.is_empty() {
            return self.options.column_order.clone();
        }
        self.layout.map(Layout::field_names).unwrap_or_default()
    }

    fn resolve_field(
        &self,
        entity: &str,
        collection: &RecordCollection,
        name: &str,
        ordered: bool,
    ) -> Option<ColumnDefinition> {
        let sample = first_value(collection, name);
        let populated = sample.is_some();
        let forced = ordered && (self.options.show_all_ordered_columns || populated);
        if !forced && !populated {
            debug!(column = name, "dropping unpopulated field");
            return None;
        }

        let meta = self.metadata.field_meta(entity, name, sample);
        if let Some(field) = &meta
            && field.is_primary_id
        {
            let keep_forced = forced && !self.options.show_id_column;
            let aliased = sample.is_some_and(Value::is_aliased);
            if !keep_forced && !aliased {
                debug!(column = name, "suppressing primary identifier field");
                return None;
            }
        }

        let friendly = self.options.show_friendly_names;
        let (shown, semantic) = match sample {
            Some(value) => (display_type(value, friendly), raw_type(value)),
            None => {
                let semantic = meta.as_ref().map_or(DisplayType::Text, |m| kind_type(m.kind));
                let shown = if friendly { DisplayType::Text } else { semantic };
                (shown, semantic)
            }
        };

        let mut column =
            ColumnDefinition::new(name, shown).with_caption(self.caption(name, meta.as_ref()));
        if shown != semantic {
            column.original_type = Some(semantic);
        }
        column.forced = forced;
        column.format = precision_format(meta.as_ref(), collection, name);
        column.alignment = alignment(semantic, sample.map(|v| v.unaliased().kind()), friendly);
        column.metadata = meta;
        Some(column)
    }

    /// Friendly label, qualified by the joined entity for related (`a.b`) fields.
    fn caption(&self, name: &str, meta: Option<&FieldMetadata>) -> String {
        if !self.options.show_friendly_names {
            return name.to_string();
        }
        let Some(meta) = meta else {
            return name.to_string();
        };
        let Some(label) = meta.display_name.clone() else {
            return name.to_string();
        };
        let Some((segment, _)) = name.split_once('.') else {
            return label;
        };
        match self
            .metadata
            .type_meta(&meta.entity)
            .and_then(|ty| ty.display_name)
        {
            Some(joined) => format!("{label} ({joined})"),
            None => format!("{segment} {label}"),
        }
    }
}

fn record_column() -> ColumnDefinition {
    ColumnDefinition::new(RECORD_COLUMN, DisplayType::Record).hidden()
}

fn first_value<'c>(collection: &'c RecordCollection, field: &str) -> Option<&'c Value> {
    collection.records().iter().find_map(|record| record.get(field))
}

/// Millisecond pattern for date-time fields whose values carry sub-second parts.
fn precision_format(
    meta: Option<&FieldMetadata>,
    collection: &RecordCollection,
    field: &str,
) -> Option<String> {
    if meta.map(|m| m.kind) != Some(FieldKind::DateTime) {
        return None;
    }
    let subsecond = collection.records().iter().any(|record| {
        record
            .get(field)
            .and_then(|value| value.unaliased().as_date_time())
            .is_some_and(|stamp| stamp.has_subsecond())
    });
    subsecond.then(|| MILLISECOND_FORMAT.to_string())
}

fn kind_type(kind: FieldKind) -> DisplayType {
    match kind {
        FieldKind::Integer | FieldKind::Choice => DisplayType::Integer,
        FieldKind::Decimal => DisplayType::Decimal,
        FieldKind::Double => DisplayType::Double,
        FieldKind::Boolean => DisplayType::Boolean,
        FieldKind::DateTime => DisplayType::DateTime,
        FieldKind::Identifier => DisplayType::Identifier,
        FieldKind::Amount => DisplayType::Amount,
        FieldKind::Text | FieldKind::Reference | FieldKind::Other => DisplayType::Text,
    }
}
