//! JSON input files: records and metadata.
//!
//! A record file is one of:
//!
//! - an object with a `records` array (and optional `entity_name`): a collection
//! - a bare array of record objects: a record sequence
//! - anything else: bound in passthrough mode and echoed unchanged
//!
//! A record object carries `logical_name`, `id` and either an `attributes`
//! object or its fields inline. Plain JSON scalars become text, integer,
//! double and boolean values; objects with a `type` tag are read as typed
//! values; `null` fields are left out.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value as Json};
use uuid::Uuid;

use grid_model::{DataSource, Record, RecordCollection, StaticMetadata, Value};

const DEFAULT_LOGICAL_NAME: &str = "record";
const RESERVED_KEYS: &[&str] = &["logical_name", "id", "attributes"];

pub fn read_data_source(path: &Path) -> Result<DataSource> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read records {}", path.display()))?;
    let json: Json = serde_json::from_str(&content)
        .with_context(|| format!("parse records {}", path.display()))?;
    data_source_from_json(json)
}

pub fn read_metadata(path: &Path) -> Result<StaticMetadata> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read metadata {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse metadata {}", path.display()))
}

pub fn data_source_from_json(json: Json) -> Result<DataSource> {
    match json {
        Json::Object(map) if map.get("records").is_some_and(Json::is_array) => {
            let entity_name = map
                .get("entity_name")
                .and_then(Json::as_str)
                .map(str::to_string);
            let records = match map.get("records") {
                Some(Json::Array(items)) => read_records(items, entity_name.as_deref())?,
                _ => Vec::new(),
            };
            Ok(DataSource::Collection(RecordCollection::new(
                entity_name,
                records,
            )))
        }
        Json::Array(items) => Ok(DataSource::Records(read_records(&items, None)?)),
        other => Ok(DataSource::opaque(other)),
    }
}

fn read_records(items: &[Json], entity_name: Option<&str>) -> Result<Vec<Record>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let Json::Object(map) = item else {
                bail!("record {index} is not an object");
            };
            record_from_json(map, entity_name).with_context(|| format!("record {index}"))
        })
        .collect()
}

pub fn record_from_json(map: &Map<String, Json>, entity_name: Option<&str>) -> Result<Record> {
    let logical_name = map
        .get("logical_name")
        .and_then(Json::as_str)
        .or(entity_name)
        .unwrap_or(DEFAULT_LOGICAL_NAME);
    let id = match map.get("id") {
        Some(Json::String(text)) => {
            Uuid::parse_str(text).with_context(|| format!("invalid id {text:?}"))?
        }
        Some(Json::Null) | None => Uuid::nil(),
        Some(other) => bail!("invalid id {other}"),
    };
    let mut record = Record::new(logical_name, id)?;

    let fields: Box<dyn Iterator<Item = (&String, &Json)>> = match map.get("attributes") {
        Some(Json::Object(attributes)) => Box::new(attributes.iter()),
        Some(other) => bail!("attributes must be an object, found {other}"),
        None => Box::new(
            map.iter()
                .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str())),
        ),
    };
    for (name, json) in fields {
        if let Some(value) = value_from_json(json).with_context(|| format!("field {name}"))? {
            record.insert(name.as_str(), value);
        }
    }
    Ok(record)
}

/// Reads one field value; `None` for JSON null.
pub fn value_from_json(json: &Json) -> Result<Option<Value>> {
    let value = match json {
        Json::Null => return Ok(None),
        Json::Bool(flag) => Value::Boolean(*flag),
        Json::Number(number) => match number.as_i64() {
            Some(integer) => Value::Integer(integer),
            None => Value::Double(
                number
                    .as_f64()
                    .ok_or_else(|| anyhow!("number {number} is out of range"))?,
            ),
        },
        Json::String(text) => Value::Text(text.clone()),
        Json::Object(map) if map.contains_key("type") => serde_json::from_value(json.clone())?,
        other => Value::Text(other.to_string()),
    };
    Ok(Some(value))
}
