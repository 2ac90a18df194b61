//! Typed view of a CLDF metadata document (a CSVW table group).

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CldfError, Result};
use crate::provenance::ProvenanceRecord;

use super::modules::TERMS_URI;

/// Reference to a CSV file, serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Link(String);

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Link(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A column description within a table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "propertyUrl", skip_serializing_if = "Option::is_none")]
    pub property_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Schema of a single table: its columns and primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<Column>,
    #[serde(rename = "primaryKey", skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A table (component) within the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub url: Link,
    #[serde(rename = "dc:conformsTo", skip_serializing_if = "Option::is_none")]
    pub conforms_to: Option<String>,
    #[serde(rename = "tableSchema")]
    pub schema: TableSchema,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Table {
    /// The component name this table realizes, e.g. "ValueTable".
    ///
    /// Derived from the terms.rdf fragment of `dc:conformsTo`; tables
    /// without a conformance claim are addressed by their url.
    pub fn component(&self) -> Option<&str> {
        self.conforms_to
            .as_deref()
            .and_then(|uri| uri.rsplit_once('#'))
            .map(|(_, fragment)| fragment)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.schema.columns.iter().find(|c| c.name == name)
    }
}

/// A CLDF metadata document.
///
/// Known structure is typed; every other top-level key (dc:title,
/// rdf:type, prov:* records) lives in the ordered `properties` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "@context")]
    pub context: Value,
    #[serde(rename = "dc:conformsTo")]
    pub conforms_to: String,
    #[serde(flatten)]
    pub properties: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Value>,
    pub tables: Vec<Table>,
}

impl Metadata {
    /// Load and well-formedness-check a metadata document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CldfError::io(path, e))?;
        let metadata: Metadata =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                CldfError::Metadata(format!(
                    "cannot parse '{}' as CLDF metadata: {}",
                    path.display(),
                    e
                ))
            })?;

        if !metadata.conforms_to.starts_with(TERMS_URI) {
            return Err(CldfError::Metadata(format!(
                "'{}' does not conform to the CLDF ontology: {}",
                path.display(),
                metadata.conforms_to
            )));
        }
        Ok(metadata)
    }

    /// Persist the document as pretty-printed JSON.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| CldfError::io(path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// The module id this dataset conforms to (the terms.rdf fragment).
    pub fn module_id(&self) -> &str {
        self.conforms_to
            .rsplit_once('#')
            .map(|(_, fragment)| fragment)
            .unwrap_or(&self.conforms_to)
    }

    /// Set a top-level property such as `rdf:type` or `dc:title`.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get a top-level property.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Record provenance under `prov:<relation>`.
    ///
    /// Extends an existing list instead of replacing it; a previously
    /// recorded single object is promoted to a list first.
    pub fn add_provenance(&mut self, relation: &str, records: Vec<ProvenanceRecord>) {
        let key = format!("prov:{}", relation);
        let mut new: Vec<Value> = records
            .into_iter()
            .map(|r| serde_json::to_value(r).unwrap_or(Value::Null))
            .collect();

        let merged = match self.properties.shift_remove(&key) {
            Some(Value::Array(mut existing)) => {
                existing.append(&mut new);
                existing
            }
            Some(single) => {
                let mut existing = vec![single];
                existing.append(&mut new);
                existing
            }
            None => new,
        };
        self.properties.insert(key, Value::Array(merged));
    }
}
