//! Provenance records and the collaborators that supply them.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A JSON-LD-shaped provenance entry, e.g.
/// `{"dc:title": "rust", "dc:description": "1.75.0"}`.
///
/// Kept as an ordered string map so records serialize with their keys in
/// construction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvenanceRecord(IndexMap<String, String>);

impl ProvenanceRecord {
    /// A tool or runtime: `{dc:title, dc:description}`.
    pub fn tool(title: impl Into<String>, description: impl Into<String>) -> Self {
        ProvenanceRecord(IndexMap::from([
            ("dc:title".to_string(), title.into()),
            ("dc:description".to_string(), description.into()),
        ]))
    }

    /// A related artifact: `{dc:title, dc:relation}`.
    pub fn artifact(title: impl Into<String>, relation: impl Into<String>) -> Self {
        ProvenanceRecord(IndexMap::from([
            ("dc:title".to_string(), title.into()),
            ("dc:relation".to_string(), relation.into()),
        ]))
    }

    /// A versioned repository or catalog: `{rdf:about, dc:created}`.
    pub fn repository(url: impl Into<String>, version: Option<&str>) -> Self {
        let mut map = IndexMap::from([("rdf:about".to_string(), url.into())]);
        if let Some(version) = version {
            map.insert("dc:created".to_string(), version.to_string());
        }
        ProvenanceRecord(map)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }
}

/// A versioned external reference dataset used while building a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Human-readable catalog name, e.g. "glottolog".
    pub name: String,
    /// Where the catalog lives (URL or local path).
    pub location: String,
    /// Version in use, if known.
    pub version: Option<String>,
}

impl Catalog {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Catalog {
            name: name.into(),
            location: location.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Structured provenance record describing this catalog.
    pub fn provenance(&self) -> ProvenanceRecord {
        let mut record = ProvenanceRecord::repository(&*self.location, self.version.as_deref());
        record.0.insert("dc:title".to_string(), self.name.clone());
        record
    }
}

/// Identity of the repository a dataset originates from.
///
/// A plain value: callers fill in whatever their VCS tooling reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRepository {
    pub url: String,
    pub version: Option<String>,
}

impl SourceRepository {
    pub fn new(url: impl Into<String>) -> Self {
        SourceRepository {
            url: url.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Structured provenance record describing this repository.
    pub fn provenance(&self) -> ProvenanceRecord {
        ProvenanceRecord::repository(&*self.url, self.version.as_deref())
    }
}

/// A single command-line argument value.
///
/// The writer only ever inspects these to discover catalogs; everything
/// else is carried opaquely.
#[derive(Debug, Clone)]
pub enum ArgValue {
    Flag(bool),
    Text(String),
    Path(PathBuf),
    Catalog(Catalog),
}

/// Command-line argument values, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CommandArgs {
    values: IndexMap<String, ArgValue>,
}

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// All catalog-typed argument values, in insertion order.
    pub fn catalogs(&self) -> impl Iterator<Item = &Catalog> {
        self.values.values().filter_map(|v| match v {
            ArgValue::Catalog(catalog) => Some(catalog),
            _ => None,
        })
    }
}
