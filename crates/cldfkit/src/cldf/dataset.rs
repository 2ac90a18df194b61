//! The CLDF dataset handle: a metadata document bound to a directory.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{CldfError, Result};
use crate::provenance::ProvenanceRecord;

use super::metadata::{Column, Link, Metadata, Table};

/// A single row record: column name to value, in insertion order.
pub type Row = IndexMap<String, Value>;

/// A CLDF dataset: metadata plus the directory its table files live in.
#[derive(Debug, Clone)]
pub struct Dataset {
    metadata: Metadata,
    metadata_path: PathBuf,
    dir: PathBuf,
}

impl Dataset {
    /// Open a dataset from a metadata document on disk.
    pub fn from_metadata(path: impl AsRef<Path>) -> Result<Self> {
        let metadata_path = path.as_ref().to_path_buf();
        let metadata = Metadata::from_path(&metadata_path)?;
        let dir = metadata_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Dataset {
            metadata,
            metadata_path,
            dir,
        })
    }

    /// The module id this dataset conforms to.
    pub fn module_id(&self) -> &str {
        self.metadata.module_id()
    }

    /// Directory containing the dataset's files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Look up a table by component name (e.g. "ValueTable") or by its
    /// file url.
    pub fn table(&self, component: &str) -> Option<&Table> {
        self.metadata
            .tables
            .iter()
            .find(|t| t.component() == Some(component) || t.url.as_str() == component)
    }

    fn table_mut(&mut self, component: &str) -> Option<&mut Table> {
        self.metadata
            .tables
            .iter_mut()
            .find(|t| t.component() == Some(component) || t.url.as_str() == component)
    }

    /// Point a component's file link at a different filename.
    pub fn set_table_url(&mut self, component: &str, url: Link) -> Result<()> {
        let table = self.table_mut(component).ok_or_else(|| {
            CldfError::Config(format!("unknown component: {}", component))
        })?;
        table.url = url;
        Ok(())
    }

    /// Set a top-level metadata property.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.set_property(key, value);
    }

    /// Record provenance under `prov:<relation>`.
    pub fn add_provenance(&mut self, relation: &str, records: Vec<ProvenanceRecord>) {
        self.metadata.add_provenance(relation, records);
    }

    /// Write table rows and the metadata document to the dataset
    /// directory.
    ///
    /// Each entry maps a component name to its rows; rows are emitted in
    /// the order given, one CSV file per table, columns per the table
    /// schema. Components absent from `tables` keep whatever file is on
    /// disk.
    pub fn write(&mut self, tables: &IndexMap<String, Vec<Row>>) -> Result<()> {
        for (component, rows) in tables {
            let table = self.table(component).ok_or_else(|| {
                CldfError::Config(format!("unknown component: {}", component))
            })?;
            let path = self.dir.join(table.url.as_str());
            let columns = &table.schema.columns;

            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(columns.iter().map(|c| c.name.as_str()))?;
            for row in rows {
                writer.write_record(
                    columns
                        .iter()
                        .map(|c| render_cell(c, row.get(&c.name))),
                )?;
            }
            writer.flush().map_err(|e| CldfError::io(&path, e))?;
        }
        self.metadata.write(&self.metadata_path)
    }

    /// Number of data rows in a table's file, or `None` when the file
    /// is absent or unreadable.
    pub fn row_count(&self, table: &Table) -> Option<usize> {
        let path = self.dir.join(table.url.as_str());
        csv::Reader::from_path(path)
            .ok()
            .map(|mut reader| reader.records().filter(|record| record.is_ok()).count())
    }

    /// Check the dataset's files against its schema.
    ///
    /// Returns the list of findings; an empty list means the dataset is
    /// valid. Hard I/O failures while reading a table are errors.
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut issues = Vec::new();
        for table in &self.metadata.tables {
            let path = self.dir.join(table.url.as_str());
            if !path.exists() {
                issues.push(format!("{}: table file missing", table.url));
                continue;
            }

            let mut reader = csv::Reader::from_path(&path)?;
            let expected: Vec<&str> =
                table.schema.columns.iter().map(|c| c.name.as_str()).collect();
            let headers: Vec<String> =
                reader.headers()?.iter().map(|h| h.to_string()).collect();
            if headers != expected {
                issues.push(format!(
                    "{}: header mismatch, expected [{}], found [{}]",
                    table.url,
                    expected.join(", "),
                    headers.join(", ")
                ));
                continue;
            }

            let required: Vec<usize> = table
                .schema
                .columns
                .iter()
                .enumerate()
                .filter(|(_, c)| c.required)
                .map(|(i, _)| i)
                .collect();
            let key_columns: Vec<usize> = table
                .schema
                .primary_key
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter_map(|k| expected.iter().position(|name| name == k))
                .collect();

            let mut seen_keys = std::collections::HashSet::new();
            for (lineno, record) in reader.records().enumerate() {
                let record = record?;
                for &idx in &required {
                    if record.get(idx).map(str::is_empty).unwrap_or(true) {
                        issues.push(format!(
                            "{}: row {}: required column '{}' is empty",
                            table.url,
                            lineno + 1,
                            expected[idx]
                        ));
                    }
                }
                if !key_columns.is_empty() {
                    let key: Vec<String> = key_columns
                        .iter()
                        .map(|&idx| record.get(idx).unwrap_or("").to_string())
                        .collect();
                    if !seen_keys.insert(key.clone()) {
                        issues.push(format!(
                            "{}: row {}: duplicate primary key [{}]",
                            table.url,
                            lineno + 1,
                            key.join(", ")
                        ));
                    }
                }
            }
        }
        Ok(issues)
    }
}

/// Render a JSON value as a CSV cell, honoring the column's separator
/// for list values.
fn render_cell(column: &Column, value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => {
            let separator = column.separator.as_deref().unwrap_or(";");
            items
                .iter()
                .map(|item| render_cell(column, Some(item)))
                .collect::<Vec<_>>()
                .join(separator)
        }
        Some(other) => other.to_string(),
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "<cldf:v1.0:{} at {}>",
            self.module_id(),
            self.dir.display()
        )?;
        for table in &self.metadata.tables {
            match self.row_count(table) {
                Some(n) => writeln!(f, "  {}: {} rows", table.url, n)?,
                None => writeln!(f, "  {}: missing", table.url)?,
            }
        }
        Ok(())
    }
}
