//! Scoped writer assembling a CLDF dataset on disk.

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::cldf::dataset::{Dataset, Row};
use crate::cldf::metadata::{Link, Table};
use crate::env::{Environment, HostEnvironment};
use crate::error::{CldfError, Result};
use crate::provenance::{CommandArgs, SourceRepository};
use crate::spec::DatasetSpec;

/// IRI stamped as `rdf:type` on every written dataset.
pub const DCAT_DISTRIBUTION: &str = "http://www.w3.org/ns/dcat#Distribution";

/// In-memory row buffers, keyed by component name in insertion order.
///
/// Looking up an absent component creates its (empty) buffer, so callers
/// can append without declaring tables first.
#[derive(Debug, Clone, Default)]
pub struct RowBuffers {
    tables: IndexMap<String, Vec<Row>>,
}

impl RowBuffers {
    /// Buffer for a component, created empty on first access.
    pub fn table_mut(&mut self, component: impl Into<String>) -> &mut Vec<Row> {
        self.tables.entry(component.into()).or_default()
    }

    /// Append a single row to a component's buffer.
    pub fn push(&mut self, component: impl Into<String>, row: Row) {
        self.table_mut(component).push(row);
    }

    pub fn get(&self, component: &str) -> Option<&[Row]> {
        self.tables.get(component).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn as_map(&self) -> &IndexMap<String, Vec<Row>> {
        &self.tables
    }
}

/// An object mediating writing data as a proper CLDF dataset.
///
/// Construction copies the spec's metadata template into the output
/// directory and opens a dataset handle against the copy. Rows
/// accumulate in [`objects`](Self::objects); the final
/// [`flush`](Self::flush) stamps provenance and writes everything
/// through the handle.
///
/// The intended usage is scoped, with the write guaranteed on exit:
///
/// ```no_run
/// use cldfkit::{DatasetSpec, DatasetWriter};
///
/// # fn main() -> cldfkit::Result<()> {
/// let spec = DatasetSpec::new("StructureDataset")?;
/// DatasetWriter::with_spec("cldf", spec)?.scope(|writer| {
///     writer.objects.table_mut("ValueTable").push(
///         [("ID".to_string(), "1".into())].into_iter().collect(),
///     );
///     Ok(())
/// })?;
/// # Ok(())
/// # }
/// ```
pub struct DatasetWriter {
    spec: DatasetSpec,
    dir: PathBuf,
    /// Accumulated rows, written out on flush.
    pub objects: RowBuffers,
    args: Option<CommandArgs>,
    source: Option<SourceRepository>,
    env: Box<dyn Environment>,
    cldf: Dataset,
    written: bool,
}

impl DatasetWriter {
    /// Writer for a default (Generic) dataset.
    pub fn new(outdir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_spec(outdir, DatasetSpec::new("Generic")?)
    }

    /// Writer for a dataset described by `spec`.
    ///
    /// Creates `outdir` if absent (one directory level, not recursive),
    /// copies the metadata template into it and opens the handle.
    pub fn with_spec(outdir: impl Into<PathBuf>, spec: DatasetSpec) -> Result<Self> {
        let dir = outdir.into();
        if !dir.exists() {
            fs::create_dir(&dir).map_err(|e| CldfError::io(&dir, e))?;
        }

        let target = dir.join(spec.metadata_fname());
        fs::copy(spec.default_metadata_path(), &target)
            .map_err(|e| CldfError::io(spec.default_metadata_path(), e))?;

        let cldf = spec.module().from_metadata(&target)?;

        Ok(DatasetWriter {
            spec,
            dir,
            objects: RowBuffers::default(),
            args: None,
            source: None,
            env: Box::new(HostEnvironment::new()),
            cldf,
            written: false,
        })
    }

    /// Attach command-line argument values; catalog-typed values among
    /// them end up in `wasDerivedFrom`.
    pub fn args(mut self, args: CommandArgs) -> Self {
        self.args = Some(args);
        self
    }

    /// Attach the repository the dataset originates from.
    pub fn source(mut self, repo: SourceRepository) -> Self {
        self.source = Some(repo);
        self
    }

    /// Replace the environment descriptor used for `wasGeneratedBy`.
    pub fn environment(mut self, env: impl Environment + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Directory the dataset is written to.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    pub fn spec(&self) -> &DatasetSpec {
        &self.spec
    }

    /// The underlying dataset handle.
    pub fn cldf(&self) -> &Dataset {
        &self.cldf
    }

    /// Table lookup, passed through to the handle.
    pub fn table(&self, component: &str) -> Option<&Table> {
        self.cldf.table(component)
    }

    /// Validation, passed through to the handle.
    pub fn validate(&self) -> Result<Vec<String>> {
        self.cldf.validate()
    }

    /// Run `f` against this writer, then write.
    ///
    /// The flush happens on every exit path: when `f` fails, the rows
    /// accumulated so far are still written (best-effort persistence)
    /// and `f`'s error propagates afterwards.
    pub fn scope<T>(mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = f(&mut self);
        let flushed = self.flush();
        let value = result?;
        flushed?;
        Ok(value)
    }

    /// Stamp provenance and write all accumulated rows plus metadata.
    ///
    /// Performed once per writer; later calls are no-ops. Prefer
    /// [`scope`](Self::scope), which calls this on exit.
    pub fn flush(&mut self) -> Result<()> {
        if self.written {
            return Ok(());
        }
        self.written = true;

        self.cldf.set_property("rdf:type", DCAT_DISTRIBUTION);

        let mut sources = Vec::new();
        if let Some(repo) = &self.source {
            sources.push(repo.provenance());
        }
        if let Some(args) = &self.args {
            sources.extend(args.catalogs().map(|catalog| catalog.provenance()));
        }
        if !sources.is_empty() {
            self.cldf.add_provenance("wasDerivedFrom", sources);
        }

        let mut generated = vec![self.env.runtime()];
        // A missing package-listing tool leaves provenance incomplete
        // but never fails the write.
        if let Some(snapshot) = self.env.package_snapshot(&self.dir) {
            generated.push(snapshot);
        }
        self.cldf.add_provenance("wasGeneratedBy", generated);

        for (component, fname) in self.spec.data_fnames() {
            self.cldf.set_table_url(component, Link::new(fname.clone()))?;
        }

        let objects = std::mem::take(&mut self.objects);
        self.cldf.write(objects.as_map())
    }
}

impl Drop for DatasetWriter {
    fn drop(&mut self) {
        // Covers non-scoped use and unwinding; errors cannot surface
        // here, `scope` is the path that reports them.
        if !self.written {
            let _ = self.flush();
        }
    }
}
