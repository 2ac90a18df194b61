//! Dataset specification: which module, which metadata template, which
//! filenames.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::cldf::metadata::Metadata;
use crate::cldf::modules::{self, Module};
use crate::error::{CldfError, Result};

/// Reference to a CLDF module: by name or by registry handle.
#[derive(Debug, Clone)]
pub enum ModuleRef {
    Name(String),
    Handle(&'static Module),
}

impl ModuleRef {
    fn id(&self) -> &str {
        match self {
            ModuleRef::Name(name) => name,
            ModuleRef::Handle(module) => module.id,
        }
    }
}

impl From<&str> for ModuleRef {
    fn from(name: &str) -> Self {
        ModuleRef::Name(name.to_string())
    }
}

impl From<String> for ModuleRef {
    fn from(name: String) -> Self {
        ModuleRef::Name(name)
    }
}

impl From<&'static Module> for ModuleRef {
    fn from(module: &'static Module) -> Self {
        ModuleRef::Handle(module)
    }
}

/// Specification for initializing a CLDF dataset.
///
/// Validated on construction and read-only afterwards.
#[derive(Debug, Clone)]
pub struct DatasetSpec {
    module: &'static Module,
    default_metadata_path: PathBuf,
    metadata_fname: String,
    data_fnames: IndexMap<String, String>,
}

impl DatasetSpec {
    /// Spec for a module with all defaults.
    pub fn new(module: impl Into<ModuleRef>) -> Result<Self> {
        Self::builder(module).build()
    }

    pub fn builder(module: impl Into<ModuleRef>) -> DatasetSpecBuilder {
        DatasetSpecBuilder {
            module: module.into(),
            default_metadata_path: None,
            metadata_fname: None,
            data_fnames: IndexMap::new(),
        }
    }

    /// The module this spec resolves to.
    pub fn module(&self) -> &'static Module {
        self.module
    }

    /// Path of the metadata template the writer copies.
    pub fn default_metadata_path(&self) -> &PathBuf {
        &self.default_metadata_path
    }

    /// Filename the copied metadata gets in the output directory.
    pub fn metadata_fname(&self) -> &str {
        &self.metadata_fname
    }

    /// Per-component filename overrides, in insertion order.
    pub fn data_fnames(&self) -> &IndexMap<String, String> {
        &self.data_fnames
    }
}

/// Builder for [`DatasetSpec`].
#[derive(Debug)]
pub struct DatasetSpecBuilder {
    module: ModuleRef,
    default_metadata_path: Option<PathBuf>,
    metadata_fname: Option<String>,
    data_fnames: IndexMap<String, String>,
}

impl DatasetSpecBuilder {
    /// Use a custom metadata template instead of the packaged one.
    pub fn metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_metadata_path = Some(path.into());
        self
    }

    /// Filename for the copied metadata in the output directory.
    pub fn metadata_filename(mut self, fname: impl Into<String>) -> Self {
        self.metadata_fname = Some(fname.into());
        self
    }

    /// Override the output filename for a component. Useful when several
    /// datasets share one directory.
    pub fn data_filename(
        mut self,
        component: impl Into<String>,
        fname: impl Into<String>,
    ) -> Self {
        self.data_fnames.insert(component.into(), fname.into());
        self
    }

    /// Validate and build the spec.
    pub fn build(self) -> Result<DatasetSpec> {
        let module = modules::find(self.module.id()).ok_or_else(|| {
            CldfError::Config(format!("unknown CLDF module: {}", self.module.id()))
        })?;

        let default_metadata_path = match self.default_metadata_path {
            Some(path) => {
                // Load purely to check well-formedness.
                Metadata::from_path(&path).map_err(|_| {
                    CldfError::Config(format!(
                        "invalid default metadata: {}",
                        path.display()
                    ))
                })?;
                path
            }
            None => modules::template_path(module.id),
        };

        let metadata_fname = match self.metadata_fname {
            Some(fname) => fname,
            None => default_metadata_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    CldfError::Config(format!(
                        "invalid default metadata: {}",
                        default_metadata_path.display()
                    ))
                })?,
        };

        Ok(DatasetSpec {
            module,
            default_metadata_path,
            metadata_fname,
            data_fnames: self.data_fnames,
        })
    }
}
