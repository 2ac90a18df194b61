//! Registry of CLDF modules and their packaged metadata templates.

use std::path::{Path, PathBuf};

use crate::error::{CldfError, Result};

use super::dataset::Dataset;

/// Base URI of the CLDF ontology.
pub const TERMS_URI: &str = "http://cldf.clld.org/v1.0/terms.rdf";

/// Filename suffix for CLDF metadata documents.
pub const MD_SUFFIX: &str = "-metadata.json";

/// A CLDF module: a named schema variant defining which components a
/// dataset may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Module {
    /// Module identifier, e.g. "Wordlist".
    pub id: &'static str,
}

/// The CLDF 1.0 module set.
static MODULES: &[Module] = &[
    Module {
        id: "Generic",
    },
    Module {
        id: "Wordlist",
    },
    Module {
        id: "StructureDataset",
    },
    Module {
        id: "Dictionary",
    },
    Module {
        id: "ParallelText",
    },
    Module {
        id: "TextCorpus",
    },
];

/// All known CLDF modules.
pub fn modules() -> &'static [Module] {
    MODULES
}

/// Look up a module by identifier.
pub fn find(id: &str) -> Option<&'static Module> {
    MODULES.iter().find(|m| m.id == id)
}

/// Resolve the packaged metadata template for a module id.
///
/// Templates ship with the crate under `modules/<id>-metadata.json`.
pub fn template_path(id: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("modules")
        .join(format!("{}{}", id, MD_SUFFIX))
}

impl Module {
    /// The terms.rdf URI identifying this module.
    pub fn uri(&self) -> String {
        format!("{}#{}", TERMS_URI, self.id)
    }

    /// Open a dataset from a metadata document conforming to this module.
    pub fn from_metadata(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let dataset = Dataset::from_metadata(path)?;
        if dataset.module_id() != self.id {
            return Err(CldfError::Metadata(format!(
                "metadata conforms to '{}', expected '{}'",
                dataset.module_id(),
                self.id
            )));
        }
        Ok(dataset)
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
