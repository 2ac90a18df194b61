//! cldfkit: a thin convenience layer for writing CLDF datasets.
//!
//! CLDF (Cross-Linguistic Data Format) packages linguistic data as CSV
//! tables described by a CSVW/JSON metadata document. This crate copies
//! a metadata template, buffers rows per table, stamps provenance
//! (source repository, catalogs used, software environment) and writes
//! the result to disk.
//!
//! # Example
//!
//! ```no_run
//! use cldfkit::{DatasetSpec, DatasetWriter};
//!
//! # fn main() -> cldfkit::Result<()> {
//! let spec = DatasetSpec::builder("StructureDataset")
//!     .data_filename("ValueTable", "values.csv")
//!     .build()?;
//!
//! DatasetWriter::with_spec("cldf", spec)?.scope(|writer| {
//!     writer.objects.table_mut("ValueTable").push(
//!         [
//!             ("ID".to_string(), "1".into()),
//!             ("Language_ID".to_string(), "abcd1234".into()),
//!             ("Parameter_ID".to_string(), "feature1".into()),
//!             ("Value".to_string(), "yes".into()),
//!         ]
//!         .into_iter()
//!         .collect(),
//!     );
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod cldf;
pub mod env;
pub mod error;
pub mod provenance;
pub mod spec;
pub mod writer;

pub use cldf::{Dataset, Link, Module, Row};
pub use env::{Environment, HostEnvironment, StaticEnvironment};
pub use error::{CldfError, Result};
pub use provenance::{ArgValue, Catalog, CommandArgs, ProvenanceRecord, SourceRepository};
pub use spec::{DatasetSpec, DatasetSpecBuilder, ModuleRef};
pub use writer::{DatasetWriter, RowBuffers, DCAT_DISTRIBUTION};
