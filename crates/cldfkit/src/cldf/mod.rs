//! CLDF support layer: module registry, metadata documents, dataset
//! handle.

pub mod dataset;
pub mod metadata;
pub mod modules;

pub use dataset::{Dataset, Row};
pub use metadata::{Column, Link, Metadata, Table, TableSchema};
pub use modules::{find, modules, template_path, Module, MD_SUFFIX, TERMS_URI};
