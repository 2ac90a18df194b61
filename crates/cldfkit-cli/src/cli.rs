//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cldfkit: tools for CLDF datasets
#[derive(Parser)]
#[command(name = "cldfkit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display basic info about a dataset
    Info {
        /// Path to a CLDF metadata file, or a directory containing one
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
