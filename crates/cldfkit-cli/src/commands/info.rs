//! Info command - display basic info about a dataset.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;

use cldfkit::cldf::modules::MD_SUFFIX;
use cldfkit::Dataset;

pub fn run(
    dataset: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let metadata_path = resolve_metadata_path(&dataset)?;
    if verbose {
        eprintln!("{} {}", "Loading".cyan().bold(), metadata_path.display());
    }

    let dataset = Dataset::from_metadata(&metadata_path)?;

    if json_output {
        let tables: Vec<_> = dataset
            .metadata()
            .tables
            .iter()
            .map(|table| {
                serde_json::json!({
                    "url": table.url.as_str(),
                    "component": table.component(),
                    "rows": dataset.row_count(table),
                })
            })
            .collect();
        let info = serde_json::json!({
            "module": dataset.module_id(),
            "path": metadata_path,
            "tables": tables,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print!("{}", dataset);
    }

    Ok(())
}

/// Accept either a metadata file or a directory containing exactly one
/// `*-metadata.json`.
fn resolve_metadata_path(dataset: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if !dataset.is_dir() {
        return Ok(dataset.to_path_buf());
    }

    let mut candidates: Vec<PathBuf> = fs::read_dir(dataset)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().ends_with(MD_SUFFIX))
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(format!(
            "No *{} found in {}",
            MD_SUFFIX,
            dataset.display()
        )
        .into()),
        1 => Ok(candidates.remove(0)),
        _ => Err(format!(
            "Multiple metadata files in {}: {}",
            dataset.display(),
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
        .into()),
    }
}
