//! Software-environment description for provenance stamping.
//!
//! The writer records which runtime produced a dataset and, when
//! possible, a frozen package list. Both sit behind the [`Environment`]
//! trait so tests can pin the output.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::provenance::ProvenanceRecord;

/// Name of the frozen package list written into the output directory.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Describes the software environment a dataset was generated by.
pub trait Environment {
    /// Record naming the runtime and its version.
    fn runtime(&self) -> ProvenanceRecord;

    /// Write a frozen package list into `dir` and return the record
    /// pointing at it, or `None` when no snapshot could be taken.
    fn package_snapshot(&self, dir: &Path) -> Option<ProvenanceRecord>;
}

/// The real host environment: rustc version plus a package-listing
/// command (by default `cargo tree`) whose output lands in
/// `requirements.txt`.
#[derive(Debug, Clone)]
pub struct HostEnvironment {
    freeze_command: Vec<String>,
}

impl HostEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different package-listing command.
    pub fn with_freeze_command(command: Vec<String>) -> Self {
        HostEnvironment {
            freeze_command: command,
        }
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        HostEnvironment {
            freeze_command: vec!["cargo".to_string(), "tree".to_string()],
        }
    }
}

impl Environment for HostEnvironment {
    fn runtime(&self) -> ProvenanceRecord {
        let version = Command::new("rustc")
            .arg("--version")
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                // "rustc 1.75.0 (hash date)" -> "1.75.0"
                let mut tokens = stdout.split_whitespace().map(str::to_string);
                match tokens.next() {
                    Some(first) if first == "rustc" => tokens.next(),
                    first => first,
                }
            })
            .unwrap_or_else(|| "unknown".to_string());
        ProvenanceRecord::tool("rust", version)
    }

    fn package_snapshot(&self, dir: &Path) -> Option<ProvenanceRecord> {
        let (program, args) = self.freeze_command.split_first()?;
        let output = Command::new(program).args(args).output().ok()?;
        if !output.status.success() {
            return None;
        }
        fs::write(dir.join(REQUIREMENTS_FILE), &output.stdout).ok()?;

        let manager = Path::new(program)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.clone());
        Some(ProvenanceRecord::artifact(
            format!("{}-packages", manager),
            REQUIREMENTS_FILE,
        ))
    }
}

/// A fixed environment description, for tests and reproducible runs.
#[derive(Debug, Clone)]
pub struct StaticEnvironment {
    runtime: ProvenanceRecord,
    /// Package list to write, or `None` to behave like a host without a
    /// package-listing tool.
    packages: Option<String>,
}

impl StaticEnvironment {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        StaticEnvironment {
            runtime: ProvenanceRecord::tool(name, version),
            packages: None,
        }
    }

    pub fn with_packages(mut self, listing: impl Into<String>) -> Self {
        self.packages = Some(listing.into());
        self
    }
}

impl Environment for StaticEnvironment {
    fn runtime(&self) -> ProvenanceRecord {
        self.runtime.clone()
    }

    fn package_snapshot(&self, dir: &Path) -> Option<ProvenanceRecord> {
        let listing = self.packages.as_ref()?;
        fs::write(dir.join(REQUIREMENTS_FILE), listing).ok()?;
        Some(ProvenanceRecord::artifact("static-packages", REQUIREMENTS_FILE))
    }
}
