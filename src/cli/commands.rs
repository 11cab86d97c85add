//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::manifest::Manifest;
use crate::session::{PackageReport, Session};
use crate::store::{self, StoreFormat};

use super::{CliError, CliResult, ExitCode};

/// Maximum manifest size (16 MB)
const MAX_MANIFEST_SIZE: u64 = 16 * 1024 * 1024;

/// Options of the `assign` command.
#[derive(Debug, Clone)]
pub struct AssignOptions {
    pub manifest: PathBuf,
    pub store: Option<PathBuf>,
    pub format: Option<StoreFormat>,
    pub enum_name: Option<String>,
    pub prefix: String,
    pub suffix: String,
    pub json: bool,
}

impl AssignOptions {
    /// Build the generator configuration these options describe.
    pub fn config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::new()
            .with_const_prefix(self.prefix.clone())
            .with_const_suffix(self.suffix.clone());
        if let Some(path) = &self.store {
            config = config.with_store(path);
        }
        if let Some(format) = self.format {
            config = config.with_store_format(format);
        }
        if let Some(name) = &self.enum_name {
            config = config.with_enum_name(name.clone());
        }
        config
    }
}

/// Read the manifest file.
///
/// ## Errors
///
/// Returns an error if the file cannot be read, exceeds `MAX_MANIFEST_SIZE`, or is not a valid
/// manifest.
pub fn read_manifest(path: &Path) -> CliResult<Manifest> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", path.display(), e)))?;
    if metadata.len() > MAX_MANIFEST_SIZE {
        return Err(CliError::failure(format!(
            "Manifest '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_MANIFEST_SIZE
        )));
    }
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))?;
    Manifest::from_json(&text)
        .map_err(|e| CliError::failure(format!("Invalid manifest '{}': {}", path.display(), e)))
}

/// Assign type tags to every package of a manifest and write back the sidecar store.
///
/// A fatal error aborts the run before anything is written.
pub fn assign(opts: &AssignOptions) -> CliResult<ExitCode> {
    let config = opts.config();
    config.validate().map_err(|e| CliError::failure(format!("Error: {e}")))?;
    let manifest = read_manifest(&opts.manifest)?;

    let mut session = Session::new(config);
    let mut reports = Vec::with_capacity(manifest.packages.len());
    for package in &manifest.packages {
        // Id changes are already reported by the allocator's `warn!` events.
        let report = session
            .run_package(package)
            .map_err(|e| CliError::failure(format!("Error: {e}")))?;
        reports.push(report);
    }

    let written = session
        .finish()
        .map_err(|e| CliError::failure(format!("Error writing store: {e}")))?;
    for path in &written {
        tracing::info!(path = %path.display(), "store updated");
    }

    if opts.json {
        println!("{}", reports_to_json(&reports));
    } else {
        print!("{}", format_reports(&reports));
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the entries of a sidecar store, sorted by id.
pub fn check(path: &Path, format: Option<StoreFormat>, enum_name: Option<&str>) -> CliResult<ExitCode> {
    let format = format.unwrap_or_else(|| StoreFormat::from_path(path));
    let entries = store::inspect(path, format, enum_name).map_err(|e| CliError::failure(format!("Error: {e}")))?;
    for entry in &entries {
        println!("{} = {}", entry.name, entry.id);
    }
    tracing::debug!(entries = entries.len(), "store checked");
    Ok(ExitCode::SUCCESS)
}

/// Plain-text rendering: one `package:` header followed by indented `name = id` lines.
pub fn format_reports(reports: &[PackageReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!("{}:\n", report.package));
        for entry in &report.entries {
            out.push_str(&format!("  {} = {}\n", entry.name, entry.id));
        }
    }
    out
}

pub fn reports_to_json(reports: &[PackageReport]) -> String {
    let value: Vec<serde_json::Value> = reports
        .iter()
        .map(|r| {
            serde_json::json!({
                "package": r.package,
                "entries": r.entries.iter().map(|e| serde_json::json!({ "name": e.name, "id": e.id })).collect::<Vec<_>>(),
                "warnings": r.warnings.iter().map(|w| serde_json::json!({ "name": w.name, "old": w.old, "new": w.new })).collect::<Vec<_>>(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&value).unwrap_or_default()
}
