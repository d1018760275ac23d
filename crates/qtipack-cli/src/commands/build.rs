//! The `qtipack build` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use qtipack_package::{build_package, Package, PackagedItem};

use super::{load_bank, resolve_config, PackageFlags};

/// Machine-readable build summary.
#[derive(Serialize)]
struct BuildSummary<'a> {
    output: &'a Path,
    bytes: usize,
    created_at: DateTime<Utc>,
    items: &'a [PackagedItem],
}

pub fn execute(
    bank_path: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    json: bool,
    flags: PackageFlags,
) -> Result<()> {
    let config = resolve_config(config_path, flags)?;
    let records = load_bank(&bank_path)?;

    let package = build_package(&records, &config.package)
        .with_context(|| format!("failed to build package from {}", bank_path.display()))?;

    let output = output.unwrap_or_else(|| config.output_path());
    write_package(&package, &output)?;

    if json {
        let summary = BuildSummary {
            output: &output,
            bytes: package.bytes.len(),
            created_at: package.created_at,
            items: &package.items,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for item in &package.items {
            println!("  {} -> {}", item.title, item.filename);
        }
        println!(
            "Wrote {} item(s) to {} ({} bytes)",
            package.items.len(),
            output.display(),
            package.bytes.len()
        );
    }

    Ok(())
}

fn write_package(package: &Package, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &package.bytes)
        .with_context(|| format!("failed to write package: {}", path.display()))
}
