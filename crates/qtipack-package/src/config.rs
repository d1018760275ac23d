//! Configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use qtipack_core::model::PackageConfig;

/// Top-level qtipack configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QtipackConfig {
    /// Compilation options.
    #[serde(default)]
    pub package: PackageConfig,
    /// Default archive path for `qtipack build`.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl QtipackConfig {
    /// Archive path to use when none is given on the command line.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from("qtipack-package.zip"))
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `qtipack.toml` in the current directory
/// 2. `~/.config/qtipack/config.toml`
///
/// Environment variable overrides: `QTIPACK_STRIP_PREFIXES`, `QTIPACK_CONVERT_MATH`,
/// `QTIPACK_SHUFFLE`, `QTIPACK_ITEM_NAME_PREFIX`.
pub fn load_config() -> Result<QtipackConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QtipackConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("qtipack.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QtipackConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<QtipackConfig> {
    Ok(toml::from_str(content)?)
}

/// Apply `QTIPACK_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut QtipackConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let flags: [(&str, &mut bool); 3] = [
        ("QTIPACK_STRIP_PREFIXES", &mut config.package.strip_prefixes),
        ("QTIPACK_CONVERT_MATH", &mut config.package.convert_math),
        ("QTIPACK_SHUFFLE", &mut config.package.shuffle),
    ];
    for (name, slot) in flags {
        if let Some(value) = lookup(name) {
            *slot = parse_flag(&value).with_context(|| format!("invalid value for {name}"))?;
        }
    }

    if let Some(prefix) = lookup("QTIPACK_ITEM_NAME_PREFIX") {
        config.package.item_name_prefix = prefix;
    }

    Ok(())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{other}'"),
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("qtipack"))
}
