pub mod build;
pub mod init;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use qtipack_core::model::{PackageConfig, QuestionRecord};
use qtipack_core::parser::parse_bank;
use qtipack_package::config::{load_config_from, QtipackConfig};

/// Command-line overrides for [`PackageConfig`].
#[derive(Debug, Args)]
pub struct PackageFlags {
    /// Keep "A) "-style enumerators in option text
    #[arg(long)]
    pub no_strip_prefixes: bool,

    /// Leave single-dollar inline math as written
    #[arg(long)]
    pub no_convert_math: bool,

    /// Ask players to keep choices in source order
    #[arg(long)]
    pub no_shuffle: bool,

    /// Prefix for item titles
    #[arg(long)]
    pub item_name_prefix: Option<String>,
}

impl PackageFlags {
    pub fn apply(self, config: &mut PackageConfig) {
        if self.no_strip_prefixes {
            config.strip_prefixes = false;
        }
        if self.no_convert_math {
            config.convert_math = false;
        }
        if self.no_shuffle {
            config.shuffle = false;
        }
        if let Some(prefix) = self.item_name_prefix {
            config.item_name_prefix = prefix;
        }
    }
}

/// Load the config file and apply command-line flags on top.
pub fn resolve_config(path: Option<PathBuf>, flags: PackageFlags) -> Result<QtipackConfig> {
    let mut config = load_config_from(path.as_deref())?;
    flags.apply(&mut config.package);
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

pub fn read_bank_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read question bank: {}", path.display()))
}

pub fn load_bank(path: &Path) -> Result<Vec<QuestionRecord>> {
    let bytes = read_bank_bytes(path)?;
    parse_bank(&bytes).with_context(|| format!("failed to parse {}", path.display()))
}
