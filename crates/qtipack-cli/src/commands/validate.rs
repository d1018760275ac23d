//! The `qtipack validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;

use qtipack_core::ids::IdGenerator;
use qtipack_package::{compile_bank, CompiledBank, CompiledItem};

use super::{load_bank, resolve_config, PackageFlags};

const STEM_WIDTH: usize = 48;

pub fn execute(bank_path: PathBuf, config_path: Option<PathBuf>, flags: PackageFlags) -> Result<()> {
    let config = resolve_config(config_path, flags)?;
    let records = load_bank(&bank_path)?;

    let bank = compile_bank(&records, &config.package, &mut IdGenerator::new())
        .with_context(|| format!("invalid question bank: {}", bank_path.display()))?;

    print_table(&bank);
    println!("{} question(s) valid.", bank.items.len());

    Ok(())
}

fn print_table(bank: &CompiledBank) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Title", "Choices", "Correct", "Stem"]);

    for compiled in &bank.items {
        table.add_row(item_row(compiled));
    }

    println!("{table}");
}

fn item_row(compiled: &CompiledItem) -> Vec<String> {
    let item = &compiled.item;
    vec![
        compiled.index.to_string(),
        item.title.clone(),
        item.choices.len().to_string(),
        item.correct_ids.len().to_string(),
        truncate(&item.stem, STEM_WIDTH),
    ]
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let head: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
