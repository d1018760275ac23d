//! qtipack-package — Build a QTI 2.1 content package from a question bank.
//!
//! The pipeline runs per record (build item, draw feedback ids, synthesize
//! response processing, render XML), then builds the manifest over all item
//! filenames and writes everything into an in-memory zip archive. Any failure
//! aborts the build; no archive bytes are returned for a partial bank.

pub mod config;

use std::io::{self, Cursor, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use qtipack_core::builder::build_item;
use qtipack_core::error::Result;
use qtipack_core::ids::{IdGenerator, TokenSource};
use qtipack_core::model::{AssessmentItem, PackageConfig, QuestionRecord};
use qtipack_core::parser::parse_bank;
use qtipack_core::rules::{synthesize, FeedbackIds, ResponseProcessing};
use qtipack_render::item::render_item;
use qtipack_render::manifest::{build_manifest, Manifest, MANIFEST_FILENAME};

/// One record after rendering.
#[derive(Debug, Clone)]
pub struct CompiledItem {
    /// Position in the bank.
    pub index: usize,
    pub item: AssessmentItem,
    pub feedback: FeedbackIds,
    pub processing: ResponseProcessing,
    /// The serialized item document.
    pub xml: String,
}

impl CompiledItem {
    pub fn filename(&self) -> String {
        self.item.filename()
    }
}

/// Every item of a bank plus the manifest that indexes them.
#[derive(Debug, Clone)]
pub struct CompiledBank {
    pub items: Vec<CompiledItem>,
    pub manifest: Manifest,
}

/// Summary of one item inside a finished package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagedItem {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub filename: String,
}

/// A finished package. The caller owns the archive bytes.
#[derive(Debug, Clone)]
pub struct Package {
    /// Zip archive contents.
    pub bytes: Vec<u8>,
    /// Items in bank order.
    pub items: Vec<PackagedItem>,
    pub created_at: DateTime<Utc>,
}

/// Compile one record into its rendered item.
pub fn compile_record<S: TokenSource>(
    index: usize,
    record: &QuestionRecord,
    config: &PackageConfig,
    ids: &mut IdGenerator<S>,
) -> Result<CompiledItem> {
    let item = build_item(index, record, config, ids)?;
    let feedback = FeedbackIds::generate(ids)?;
    let processing = synthesize(&item.correct_ids, &feedback);
    let xml = render_item(&item, &processing, &feedback, config.shuffle)?.to_xml();

    Ok(CompiledItem {
        index,
        item,
        feedback,
        processing,
        xml,
    })
}

/// Compile every record and build the manifest, without writing an archive.
pub fn compile_bank<S: TokenSource>(
    records: &[QuestionRecord],
    config: &PackageConfig,
    ids: &mut IdGenerator<S>,
) -> Result<CompiledBank> {
    let items = records
        .iter()
        .enumerate()
        .map(|(index, record)| compile_record(index, record, config, ids))
        .collect::<Result<Vec<_>>>()?;

    let manifest = build_manifest(items.iter().map(CompiledItem::filename))?;

    Ok(CompiledBank { items, manifest })
}

/// Build a package from parsed records.
pub fn build_package(records: &[QuestionRecord], config: &PackageConfig) -> Result<Package> {
    build_package_with(records, config, &mut IdGenerator::new())
}

/// Build a package from parsed records using the given id generator.
pub fn build_package_with<S: TokenSource>(
    records: &[QuestionRecord],
    config: &PackageConfig,
    ids: &mut IdGenerator<S>,
) -> Result<Package> {
    let bank = compile_bank(records, config, ids)?;
    let bytes = write_archive(&bank)?;

    tracing::info!(
        items = bank.items.len(),
        bytes = bytes.len(),
        "assembled package"
    );

    let items = bank
        .items
        .into_iter()
        .map(|c| PackagedItem {
            index: c.index,
            filename: c.item.filename(),
            id: c.item.id,
            title: c.item.title,
        })
        .collect();

    Ok(Package {
        bytes,
        items,
        created_at: Utc::now(),
    })
}

/// Parse a JSON question bank and build its package.
pub fn build_package_from_json(bytes: &[u8], config: &PackageConfig) -> Result<Package> {
    let records = parse_bank(bytes)?;
    tracing::debug!(records = records.len(), "parsed question bank");
    build_package(&records, config)
}

/// Write item documents in bank order, then the manifest.
fn write_archive(bank: &CompiledBank) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for compiled in &bank.items {
        add_file(&mut writer, &compiled.filename(), &compiled.xml, options)?;
    }
    add_file(
        &mut writer,
        MANIFEST_FILENAME,
        &bank.manifest.to_document().to_xml(),
        options,
    )?;

    let cursor = writer.finish().map_err(io::Error::from)?;
    Ok(cursor.into_inner())
}

fn add_file(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    contents: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    writer.start_file(name, options).map_err(io::Error::from)?;
    writer.write_all(contents.as_bytes())?;
    Ok(())
}
