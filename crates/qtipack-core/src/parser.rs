//! JSON question bank parser.
//!
//! The bank is a JSON array of records. Options are usually given as a JSON
//! object mapping option text to a correctness flag; object key order is the
//! choice order, so options are read through a visitor that keeps document
//! order instead of going through a map type.

use std::fmt;

use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{PackageError, Result};
use crate::model::{QuestionOption, QuestionRecord};

/// Intermediate JSON structure for one bank element.
#[derive(Debug, Deserialize)]
struct JsonQuestion {
    question: String,
    options: OrderedOptions,
    #[serde(default)]
    success: String,
    #[serde(default)]
    error: String,
}

/// Options in the order they appear in the document.
#[derive(Debug)]
struct OrderedOptions(Vec<QuestionOption>);

impl<'de> Deserialize<'de> for OrderedOptions {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OptionsVisitor)
    }
}

struct OptionsVisitor;

impl<'de> Visitor<'de> for OptionsVisitor {
    type Value = OrderedOptions;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of option text to boolean, or an array of [text, boolean] pairs")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut options = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((text, correct)) = map.next_entry::<String, bool>()? {
            push_option(&mut options, text, correct);
        }
        Ok(OrderedOptions(options))
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut options = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some((text, correct)) = seq.next_element::<(String, bool)>()? {
            push_option(&mut options, text, correct);
        }
        Ok(OrderedOptions(options))
    }
}

/// A repeated key keeps its first position and takes the last flag.
fn push_option(options: &mut Vec<QuestionOption>, text: String, correct: bool) {
    if let Some(existing) = options.iter_mut().find(|o| o.text == text) {
        tracing::warn!(option = %text, "duplicate option text, keeping the last flag");
        existing.correct = correct;
    } else {
        options.push(QuestionOption { text, correct });
    }
}

/// Parse a question bank from raw JSON bytes.
///
/// Fails with [`PackageError::InvalidBank`] when the input is not a JSON
/// array, and with [`PackageError::InvalidRecord`] naming the first element
/// that is not a valid record.
pub fn parse_bank(bytes: &[u8]) -> Result<Vec<QuestionRecord>> {
    let elements: Vec<Box<RawValue>> =
        serde_json::from_slice(bytes).map_err(PackageError::InvalidBank)?;

    elements
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_record(index, raw))
        .collect()
}

/// Parse a question bank from a JSON string.
pub fn parse_bank_str(content: &str) -> Result<Vec<QuestionRecord>> {
    parse_bank(content.as_bytes())
}

fn parse_record(index: usize, raw: &RawValue) -> Result<QuestionRecord> {
    let _span = tracing::debug_span!("record", index).entered();

    let parsed: JsonQuestion = serde_json::from_str(raw.get())
        .map_err(|source| PackageError::InvalidRecord { index, source })?;

    Ok(QuestionRecord {
        question: parsed.question,
        options: parsed.options.0,
        success: parsed.success,
        error: parsed.error,
    })
}
