//! Core data model types for qtipack.
//!
//! A question bank is a list of [`QuestionRecord`]s. Each record is turned
//! into one [`AssessmentItem`], which is what the renderer serializes.

use serde::{Deserialize, Serialize};

/// One answer option as it appeared in the source bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Raw option text, before normalization.
    pub text: String,
    /// Whether this option belongs to the correct answer set.
    pub correct: bool,
}

impl QuestionOption {
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
        }
    }
}

/// A multiple-answer question read from the input bank.
///
/// Option order is preserved from the source; choice identifiers are assigned
/// from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    /// Question stem.
    pub question: String,
    /// Options in source order.
    pub options: Vec<QuestionOption>,
    /// Feedback shown when the submission is correct.
    pub success: String,
    /// Feedback shown when the submission is incorrect.
    pub error: String,
}

/// One selectable choice inside an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// Identifier unique within the item (`ID_1`, `ID_2`, ...).
    pub id: String,
    /// Normalized option text.
    pub text: String,
}

/// Feedback texts attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFeedback {
    pub success: String,
    pub error: String,
}

/// A fully built, immutable assessment item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentItem {
    /// Random identifier, unique within the package.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Normalized question text.
    pub stem: String,
    /// Choices in source order.
    pub choices: Vec<Choice>,
    /// Identifiers of the correct choices, in choice order.
    pub correct_ids: Vec<String>,
    /// Normalized feedback texts.
    pub feedback: ItemFeedback,
}

impl AssessmentItem {
    /// Filename of this item's document inside the package.
    pub fn filename(&self) -> String {
        format!("{}.xml", self.id)
    }

    /// Returns the choice with the given identifier.
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }
}

/// Options controlling how a bank is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Remove `A) `-style enumerators from option text.
    #[serde(default = "default_true")]
    pub strip_prefixes: bool,
    /// Rewrite `$...$` inline math to `$$...$$`.
    #[serde(default = "default_true")]
    pub convert_math: bool,
    /// Ask players to shuffle choices. Stored choice order is unaffected.
    #[serde(default = "default_true")]
    pub shuffle: bool,
    /// Prefix used for item titles.
    #[serde(default = "default_item_name_prefix")]
    pub item_name_prefix: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            strip_prefixes: true,
            convert_math: true,
            shuffle: true,
            item_name_prefix: default_item_name_prefix(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_item_name_prefix() -> String {
    "Item".to_string()
}
