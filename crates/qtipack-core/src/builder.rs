//! Item model builder.
//!
//! Turns one [`QuestionRecord`] into an [`AssessmentItem`]. Choice ids are
//! assigned as `ID_1..ID_n` in source option order.

use crate::error::{PackageError, Result, ValidationReason};
use crate::ids::{IdGenerator, TokenSource, ITEM_PREFIX};
use crate::model::{AssessmentItem, Choice, ItemFeedback, PackageConfig, QuestionRecord};
use crate::normalize::{normalize_general, normalize_option};

/// Identifier of the choice at zero-based position `position`.
pub fn choice_id(position: usize) -> String {
    format!("ID_{}", position + 1)
}

/// Check that a record can become an item, without building it.
pub fn validate_record(index: usize, record: &QuestionRecord) -> Result<()> {
    if record.options.is_empty() {
        return Err(PackageError::Validation {
            index,
            reason: ValidationReason::EmptyOptions,
        });
    }
    if !record.options.iter().any(|o| o.correct) {
        return Err(PackageError::Validation {
            index,
            reason: ValidationReason::NoCorrectOption,
        });
    }
    Ok(())
}

/// Build the item for the record at bank position `index`.
pub fn build_item<S: TokenSource>(
    index: usize,
    record: &QuestionRecord,
    config: &PackageConfig,
    ids: &mut IdGenerator<S>,
) -> Result<AssessmentItem> {
    validate_record(index, record)?;

    let choices: Vec<Choice> = record
        .options
        .iter()
        .enumerate()
        .map(|(position, option)| Choice {
            id: choice_id(position),
            text: normalize_option(&option.text, config.strip_prefixes, config.convert_math),
        })
        .collect();

    let correct_ids: Vec<String> = record
        .options
        .iter()
        .zip(&choices)
        .filter(|(option, _)| option.correct)
        .map(|(_, choice)| choice.id.clone())
        .collect();

    let item = AssessmentItem {
        id: ids.fresh(ITEM_PREFIX)?,
        title: format!("{} {}", config.item_name_prefix, index + 1),
        stem: normalize_general(&record.question, config.convert_math),
        choices,
        correct_ids,
        feedback: ItemFeedback {
            success: normalize_general(&record.success, config.convert_math),
            error: normalize_general(&record.error, config.convert_math),
        },
    };

    tracing::debug!(
        index,
        item_id = %item.id,
        choices = item.choices.len(),
        correct = item.correct_ids.len(),
        "built item"
    );

    Ok(item)
}
