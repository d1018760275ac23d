//! Package build error types.
//!
//! Every failure aborts the whole build; there is no partial package. The
//! variants are grouped by [`ErrorKind`] so callers can tell bad input apart
//! from internal faults without string matching.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while compiling a question bank into a package.
#[derive(Debug, Error)]
pub enum PackageError {
    /// The input is not valid JSON, or its top level is not an array.
    #[error("invalid question bank: {0}")]
    InvalidBank(#[source] serde_json::Error),

    /// One element of the bank could not be read as a question record.
    #[error("question {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A record parsed but cannot become a valid item.
    #[error("question {index}: {reason}")]
    Validation {
        index: usize,
        reason: ValidationReason,
    },

    /// Two package entries resolved to the same filename.
    #[error("duplicate package file: {filename}")]
    DuplicateFile { filename: String },

    /// The random id generator returned an id already issued in this build.
    #[error("generated identifier collision: {id}")]
    IdCollision { id: String },

    /// An internal invariant was violated while rendering an item.
    #[error("cannot serialize item {item_id}: {message}")]
    Serialization { item_id: String, message: String },

    /// Writing the archive failed.
    #[error("archive write failed: {0}")]
    Archive(#[from] std::io::Error),
}

/// Why a record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// The `options` sequence is empty.
    EmptyOptions,
    /// No option is flagged correct, so the item could never be answered correctly.
    NoCorrectOption,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::EmptyOptions => write!(f, "options list is empty"),
            ValidationReason::NoCorrectOption => write!(f, "no option is marked correct"),
        }
    }
}

/// Coarse classification of a [`PackageError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputParse,
    Validation,
    Serialization,
    Archive,
}

impl PackageError {
    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PackageError::InvalidBank(_) | PackageError::InvalidRecord { .. } => {
                ErrorKind::InputParse
            }
            PackageError::Validation { .. } | PackageError::DuplicateFile { .. } => {
                ErrorKind::Validation
            }
            PackageError::IdCollision { .. } | PackageError::Serialization { .. } => {
                ErrorKind::Serialization
            }
            PackageError::Archive(_) => ErrorKind::Archive,
        }
    }

    /// Returns the offending bank index, if the error is tied to one record.
    pub fn index(&self) -> Option<usize> {
        match self {
            PackageError::InvalidRecord { index, .. } | PackageError::Validation { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_index() {
        let err = PackageError::Validation {
            index: 3,
            reason: ValidationReason::EmptyOptions,
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.index(), Some(3));
        assert_eq!(err.to_string(), "question 3: options list is empty");
    }

    #[test]
    fn duplicate_file_is_validation_without_index() {
        let err = PackageError::DuplicateFile {
            filename: "a.xml".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.index(), None);
    }

    #[test]
    fn collision_is_serialization() {
        let err = PackageError::IdCollision { id: "I1".into() };
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }
}
