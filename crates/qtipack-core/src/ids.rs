//! Random identifier generation.
//!
//! Item and feedback identifiers only need to be unique within one package
//! build. [`IdGenerator`] remembers every id it hands out and reports a
//! collision as an error instead of silently retrying.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{PackageError, Result};

/// Prefix for assessment item identifiers.
pub const ITEM_PREFIX: &str = "I";
/// Prefix for modal feedback identifiers.
pub const FEEDBACK_PREFIX: &str = "FB";

/// Source of random tokens.
pub trait TokenSource {
    /// Return a token made only of ASCII letters and digits.
    fn next_token(&mut self) -> String;
}

/// Tokens from random v4 UUIDs in simple (hyphen-free) form.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    fn next_token(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Hands out prefixed identifiers and rejects duplicates.
#[derive(Debug)]
pub struct IdGenerator<S = RandomTokens> {
    source: S,
    issued: HashSet<String>,
}

impl IdGenerator<RandomTokens> {
    pub fn new() -> Self {
        Self::with_source(RandomTokens)
    }
}

impl Default for IdGenerator<RandomTokens> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TokenSource> IdGenerator<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            issued: HashSet::new(),
        }
    }

    /// Generate a new identifier starting with `prefix`.
    ///
    /// The prefix keeps ids valid XML names, which may not start with a digit.
    pub fn fresh(&mut self, prefix: &str) -> Result<String> {
        let id = format!("{prefix}{}", self.source.next_token());
        if !self.issued.insert(id.clone()) {
            return Err(PackageError::IdCollision { id });
        }
        Ok(id)
    }

    /// Number of identifiers issued so far.
    pub fn issued(&self) -> usize {
        self.issued.len()
    }

    /// Whether `id` was issued by this generator.
    pub fn contains(&self, id: &str) -> bool {
        self.issued.contains(id)
    }
}
