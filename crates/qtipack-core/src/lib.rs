//! qtipack-core — Question bank model, normalization, and grading rules.
//!
//! This crate defines the data model that the rest of qtipack builds on:
//! question records parsed from JSON, immutable assessment items, and the
//! response processing tree that decides how a submission is scored.

pub mod builder;
pub mod error;
pub mod ids;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod rules;
