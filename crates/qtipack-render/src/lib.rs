//! qtipack-render — XML rendering for qtipack.
//!
//! Builds documents as a small element tree ([`xml::Element`]) and writes
//! them out with one writer, so item and manifest rendering never deal with
//! escaping or indentation themselves.

pub mod item;
pub mod manifest;
pub mod xml;
