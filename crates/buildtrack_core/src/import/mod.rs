//! Document-to-task import pipeline.
//!
//! # Responsibility
//! - Turn semi-structured task documents and spreadsheet rows into
//!   canonical task records ready for bulk insertion.
//!
//! # Invariants
//! - Pure and synchronous: no I/O, no shared state, safe to call from any
//!   thread on independent inputs.
//! - Output order follows source block/row order.
//! - Malformed content degrades to defaults or skipped blocks; it never
//!   fails the whole parse.
//!
//! Data flow: bytes -> [`ImportSource`] -> document or tabular extractor ->
//! raw field maps -> normalizer -> records.

pub mod document;
pub mod fields;
pub mod normalize;
pub mod source;
pub mod splitter;
pub mod tabular;

use log::info;

pub use normalize::NormalizedBatch as ImportBatch;
pub use source::{ImportFormat, ImportSource, SourceError, TextRun};

/// Parses either input shape into normalized records.
///
/// An empty `records` list is not an error here; callers decide whether it
/// is user-facing.
pub fn parse_source(source: &ImportSource) -> ImportBatch {
    let (shape, batch) = match source {
        ImportSource::Text(text) => ("text", document::parse_document_batch(text)),
        ImportSource::Grid(rows) => ("grid", tabular::parse_grid_batch(rows)),
    };
    info!(
        "event=import_parse module=import status=ok shape={} records={} rejected={}",
        shape,
        batch.records.len(),
        batch.rejected
    );
    batch
}

