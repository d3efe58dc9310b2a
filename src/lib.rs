//! A library for resolving, normalizing, and deduplicating bibliographic
//! citations.
//!
//! `manubib` turns already-parsed bibliographic records (BibTeX entries as
//! flat field maps) into a deterministically ordered list of citation
//! records keyed by persistent identifier, ready for a static-site
//! citation pipeline.
//!
//! # Pipeline
//!
//! 1. **Normalize**: each raw field map becomes a [`NormalizedRecord`]
//!    with typed, optional slots.
//! 2. **Resolve**: identifier candidates (DOI, PMID, PMCID, arXiv, ISBN,
//!    URL) are validated family by family in a configurable priority
//!    order; the first valid match wins, with the record's own key as a
//!    `raw:` fallback.
//! 3. **Build**: a [`CanonicalCitation`] keyed `family:value`, with a
//!    derived `YYYY-MM-DD` publication date.
//! 4. **Deduplicate**: arXiv preprints whose titles share a long
//!    consecutive word run with a published entry are dropped.
//! 5. **Sort and emit**: newest first, lower-cased titles break ties; the
//!    result is a list of plain serializable [`CitationRecord`]s.
//!
//! # Basic Usage
//!
//! ```rust
//! use manubib::{Converter, RawRecord};
//!
//! let record = RawRecord::new("doe2023", "article")
//!     .with_field("title", "An Example Paper")
//!     .with_field("author", "Doe, John and Smith, Jane")
//!     .with_field("doi", "10.1234/example")
//!     .with_field("year", "2023");
//!
//! let converter = Converter::new();
//! let outcome = converter.convert_record(&record);
//! assert!(outcome.success);
//! assert_eq!(outcome.citation_id(), Some("doi:10.1234/example"));
//! ```
//!
//! # Batch Conversion
//!
//! A batch never aborts because of one bad record: parser-level failures
//! travel through as synthetic failed outcomes.
//!
//! ```rust
//! use manubib::{BatchItem, Converter, RawRecord};
//!
//! let items = vec![
//!     BatchItem::Record(
//!         RawRecord::new("doe2023", "article")
//!             .with_field("title", "An Example Paper")
//!             .with_field("doi", "10.1234/example")
//!             .with_field("year", "2023"),
//!     ),
//!     BatchItem::SourceFailure {
//!         source: "refs/broken.bib".to_string(),
//!         message: "unbalanced braces".to_string(),
//!     },
//! ];
//!
//! let converter = Converter::new();
//! let batch = converter.run(items, vec!["refs/broken.bib".to_string()]);
//! assert_eq!(batch.total, 2);
//! assert_eq!(batch.failed, 1);
//!
//! let emitted = converter.emit(&batch);
//! assert_eq!(emitted.records[0].id, "doi:10.1234/example");
//! ```
//!
//! # Error Handling
//!
//! Per-record problems accumulate as messages on each
//! [`ConversionOutcome`]; nothing panics or fails across record
//! boundaries. The [`ConvertError`] type covers the few fatal conditions:
//! a citation id that violates its construction invariant and
//! configuration loading problems.

use thiserror::Error;

pub mod citation;
pub mod config;
pub mod convert;
pub mod dedupe;
pub mod identifier;
pub mod record;
mod regex;
mod utils;
pub mod validate;

// Reexports
pub use citation::{CanonicalCitation, CitationRecord, PREPRINT_VENUE};
pub use config::ConverterConfig;
pub use convert::{BatchItem, BatchResult, ConversionOutcome, Converter, EmitResult};
pub use dedupe::{ArxivDeduplicator, DEFAULT_MIN_OVERLAP, DedupeOutcome, RemovedDuplicate};
pub use identifier::{
    IdKind, Identifier, extract_arxiv, extract_doi, extract_isbn, extract_pmcid, extract_pmid,
    extract_url, resolve,
};
pub use record::{NormalizedRecord, RawRecord};
pub use validate::{ValidationReport, validate_records};

/// A specialized Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors surfaced by the conversion core.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The constructed citation id did not split into a family prefix and
    /// a non-blank value. The resolver's contract makes this unreachable;
    /// hitting it means a resolver/builder mismatch.
    #[error("Invalid citation id: {0}")]
    InvalidCitationId(String),

    #[error("Unknown identifier family: {0}")]
    UnknownFamily(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
