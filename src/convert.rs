//! Batch conversion orchestration.
//!
//! Drives each record through normalization, identifier resolution, and
//! citation construction, collecting exactly one outcome per input. A bad
//! record, or a source the upstream parser could not handle at all, never
//! aborts the batch.

use crate::citation::{CanonicalCitation, CitationRecord};
use crate::config::ConverterConfig;
use crate::dedupe::{ArxivDeduplicator, RemovedDuplicate};
use crate::identifier::resolve;
use crate::record::{NormalizedRecord, RawRecord};
use std::time::{Duration, Instant};

/// One unit of work for a conversion run.
#[derive(Debug, Clone)]
pub enum BatchItem {
    /// A record the upstream parser produced.
    Record(RawRecord),
    /// A source the upstream parser could not handle; recorded as a failed
    /// outcome keyed by the source identifier.
    SourceFailure {
        /// Identifier of the offending source (file path, fetch URL, ...).
        source: String,
        message: String,
    },
}

/// Per-record conversion result.
///
/// A record either succeeds with exactly one citation or fails with at
/// least one error; warnings can accompany either.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Citation key of the input record, or `FILE:{source}` for a
    /// parser-level failure.
    pub key: String,
    pub success: bool,
    pub citation: Option<CanonicalCitation>,
    /// Failure reasons, in the order they were hit.
    pub errors: Vec<String>,
    /// Missing-but-nonfatal field notes.
    pub warnings: Vec<String>,
}

impl ConversionOutcome {
    fn succeeded(key: String, citation: CanonicalCitation, warnings: Vec<String>) -> Self {
        Self {
            key,
            success: true,
            citation: Some(citation),
            errors: Vec::new(),
            warnings,
        }
    }

    fn failed(key: String, error: String) -> Self {
        Self {
            key,
            success: false,
            citation: None,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    /// Citation id of a successful outcome.
    pub fn citation_id(&self) -> Option<&str> {
        self.citation.as_ref().map(|citation| citation.id.as_str())
    }
}

/// Aggregate result of one conversion run.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Provenance of the converted sources.
    pub sources: Vec<String>,
    /// One outcome per input item, in input order.
    pub outcomes: Vec<ConversionOutcome>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl BatchResult {
    /// Share of successful conversions, as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.succeeded as f64 / self.total as f64 * 100.0
    }
}

/// The final, ordered citation list plus the duplicate-removal log.
#[derive(Debug, Clone)]
pub struct EmitResult {
    pub records: Vec<CitationRecord>,
    pub removed: Vec<RemovedDuplicate>,
}

/// Converts batches of raw records into ordered citation lists.
///
/// # Examples
///
/// ```
/// use manubib::{Converter, RawRecord};
///
/// let converter = Converter::new();
/// let outcome = converter.convert_record(
///     &RawRecord::new("doe2023", "article")
///         .with_field("title", "Test Paper")
///         .with_field("doi", "10.1234/example"),
/// );
/// assert!(outcome.success);
/// assert_eq!(outcome.citation_id(), Some("doi:10.1234/example"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    /// Creates a converter with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a converter with custom configuration.
    #[must_use]
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Converts a single record. Never panics; every failure is recorded
    /// on the returned outcome.
    pub fn convert_record(&self, raw: &RawRecord) -> ConversionOutcome {
        let record = NormalizedRecord::from(raw);

        let Some(identifier) = resolve(&record, &self.config.citation_priority) else {
            return ConversionOutcome::failed(
                record.key,
                "No valid identifier found".to_string(),
            );
        };

        match CanonicalCitation::build(&record, identifier) {
            Ok(citation) => {
                let mut warnings = Vec::new();
                if citation.title.is_none() {
                    warnings.push("No title found".to_string());
                }
                if citation.authors.is_none() {
                    warnings.push("No authors found".to_string());
                }
                if citation.year.is_none() {
                    warnings.push("No publication year found".to_string());
                }
                ConversionOutcome::succeeded(record.key, citation, warnings)
            }
            Err(error) => {
                ConversionOutcome::failed(record.key, format!("Conversion error: {error}"))
            }
        }
    }

    /// Converts every item, collecting one outcome per input.
    ///
    /// A [`BatchItem::SourceFailure`] becomes a failed outcome keyed
    /// `FILE:{source}`; the rest of the batch keeps going.
    pub fn run<I>(&self, items: I, sources: Vec<String>) -> BatchResult
    where
        I: IntoIterator<Item = BatchItem>,
    {
        let start = Instant::now();

        let outcomes: Vec<ConversionOutcome> = items
            .into_iter()
            .map(|item| match item {
                BatchItem::Record(raw) => self.convert_record(&raw),
                BatchItem::SourceFailure { source, message } => ConversionOutcome::failed(
                    format!("FILE:{source}"),
                    format!("Failed to parse source: {message}"),
                ),
            })
            .collect();

        let total = outcomes.len();
        let succeeded = outcomes.iter().filter(|outcome| outcome.success).count();
        let result = BatchResult {
            sources,
            total,
            succeeded,
            failed: total - succeeded,
            outcomes,
            elapsed: start.elapsed(),
        };
        tracing::debug!(
            total = result.total,
            succeeded = result.succeeded,
            failed = result.failed,
            "conversion batch finished"
        );
        result
    }

    /// Convenience wrapper over [`Converter::run`] for already-parsed
    /// records.
    pub fn run_records<I>(&self, records: I, sources: Vec<String>) -> BatchResult
    where
        I: IntoIterator<Item = RawRecord>,
    {
        self.run(records.into_iter().map(BatchItem::Record), sources)
    }

    /// Extracts the successful citations from a batch, removes preprint
    /// duplicates, sorts, and maps to the serialization shape.
    ///
    /// Ordering: newest year first (absent years sort as year 0, i.e.
    /// last), then ascending lower-cased title; remaining ties keep their
    /// original relative order.
    pub fn emit(&self, batch: &BatchResult) -> EmitResult {
        let citations: Vec<CanonicalCitation> = batch
            .outcomes
            .iter()
            .filter(|outcome| outcome.success)
            .filter_map(|outcome| outcome.citation.clone())
            .collect();

        let outcome =
            ArxivDeduplicator::with_min_overlap(self.config.min_title_overlap).filter(citations);

        let mut kept = outcome.citations;
        kept.sort_by(|a, b| {
            b.year
                .unwrap_or(0)
                .cmp(&a.year.unwrap_or(0))
                .then_with(|| {
                    let left = a.title.as_deref().unwrap_or("").to_lowercase();
                    let right = b.title.as_deref().unwrap_or("").to_lowercase();
                    left.cmp(&right)
                })
        });

        EmitResult {
            records: kept
                .iter()
                .map(|citation| citation.to_record(self.config.include_metadata))
                .collect(),
            removed: outcome.removed,
        }
    }
}
