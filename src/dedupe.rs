//! Preprint/published duplicate removal.
//!
//! An arXiv preprint frequently coexists with its published version in the
//! same bibliography. Preprint-flagged entries are compared against
//! published entries by the longest run of identical consecutive title
//! words; a sufficiently long shared run removes the preprint.
//!
//! This is a heuristic: two unrelated papers sharing a long generic phrase
//! can collide, and a retitled published version will be missed.
//!
//! # Example
//!
//! ```
//! use manubib::{ArxivDeduplicator, Converter, RawRecord};
//!
//! let converter = Converter::new();
//! let preprint = converter
//!     .convert_record(
//!         &RawRecord::new("doe2023arxiv", "article")
//!             .with_field("title", "Robust Training of Deep Networks at Scale")
//!             .with_field("journal", "CoRR")
//!             .with_field("eprint", "2301.12345"),
//!     )
//!     .citation
//!     .unwrap();
//! let published = converter
//!     .convert_record(
//!         &RawRecord::new("doe2023", "article")
//!             .with_field("title", "Robust Training of Deep Networks at Scale")
//!             .with_field("journal", "JMLR")
//!             .with_field("doi", "10.1234/example"),
//!     )
//!     .citation
//!     .unwrap();
//!
//! let outcome = ArxivDeduplicator::new().filter(vec![preprint, published]);
//! assert_eq!(outcome.citations.len(), 1);
//! assert_eq!(outcome.removed.len(), 1);
//! ```

use crate::citation::CanonicalCitation;
use either::Either;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;

/// Default number of consecutive shared title words that marks a duplicate.
pub const DEFAULT_MIN_OVERLAP: usize = 6;

/// Removes preprint entries whose titles duplicate a published entry's.
#[derive(Debug, Clone)]
pub struct ArxivDeduplicator {
    min_overlap: usize,
}

impl Default for ArxivDeduplicator {
    fn default() -> Self {
        Self {
            min_overlap: DEFAULT_MIN_OVERLAP,
        }
    }
}

/// A preprint entry removed in favor of a published version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovedDuplicate {
    /// Citation id of the removed preprint.
    pub id: String,
    pub preprint_title: String,
    /// Title of the published entry that triggered the removal.
    pub published_title: String,
    /// Length of the shared word run.
    pub overlap: usize,
}

/// Result of a duplicate-removal pass.
#[derive(Debug, Clone)]
pub struct DedupeOutcome {
    /// Surviving citations, input order preserved.
    pub citations: Vec<CanonicalCitation>,
    /// One event per removed preprint.
    pub removed: Vec<RemovedDuplicate>,
}

impl ArxivDeduplicator {
    /// Creates a deduplicator with the default overlap threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a deduplicator with a custom overlap threshold.
    #[must_use]
    pub fn with_min_overlap(min_overlap: usize) -> Self {
        Self { min_overlap }
    }

    /// Filters out preprints whose title shares a run of at least
    /// `min_overlap` consecutive words with some published entry's title.
    ///
    /// Titles are compared as lower-case alphanumeric word tokens. The scan
    /// for a preprint stops at its first qualifying published entry, and
    /// published entries are visited in input order, so removal is
    /// deterministic for a given input sequence. Kept citations come back
    /// unmodified, in their original order.
    pub fn filter(&self, citations: Vec<CanonicalCitation>) -> DedupeOutcome {
        let (preprints, published): (Vec<usize>, Vec<usize>) =
            citations
                .iter()
                .enumerate()
                .partition_map(|(index, citation)| {
                    if citation.preprint {
                        Either::Left(index)
                    } else {
                        Either::Right(index)
                    }
                });

        let published_tokens: Vec<(usize, Vec<String>)> = published
            .into_iter()
            .filter_map(|index| {
                let tokens = title_tokens(citations[index].title.as_deref()?);
                (!tokens.is_empty()).then_some((index, tokens))
            })
            .collect();

        let mut removed = Vec::new();
        let mut removed_indices = HashSet::new();

        for index in preprints {
            let Some(title) = citations[index]
                .title
                .as_deref()
                .filter(|title| !title.trim().is_empty())
            else {
                continue;
            };
            let tokens = title_tokens(title);

            for (published_index, published) in &published_tokens {
                let overlap = longest_common_run(&tokens, published);
                if overlap >= self.min_overlap {
                    let event = RemovedDuplicate {
                        id: citations[index].id.clone(),
                        preprint_title: title.to_string(),
                        published_title: citations[*published_index]
                            .title
                            .clone()
                            .unwrap_or_default(),
                        overlap,
                    };
                    tracing::debug!(
                        id = %event.id,
                        overlap = event.overlap,
                        "removing preprint duplicate"
                    );
                    removed.push(event);
                    removed_indices.insert(index);
                    break;
                }
            }
        }

        let citations = citations
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !removed_indices.contains(index))
            .map(|(_, citation)| citation)
            .collect();

        DedupeOutcome { citations, removed }
    }
}

/// Lower-case alphanumeric word tokens; any other character separates.
fn title_tokens(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Longest run of identical consecutive words between two token sequences,
/// found by extending a match from every starting pair. Quadratic in token
/// counts, which stays trivial at title lengths.
fn longest_common_run(left: &[String], right: &[String]) -> usize {
    let mut best = 0;
    for i in 0..left.len() {
        for j in 0..right.len() {
            let mut run = 0;
            while i + run < left.len() && j + run < right.len() && left[i + run] == right[j + run] {
                run += 1;
            }
            best = best.max(run);
        }
    }
    best
}
