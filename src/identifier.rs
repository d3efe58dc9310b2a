//! Identifier families, extraction, and priority resolution.
//!
//! Every citation resolves to one identifier family. The resolver walks a
//! caller-supplied priority list; for each family with a raw candidate on
//! the record it runs the family's extraction cascade, and the first valid
//! match wins. Records with no valid candidate fall back to `raw:{key}`.
//!
//! # Example
//!
//! ```
//! use manubib::{IdKind, NormalizedRecord, RawRecord, resolve};
//!
//! let record = NormalizedRecord::from(
//!     &RawRecord::new("smith2020", "article")
//!         .with_field("doi", "https://doi.org/10.1234/example")
//!         .with_field("pmid", "1234567"),
//! );
//!
//! // The priority list decides, not the families themselves.
//! let id = resolve(&record, &[IdKind::Pmid, IdKind::Doi]).unwrap();
//! assert_eq!(id.kind, IdKind::Pmid);
//! assert_eq!(id.value, "1234567");
//! ```

pub mod extract;

pub use extract::{extract_arxiv, extract_doi, extract_isbn, extract_pmcid, extract_pmid, extract_url};

use crate::ConvertError;
use crate::record::NormalizedRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of identifier families a citation can resolve to.
///
/// `Raw` is the key-based fallback; it never appears as a resolution
/// candidate in a priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    Doi,
    Pmid,
    Pmcid,
    Arxiv,
    Isbn,
    Url,
    Raw,
}

impl IdKind {
    /// The lowercase family name used as the citation id prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            IdKind::Doi => "doi",
            IdKind::Pmid => "pmid",
            IdKind::Pmcid => "pmcid",
            IdKind::Arxiv => "arxiv",
            IdKind::Isbn => "isbn",
            IdKind::Url => "url",
            IdKind::Raw => "raw",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "doi" => Ok(IdKind::Doi),
            "pmid" => Ok(IdKind::Pmid),
            "pmcid" => Ok(IdKind::Pmcid),
            "arxiv" => Ok(IdKind::Arxiv),
            "isbn" => Ok(IdKind::Isbn),
            "url" => Ok(IdKind::Url),
            "raw" => Ok(IdKind::Raw),
            other => Err(ConvertError::UnknownFamily(other.to_string())),
        }
    }
}

/// A validated identifier: a family plus its canonical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub kind: IdKind,
    /// Canonical value satisfying the family's validation grammar.
    pub value: String,
}

impl Identifier {
    pub fn new(kind: IdKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// The `family:value` citation id this identifier produces.
    pub fn citation_id(&self) -> String {
        format!("{}:{}", self.kind, self.value)
    }
}

/// Resolves a record to its best identifier under the given priority order.
///
/// Families are tried strictly in priority order; the first family whose
/// raw candidate passes its extraction cascade wins, with no comparison
/// among later matches. Families absent from the list are never tried.
/// When nothing matches, a non-blank record key resolves to `raw:{key}`;
/// a blank key means the record has no usable identifier.
pub fn resolve(record: &NormalizedRecord, priority: &[IdKind]) -> Option<Identifier> {
    for &kind in priority {
        let Some(candidate) = record.candidate(kind) else {
            continue;
        };
        if candidate.trim().is_empty() {
            continue;
        }
        let extracted = match kind {
            IdKind::Doi => extract_doi(candidate),
            IdKind::Pmid => extract_pmid(candidate),
            IdKind::Pmcid => extract_pmcid(candidate),
            IdKind::Arxiv => extract_arxiv(candidate),
            IdKind::Isbn => extract_isbn(candidate),
            IdKind::Url => extract_url(candidate),
            IdKind::Raw => None,
        };
        if extracted.is_some() {
            return extracted;
        }
    }

    let key = record.key.trim();
    (!key.is_empty()).then(|| Identifier::new(IdKind::Raw, key))
}
