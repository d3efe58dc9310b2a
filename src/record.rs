//! Raw bibliographic records and the normalization pass.
//!
//! The upstream parser hands the core a flat field map per entry; a single
//! normalization pass maps it onto a fixed-shape record with explicit
//! optional slots, so nothing downstream touches string-keyed fields again.

use crate::identifier::IdKind;
use crate::utils::{clean_field, format_pages, parse_author_list};
use std::collections::HashMap;

/// A parsed bibliographic entry as delivered by an upstream parser.
///
/// Field names are matched case-insensitively during normalization, so the
/// parser does not need to lower-case them first.
///
/// # Examples
///
/// ```
/// use manubib::{NormalizedRecord, RawRecord};
///
/// let raw = RawRecord::new("doe2023", "article")
///     .with_field("title", "An Example Paper")
///     .with_field("author", "Doe, John")
///     .with_field("year", "2023");
///
/// let record = NormalizedRecord::from(&raw);
/// assert_eq!(record.title.as_deref(), Some("An Example Paper"));
/// assert_eq!(record.year, Some(2023));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// The entry's citation key.
    pub key: String,
    /// The entry type tag (`article`, `inproceedings`, ...).
    pub entry_type: String,
    /// Flat field-name to raw-value mapping.
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    /// Creates a record with an empty field map.
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into(),
            fields: HashMap::new(),
        }
    }

    /// Adds a field value, returning the record for chaining.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// A [`RawRecord`] mapped onto typed, optional slots.
///
/// Missing fields are represented as `None`; normalization never fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    pub key: String,
    /// Lower-cased entry type; `misc` when the source left it blank.
    pub entry_type: String,
    pub title: Option<String>,
    /// Display names in source order; `Some` is never empty and every name
    /// is non-blank.
    pub authors: Option<Vec<String>>,
    /// Journal name, or the conference/book title when no journal is given.
    pub venue: Option<String>,
    pub year: Option<i32>,
    /// Raw month string, validated later during date derivation.
    pub month: Option<String>,
    /// Raw day string, validated later during date derivation.
    pub day: Option<String>,
    pub volume: Option<String>,
    /// BibTeX `number` field.
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub publisher: Option<String>,
    pub doi: Option<String>,
    pub pmid: Option<String>,
    pub pmcid: Option<String>,
    /// From the `arxiv` field, else the `eprint` field.
    pub arxiv: Option<String>,
    pub isbn: Option<String>,
    pub url: Option<String>,
}

impl NormalizedRecord {
    /// Raw identifier candidate for a family, if the record carries one.
    ///
    /// [`IdKind::Raw`] has no candidate field; the record key serves as the
    /// resolver's fallback instead.
    pub fn candidate(&self, kind: IdKind) -> Option<&str> {
        match kind {
            IdKind::Doi => self.doi.as_deref(),
            IdKind::Pmid => self.pmid.as_deref(),
            IdKind::Pmcid => self.pmcid.as_deref(),
            IdKind::Arxiv => self.arxiv.as_deref(),
            IdKind::Isbn => self.isbn.as_deref(),
            IdKind::Url => self.url.as_deref(),
            IdKind::Raw => None,
        }
    }
}

impl From<&RawRecord> for NormalizedRecord {
    fn from(raw: &RawRecord) -> Self {
        let fields: HashMap<String, &str> = raw
            .fields
            .iter()
            .map(|(name, value)| (name.to_lowercase(), value.as_str()))
            .collect();

        let get = |name: &str| {
            fields
                .get(name)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };
        let cleaned = |name: &str| get(name).map(clean_field).filter(|value| !value.is_empty());

        let authors = get("author")
            .map(parse_author_list)
            .filter(|names| !names.is_empty());

        let year = get("year")
            .filter(|value| value.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|value| value.parse().ok());

        let entry_type = raw.entry_type.trim().to_lowercase();

        Self {
            key: raw.key.trim().to_string(),
            entry_type: if entry_type.is_empty() {
                "misc".to_string()
            } else {
                entry_type
            },
            title: cleaned("title"),
            authors,
            venue: cleaned("journal").or_else(|| cleaned("booktitle")),
            year,
            month: get("month").map(str::to_string),
            day: get("day").map(str::to_string),
            volume: get("volume").map(str::to_string),
            issue: get("number").map(str::to_string),
            pages: get("pages").and_then(format_pages),
            publisher: cleaned("publisher"),
            doi: get("doi").map(str::to_string),
            pmid: get("pmid").map(str::to_string),
            pmcid: get("pmcid").map(str::to_string),
            arxiv: get("arxiv").or_else(|| get("eprint")).map(str::to_string),
            isbn: get("isbn").map(str::to_string),
            url: get("url").map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_common_fields() {
        let raw = RawRecord::new("doe2023", "Article")
            .with_field("title", "{An Example Paper}")
            .with_field("author", "Doe, John and Smith, Jane")
            .with_field("journal", "Nature")
            .with_field("year", "2023")
            .with_field("volume", "12")
            .with_field("number", "3")
            .with_field("pages", "100--110")
            .with_field("publisher", "Springer")
            .with_field("doi", "10.1234/example");

        let record = NormalizedRecord::from(&raw);
        assert_eq!(record.key, "doe2023");
        assert_eq!(record.entry_type, "article");
        assert_eq!(record.title.as_deref(), Some("An Example Paper"));
        assert_eq!(
            record.authors,
            Some(vec!["John Doe".to_string(), "Jane Smith".to_string()])
        );
        assert_eq!(record.venue.as_deref(), Some("Nature"));
        assert_eq!(record.year, Some(2023));
        assert_eq!(record.volume.as_deref(), Some("12"));
        assert_eq!(record.issue.as_deref(), Some("3"));
        assert_eq!(record.pages.as_deref(), Some("100-110"));
        assert_eq!(record.publisher.as_deref(), Some("Springer"));
        assert_eq!(record.doi.as_deref(), Some("10.1234/example"));
    }

    #[test]
    fn test_normalize_case_insensitive_lookup() {
        let raw = RawRecord::new("k", "article")
            .with_field("Title", "Mixed Case Field Names")
            .with_field("YEAR", "2020");

        let record = NormalizedRecord::from(&raw);
        assert_eq!(record.title.as_deref(), Some("Mixed Case Field Names"));
        assert_eq!(record.year, Some(2020));
    }

    #[test]
    fn test_normalize_year_requires_digits() {
        for bad in ["2023a", "circa 2000", "19-99", "MMXX", ""] {
            let raw = RawRecord::new("k", "misc").with_field("year", bad);
            assert_eq!(NormalizedRecord::from(&raw).year, None, "year: {bad:?}");
        }
    }

    #[test]
    fn test_normalize_venue_falls_back_to_booktitle() {
        let raw = RawRecord::new("k", "inproceedings")
            .with_field("booktitle", "Proceedings of NeurIPS");
        assert_eq!(
            NormalizedRecord::from(&raw).venue.as_deref(),
            Some("Proceedings of NeurIPS")
        );

        let raw = RawRecord::new("k", "article")
            .with_field("journal", "JMLR")
            .with_field("booktitle", "Ignored");
        assert_eq!(NormalizedRecord::from(&raw).venue.as_deref(), Some("JMLR"));
    }

    #[test]
    fn test_normalize_arxiv_prefers_arxiv_over_eprint() {
        let raw = RawRecord::new("k", "misc")
            .with_field("arxiv", "2301.12345")
            .with_field("eprint", "1111.22222");
        assert_eq!(
            NormalizedRecord::from(&raw).arxiv.as_deref(),
            Some("2301.12345")
        );

        let raw = RawRecord::new("k", "misc").with_field("eprint", "1905.07890");
        assert_eq!(
            NormalizedRecord::from(&raw).arxiv.as_deref(),
            Some("1905.07890")
        );
    }

    #[test]
    fn test_normalize_blank_authors_dropped() {
        let raw = RawRecord::new("k", "misc").with_field("author", "   ");
        assert_eq!(NormalizedRecord::from(&raw).authors, None);
    }

    #[test]
    fn test_normalize_blank_entry_type_defaults_to_misc() {
        let raw = RawRecord::new("k", "  ");
        assert_eq!(NormalizedRecord::from(&raw).entry_type, "misc");
    }

    #[test]
    fn test_candidate_lookup() {
        let raw = RawRecord::new("k", "misc")
            .with_field("doi", "10.1234/example")
            .with_field("pmid", "1234567");
        let record = NormalizedRecord::from(&raw);

        assert_eq!(record.candidate(IdKind::Doi), Some("10.1234/example"));
        assert_eq!(record.candidate(IdKind::Pmid), Some("1234567"));
        assert_eq!(record.candidate(IdKind::Isbn), None);
        assert_eq!(record.candidate(IdKind::Raw), None);
    }
}
