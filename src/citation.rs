//! Canonical citation construction and the serialized record shape.

use crate::identifier::{IdKind, Identifier};
use crate::record::NormalizedRecord;
use crate::{ConvertError, Result};
use serde::{Deserialize, Serialize};

/// Venue label DBLP assigns to arXiv preprints (Computing Research
/// Repository).
pub const PREPRINT_VENUE: &str = "CoRR";

const DEFAULT_MONTH: u32 = 6;
const DEFAULT_DAY: u32 = 15;

const MONTH_NAMES: [(&str, u32); 24] = [
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sep", 9),
    ("sept", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

/// A normalized citation keyed by `family:value`, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalCitation {
    /// `family:value`; the prefix before the first colon is the family name.
    pub id: String,
    pub kind: IdKind,
    /// The identifier value the id was built from.
    pub value: String,
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    /// Journal or conference/book title.
    pub venue: Option<String>,
    pub year: Option<i32>,
    /// Derived publication date, `YYYY-MM-DD`.
    pub date: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub publisher: Option<String>,
    /// Outbound link (the record's URL field).
    pub link: Option<String>,
    /// Whether the entry is sourced from a preprint repository; set when
    /// the venue carries the [`PREPRINT_VENUE`] label or the identifier
    /// family is arXiv.
    pub preprint: bool,
    /// Citation key of the source entry.
    pub source_key: String,
    /// Entry type of the source entry.
    pub source_type: String,
}

impl CanonicalCitation {
    /// Combines a normalized record with its resolved identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidCitationId`] when the constructed id
    /// does not split into the family prefix and a non-blank value. The
    /// resolver never produces such an identifier, so hitting this error
    /// signals a resolver/builder contract violation.
    pub fn build(record: &NormalizedRecord, identifier: Identifier) -> Result<Self> {
        let id = identifier.citation_id();
        match id.split_once(':') {
            Some((family, value))
                if family == identifier.kind.as_str() && !value.trim().is_empty() => {}
            _ => return Err(ConvertError::InvalidCitationId(id)),
        }

        let date = record
            .year
            .map(|year| publication_date(year, record.month.as_deref(), record.day.as_deref()));
        let preprint = identifier.kind == IdKind::Arxiv
            || record.venue.as_deref() == Some(PREPRINT_VENUE);

        Ok(Self {
            id,
            kind: identifier.kind,
            value: identifier.value,
            title: record.title.clone(),
            authors: record.authors.clone(),
            venue: record.venue.clone(),
            year: record.year,
            date,
            volume: record.volume.clone(),
            issue: record.issue.clone(),
            pages: record.pages.clone(),
            publisher: record.publisher.clone(),
            link: record.url.clone(),
            preprint,
            source_key: record.key.clone(),
            source_type: record.entry_type.clone(),
        })
    }

    /// Maps the citation onto the downstream serialization shape.
    ///
    /// `publisher` carries the journal/venue name and `link` the source
    /// URL, matching the attribute names the static-site pipeline expects.
    /// When `include_metadata` is false only `id` and `type` are populated.
    pub fn to_record(&self, include_metadata: bool) -> CitationRecord {
        let mut record = CitationRecord {
            id: self.id.clone(),
            kind: self.kind.as_str().to_string(),
            title: None,
            authors: None,
            publisher: None,
            year: None,
            date: None,
            link: None,
        };
        if include_metadata {
            record.title = self.title.clone();
            record.authors = self.authors.clone();
            record.publisher = self.venue.clone();
            record.year = self.year;
            record.date = self.date.clone();
            record.link = self.link.clone();
        }
        record
    }
}

/// The plain attribute-name shape handed to the downstream serializer.
///
/// Absent fields are skipped during serialization, so a metadata-less
/// record serializes as just `id` and `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    pub id: String,
    /// The identifier family name.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    /// Journal or venue name, renamed for the consuming site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Derives a `YYYY-MM-DD` date from the year and raw month/day strings.
///
/// Month accepts full or abbreviated English names or a numeric 1-12; day
/// accepts a numeric 1-31. Absent or unparseable parts default to 06/15.
/// A day that overruns its month is clamped to the month's last day.
pub(crate) fn publication_date(year: i32, month: Option<&str>, day: Option<&str>) -> String {
    let month = month.and_then(parse_month).unwrap_or(DEFAULT_MONTH);
    let mut day = day.and_then(parse_day).unwrap_or(DEFAULT_DAY);

    if day > days_in_month(year, month) {
        day = match month {
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        };
    }

    format!("{year:04}-{month:02}-{day:02}")
}

fn parse_month(value: &str) -> Option<u32> {
    let normalized = value.trim().to_lowercase();
    if let Some(&(_, number)) = MONTH_NAMES.iter().find(|(name, _)| *name == normalized) {
        return Some(number);
    }
    parse_numeric(&normalized, 1..=12)
}

fn parse_day(value: &str) -> Option<u32> {
    parse_numeric(value.trim(), 1..=31)
}

fn parse_numeric(value: &str, range: std::ops::RangeInclusive<u32>) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u32 = value.parse().ok()?;
    range.contains(&number).then_some(number)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn normalized(fields: &[(&str, &str)]) -> NormalizedRecord {
        let mut raw = RawRecord::new("doe2023", "article");
        for (name, value) in fields {
            raw = raw.with_field(*name, *value);
        }
        NormalizedRecord::from(&raw)
    }

    #[rstest]
    #[case(2021, None, None, "2021-06-15")]
    #[case(2020, Some("February"), Some("31"), "2020-02-28")]
    #[case(2020, Some("2"), Some("29"), "2020-02-29")] // leap year
    #[case(2021, Some("2"), Some("29"), "2021-02-28")]
    #[case(2021, Some("apr"), Some("31"), "2021-04-30")]
    #[case(2023, Some("dec"), Some("5"), "2023-12-05")]
    #[case(2023, Some("Sept"), None, "2023-09-15")]
    #[case(2023, Some("13"), Some("40"), "2023-06-15")] // both unparseable
    #[case(2023, Some("spring"), Some("first"), "2023-06-15")]
    fn test_publication_date(
        #[case] year: i32,
        #[case] month: Option<&str>,
        #[case] day: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(publication_date(year, month, day), expected);
    }

    #[test]
    fn test_build_basic() {
        let record = normalized(&[
            ("title", "Test Paper"),
            ("author", "Doe, John"),
            ("journal", "Nature"),
            ("year", "2023"),
            ("url", "https://example.com/paper"),
        ]);
        let citation =
            CanonicalCitation::build(&record, Identifier::new(IdKind::Doi, "10.1234/example"))
                .unwrap();

        assert_eq!(citation.id, "doi:10.1234/example");
        assert_eq!(citation.kind, IdKind::Doi);
        assert_eq!(citation.value, "10.1234/example");
        assert_eq!(citation.title.as_deref(), Some("Test Paper"));
        assert_eq!(citation.venue.as_deref(), Some("Nature"));
        assert_eq!(citation.date.as_deref(), Some("2023-06-15"));
        assert_eq!(citation.link.as_deref(), Some("https://example.com/paper"));
        assert_eq!(citation.source_key, "doe2023");
        assert_eq!(citation.source_type, "article");
        assert!(!citation.preprint);
    }

    #[test]
    fn test_build_no_year_means_no_date() {
        let record = normalized(&[("title", "Undated")]);
        let citation =
            CanonicalCitation::build(&record, Identifier::new(IdKind::Raw, "doe2023")).unwrap();
        assert_eq!(citation.year, None);
        assert_eq!(citation.date, None);
    }

    #[test]
    fn test_build_rejects_blank_identifier_value() {
        let record = normalized(&[]);
        let result = CanonicalCitation::build(&record, Identifier::new(IdKind::Doi, ""));
        assert!(matches!(result, Err(ConvertError::InvalidCitationId(_))));
    }

    #[test]
    fn test_preprint_flag_from_venue_label() {
        let record = normalized(&[("journal", "CoRR"), ("year", "2023")]);
        let citation =
            CanonicalCitation::build(&record, Identifier::new(IdKind::Url, "https://example.com"))
                .unwrap();
        assert!(citation.preprint);
    }

    #[test]
    fn test_preprint_flag_from_arxiv_family() {
        let record = normalized(&[("journal", "Nature"), ("year", "2023")]);
        let citation =
            CanonicalCitation::build(&record, Identifier::new(IdKind::Arxiv, "2301.12345"))
                .unwrap();
        assert!(citation.preprint);
    }

    #[test]
    fn test_to_record_with_metadata() {
        let record = normalized(&[
            ("title", "Test Paper"),
            ("author", "Doe, John"),
            ("journal", "Nature"),
            ("year", "2023"),
            ("url", "https://example.com/paper"),
        ]);
        let citation =
            CanonicalCitation::build(&record, Identifier::new(IdKind::Doi, "10.1234/example"))
                .unwrap();

        let emitted = citation.to_record(true);
        assert_eq!(emitted.id, "doi:10.1234/example");
        assert_eq!(emitted.kind, "doi");
        assert_eq!(emitted.title.as_deref(), Some("Test Paper"));
        assert_eq!(emitted.authors, Some(vec!["John Doe".to_string()]));
        // The venue travels under the `publisher` attribute.
        assert_eq!(emitted.publisher.as_deref(), Some("Nature"));
        assert_eq!(emitted.year, Some(2023));
        assert_eq!(emitted.date.as_deref(), Some("2023-06-15"));
        assert_eq!(emitted.link.as_deref(), Some("https://example.com/paper"));
    }

    #[test]
    fn test_to_record_without_metadata() {
        let record = normalized(&[("title", "Test Paper"), ("year", "2023")]);
        let citation =
            CanonicalCitation::build(&record, Identifier::new(IdKind::Doi, "10.1234/example"))
                .unwrap();

        let emitted = citation.to_record(false);
        assert_eq!(emitted.id, "doi:10.1234/example");
        assert_eq!(emitted.kind, "doi");
        assert_eq!(emitted.title, None);
        assert_eq!(emitted.authors, None);
        assert_eq!(emitted.publisher, None);
        assert_eq!(emitted.year, None);
        assert_eq!(emitted.date, None);
        assert_eq!(emitted.link, None);
    }

    #[test]
    fn test_record_serialization_skips_absent_fields() {
        let record = normalized(&[("title", "Test Paper"), ("year", "2023")]);
        let citation =
            CanonicalCitation::build(&record, Identifier::new(IdKind::Doi, "10.1234/example"))
                .unwrap();

        let json = serde_json::to_value(citation.to_record(true)).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("id"));
        assert!(object.contains_key("type"));
        assert!(object.contains_key("title"));
        assert!(!object.contains_key("authors"));
        assert!(!object.contains_key("link"));
    }
}
