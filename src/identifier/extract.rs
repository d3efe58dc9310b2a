//! Per-family identifier extraction cascades.
//!
//! Each family owns an ordered, declarative pattern list: the prefixed form
//! (`doi:10.x/y`), the URL-embedded form, then the bare form. A capture only
//! counts when it also passes the family's strict validator; a capture that
//! fails validation moves on to the next pattern, never to a laxer rule.
//! Extractors never panic; malformed input is simply no match.

use super::{IdKind, Identifier};
use crate::regex::Regex;
use std::sync::LazyLock;
use url::Url;

const DOI_PATTERNS: &[&str] = &[
    r"(?i)doi:\s*(10\.\d+/[^\s,}]+)",
    r"(?i)https?://(?:dx\.)?doi\.org/(10\.\d+/[^\s,}]+)",
    r"^(10\.\d+/[^\s,}]+)$",
    r"(10\.\d+/[^\s,}]+)",
];

const PMID_PATTERNS: &[&str] = &[
    r"(?i)pmid:?\s*(\d+)",
    r"(?i)pubmed\s*id:?\s*(\d+)",
    r"(?i)pubmed:?\s*(\d+)",
    r"^(\d{7,8})$",
];

const PMCID_PATTERNS: &[&str] = &[
    r"(?i)pmcid:?\s*(pmc\d+)",
    r"(?i)pmc:?\s*(pmc\d+)",
    r"(?i)^(pmc\d+)$",
    r"(?i)(pmc\d+)",
];

const ARXIV_PATTERNS: &[&str] = &[
    r"(?i)arxiv:\s*(\S+)",
    r"(?i)https?://arxiv\.org/abs/(\S+)",
    r"(\d{4}\.\d{4,5}(?:v\d+)?)",
    r"([a-z-]+(?:\.[A-Z]{2})?/\d{7})",
];

const ISBN_PATTERNS: &[&str] = &[
    r"(?i)isbn:?\s*(978\d{10})",
    r"(?i)isbn:?\s*(\d{9}[\dXx])",
    r"(978\d{10})",
    r"(?i)(\d{9}[\dXx])",
];

static DOI_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(DOI_PATTERNS));
static PMID_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(PMID_PATTERNS));
static PMCID_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(PMCID_PATTERNS));
static ARXIV_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(ARXIV_PATTERNS));
static ISBN_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(ISBN_PATTERNS));

static DOI_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^10\.\d{4,}/\S+$").unwrap());
static ARXIV_NEW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}\.\d{4,5}(?:v\d+)?$").unwrap());
static ARXIV_OLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z-]+(?:\.[A-Z]{2})?/\d{7}$").unwrap());

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

/// Runs a pattern cascade: the first capture whose tidied form validates
/// becomes the canonical value.
fn scan(
    regexes: &[Regex],
    text: &str,
    tidy: fn(&str) -> String,
    validate: fn(&str) -> bool,
) -> Option<String> {
    let text = text.trim();
    for re in regexes {
        if let Some(captures) = re.captures(text) {
            if let Some(group) = captures.get(1) {
                let candidate = tidy(group.as_str());
                if validate(&candidate) {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

fn keep(value: &str) -> String {
    value.to_string()
}

fn upper(value: &str) -> String {
    value.to_uppercase()
}

/// Drops punctuation a greedy capture may have swallowed at the end.
fn strip_trailing_punctuation(value: &str) -> String {
    value
        .trim_end_matches(|c: char| matches!(c, ',' | ';' | '.') || c.is_whitespace())
        .to_string()
}

fn is_valid_doi(value: &str) -> bool {
    DOI_GRAMMAR.is_match(value)
}

fn is_valid_pmid(value: &str) -> bool {
    (7..=8).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_valid_pmcid(value: &str) -> bool {
    value
        .strip_prefix("PMC")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn is_valid_arxiv(value: &str) -> bool {
    ARXIV_NEW.is_match(value) || ARXIV_OLD.is_match(value)
}

fn is_valid_isbn(value: &str) -> bool {
    let bytes = value.as_bytes();
    match bytes.len() {
        13 => bytes.iter().all(u8::is_ascii_digit),
        10 => {
            bytes[..9].iter().all(u8::is_ascii_digit)
                && (bytes[9].is_ascii_digit() || bytes[9] == b'X')
        }
        _ => false,
    }
}

/// Extracts a validated DOI (`10.{registrant}/{suffix}`, registrant at
/// least four digits).
pub fn extract_doi(text: &str) -> Option<Identifier> {
    scan(&DOI_REGEXES, text, strip_trailing_punctuation, is_valid_doi)
        .map(|value| Identifier::new(IdKind::Doi, value))
}

/// Extracts a validated PubMed id (7-8 digits).
pub fn extract_pmid(text: &str) -> Option<Identifier> {
    scan(&PMID_REGEXES, text, keep, is_valid_pmid).map(|value| Identifier::new(IdKind::Pmid, value))
}

/// Extracts a validated PubMed Central id; the canonical form upper-cases
/// the `PMC` prefix.
pub fn extract_pmcid(text: &str) -> Option<Identifier> {
    scan(&PMCID_REGEXES, text, upper, is_valid_pmcid)
        .map(|value| Identifier::new(IdKind::Pmcid, value))
}

/// Extracts a validated arXiv id, new style (`2301.12345`, optional `vN`)
/// or old style (`cond-mat/9901001`, optional subject class).
pub fn extract_arxiv(text: &str) -> Option<Identifier> {
    scan(&ARXIV_REGEXES, text, keep, is_valid_arxiv)
        .map(|value| Identifier::new(IdKind::Arxiv, value))
}

/// Extracts an ISBN-10 or ISBN-13.
///
/// The whole input is first compacted to digits and `X`; an exact 10- or
/// 13-character result is accepted directly, otherwise the pattern cascade
/// runs against the original text.
pub fn extract_isbn(text: &str) -> Option<Identifier> {
    let compact: String = text
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X')
        .collect();
    if is_valid_isbn(&compact) {
        return Some(Identifier::new(IdKind::Isbn, compact));
    }

    scan(&ISBN_REGEXES, text, upper, is_valid_isbn).map(|value| Identifier::new(IdKind::Isbn, value))
}

/// Validates an http(s) URL with a non-empty host; the canonical value is
/// the trimmed input.
pub fn extract_url(text: &str) -> Option<Identifier> {
    let trimmed = text.trim();
    let parsed = Url::parse(trimmed).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return None;
    }
    Some(Identifier::new(IdKind::Url, trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("10.1234/example", "10.1234/example")]
    #[case("doi:10.1234/example", "10.1234/example")]
    #[case("DOI: 10.1234/example", "10.1234/example")]
    #[case("https://doi.org/10.1234/example", "10.1234/example")]
    #[case("http://dx.doi.org/10.1038/nature12373", "10.1038/nature12373")]
    #[case("see 10.1234/example for details", "10.1234/example")]
    #[case("10.1234/example.", "10.1234/example")]
    #[case("10.1234/abc;", "10.1234/abc")]
    #[case("  10.1234/example  ", "10.1234/example")]
    fn test_extract_doi_valid(#[case] input: &str, #[case] expected: &str) {
        let id = extract_doi(input).unwrap();
        assert_eq!(id.kind, IdKind::Doi);
        assert_eq!(id.value, expected);
    }

    #[rstest]
    #[case("")]
    #[case("not a doi")]
    #[case("10.99/registrant-too-short")]
    #[case("11.1234/wrong-prefix")]
    #[case("doi:")]
    fn test_extract_doi_invalid(#[case] input: &str) {
        assert_eq!(extract_doi(input), None);
    }

    #[rstest]
    #[case("1234567", "1234567")]
    #[case("12345678", "12345678")]
    #[case("PMID: 1234567", "1234567")]
    #[case("pmid:7654321", "7654321")]
    #[case("PubMed ID: 12345678", "12345678")]
    #[case("pubmed: 1234567", "1234567")]
    fn test_extract_pmid_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(extract_pmid(input).unwrap().value, expected);
    }

    #[rstest]
    #[case("")]
    #[case("123456")] // too short
    #[case("123456789")] // too long
    #[case("pmid: 123456")] // prefixed but still too short
    #[case("words only")]
    fn test_extract_pmid_invalid(#[case] input: &str) {
        assert_eq!(extract_pmid(input), None);
    }

    #[rstest]
    #[case("PMC1234567", "PMC1234567")]
    #[case("pmc1234567", "PMC1234567")]
    #[case("PMCID: PMC765432", "PMC765432")]
    #[case("pmc: pmc99", "PMC99")]
    #[case("see PMC123456 for the full text", "PMC123456")]
    fn test_extract_pmcid_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(extract_pmcid(input).unwrap().value, expected);
    }

    #[rstest]
    #[case("")]
    #[case("PMC")]
    #[case("1234567")]
    #[case("PMD1234567")]
    fn test_extract_pmcid_invalid(#[case] input: &str) {
        assert_eq!(extract_pmcid(input), None);
    }

    #[rstest]
    #[case("2301.12345", "2301.12345")]
    #[case("2301.12345v2", "2301.12345v2")]
    #[case("arXiv:2301.12345", "2301.12345")]
    #[case("arxiv: 1905.07890v1", "1905.07890v1")]
    #[case("https://arxiv.org/abs/1905.07890", "1905.07890")]
    #[case("cond-mat/9901001", "cond-mat/9901001")]
    #[case("math.GT/0309136", "math.GT/0309136")]
    #[case("arXiv:cond-mat/9901001", "cond-mat/9901001")]
    fn test_extract_arxiv_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(extract_arxiv(input).unwrap().value, expected);
    }

    #[rstest]
    #[case("")]
    #[case("not an id")]
    #[case("123.4567")] // too few leading digits
    #[case("2301.123")] // too few trailing digits
    fn test_extract_arxiv_invalid(#[case] input: &str) {
        assert_eq!(extract_arxiv(input), None);
    }

    #[rstest]
    #[case("9780321125217", "9780321125217")]
    #[case("978-0-321-12521-7", "9780321125217")]
    #[case("0-306-40615-2", "0306406152")]
    #[case("043942089X", "043942089X")]
    #[case("0-439-42089-x", "043942089X")]
    #[case("ISBN: 9780321125217", "9780321125217")]
    #[case("ISBN 978 0 321 12521 7", "9780321125217")]
    fn test_extract_isbn_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(extract_isbn(input).unwrap().value, expected);
    }

    #[rstest]
    #[case("")]
    #[case("12345")]
    #[case("no isbn here")]
    #[case("978-0-321")]
    fn test_extract_isbn_invalid(#[case] input: &str) {
        assert_eq!(extract_isbn(input), None);
    }

    #[rstest]
    #[case("https://example.com/page")]
    #[case("http://example.com")]
    #[case("  https://example.com/path?q=1  ")]
    fn test_extract_url_valid(#[case] input: &str) {
        let id = extract_url(input).unwrap();
        assert_eq!(id.kind, IdKind::Url);
        assert_eq!(id.value, input.trim());
    }

    #[rstest]
    #[case("")]
    #[case("not a url")]
    #[case("ftp://example.com/file")]
    #[case("example.com/no-scheme")]
    #[case("https://")]
    fn test_extract_url_invalid(#[case] input: &str) {
        assert_eq!(extract_url(input), None);
    }

    #[test]
    fn test_extractors_never_match_each_other() {
        // A PMID is not a DOI, an ISBN is not a PMID, and so on.
        assert_eq!(extract_doi("1234567"), None);
        assert_eq!(extract_arxiv("10.1234/example"), None);
        assert_eq!(extract_pmcid("2301.12345"), None);
    }
}
