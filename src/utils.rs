use crate::regex::Regex;
use std::sync::LazyLock;

static LATEX_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:textit|textbf|emph)\{([^{}]*)\}").unwrap());

static BRACE_GROUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").unwrap());

static PAGE_DASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*-+\s*").unwrap());

static AUTHOR_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+and\s+").unwrap());

const LATEX_ESCAPES: [(&str, &str); 5] = [
    (r"\&", "&"),
    (r"\%", "%"),
    (r"\$", "$"),
    (r"\#", "#"),
    (r"\_", "_"),
];

/// Strips BibTeX brace groups and common LaTeX markup from a field value
/// and collapses whitespace runs.
///
/// Formatting commands (`\textit{..}`, `\emph{..}`) keep their argument,
/// escaped specials become plain characters, and any leftover backslash
/// commands are dropped.
pub(crate) fn clean_field(value: &str) -> String {
    let mut cleaned = value.trim().to_string();

    for (escape, plain) in LATEX_ESCAPES {
        cleaned = cleaned.replace(escape, plain);
    }
    cleaned = LATEX_COMMAND.replace_all(&cleaned, "$1").into_owned();

    // Peel nested brace groups from the inside out.
    loop {
        let peeled = BRACE_GROUP.replace_all(&cleaned, "$1").into_owned();
        if peeled == cleaned {
            break;
        }
        cleaned = peeled;
    }
    cleaned = cleaned.replace('\\', "");

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tidies a page range: runs of hyphens become a single hyphen with no
/// surrounding spaces.
pub(crate) fn format_pages(value: &str) -> Option<String> {
    let cleaned = PAGE_DASH.replace_all(value.trim(), "-").into_owned();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Splits a BibTeX author field into display names.
///
/// Segments are separated by the word `and` (any case); a `"Last, First"`
/// segment is flipped to `"First Last"`; blank segments are dropped.
pub(crate) fn parse_author_list(field: &str) -> Vec<String> {
    AUTHOR_SEPARATOR
        .split(field)
        .filter_map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                return None;
            }
            let name = match segment.split_once(',') {
                Some((last, first)) if !last.trim().is_empty() && !first.trim().is_empty() => {
                    format!("{} {}", first.trim(), last.trim())
                }
                _ => segment.to_string(),
            };
            Some(name)
        })
        .collect()
}
