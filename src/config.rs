//! Converter configuration.

use crate::Result;
use crate::identifier::IdKind;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Settings controlling resolution order, duplicate removal, and output
/// shape.
///
/// # Examples
///
/// ```
/// use manubib::{ConverterConfig, IdKind};
///
/// let config = ConverterConfig {
///     citation_priority: vec![IdKind::Pmid, IdKind::Doi],
///     ..Default::default()
/// };
/// assert_eq!(config.min_title_overlap, 6);
/// assert!(config.include_metadata);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Identifier families to try, in order. Families absent from the list
    /// are never tried; unknown names in a configuration file are ignored.
    #[serde(deserialize_with = "lenient_priority")]
    pub citation_priority: Vec<IdKind>,
    /// Minimum consecutive-word title overlap marking a preprint duplicate.
    pub min_title_overlap: usize,
    /// Whether emitted records carry title/authors/publisher/year/date/link.
    pub include_metadata: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            citation_priority: Self::default_priority(),
            min_title_overlap: crate::dedupe::DEFAULT_MIN_OVERLAP,
            include_metadata: true,
        }
    }
}

impl ConverterConfig {
    /// The stock resolution order: doi, pmid, pmcid, arxiv, isbn, url.
    pub fn default_priority() -> Vec<IdKind> {
        vec![
            IdKind::Doi,
            IdKind::Pmid,
            IdKind::Pmcid,
            IdKind::Arxiv,
            IdKind::Isbn,
            IdKind::Url,
        ]
    }

    /// Loads configuration from JSON text. Missing keys take their
    /// defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses family names into a priority list, ignoring unknown names.
    pub fn parse_priority<S: AsRef<str>>(names: &[S]) -> Vec<IdKind> {
        names
            .iter()
            .filter_map(|name| match IdKind::from_str(name.as_ref()) {
                Ok(kind) => Some(kind),
                Err(_) => {
                    tracing::warn!(
                        family = name.as_ref(),
                        "ignoring unknown identifier family"
                    );
                    None
                }
            })
            .collect()
    }
}

fn lenient_priority<'de, D>(deserializer: D) -> std::result::Result<Vec<IdKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    Ok(ConverterConfig::parse_priority(&names))
}
