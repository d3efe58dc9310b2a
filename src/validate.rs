//! Downstream-contract validation of serialized citation records.
//!
//! The consuming site requires every record to carry a well-formed
//! `family:value` id and a non-blank type; missing descriptive metadata is
//! reported but never fatal.

use crate::citation::CitationRecord;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of validating an emitted citation list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// True when no record produced an error.
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub citation_count: usize,
    /// Number of citations per identifier family.
    pub kind_counts: HashMap<String, usize>,
}

/// Checks each record against the serializer contract.
///
/// Errors: a blank id, an id that does not split into a non-blank family
/// and value on its separating colon, or a blank type. Warnings: missing
/// title, authors, or year. Positions in messages are 1-based.
pub fn validate_records(records: &[CitationRecord]) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let position = index + 1;

        if record.id.trim().is_empty() {
            errors.push(format!("Citation {position}: missing 'id' field"));
        } else if !id_is_well_formed(&record.id) {
            errors.push(format!(
                "Citation {position}: invalid id format '{}'",
                record.id
            ));
        }
        if record.kind.trim().is_empty() {
            errors.push(format!("Citation {position}: missing 'type' field"));
        }

        if record.title.as_deref().unwrap_or("").trim().is_empty() {
            warnings.push(format!("Citation {position}: missing title"));
        }
        if record
            .authors
            .as_ref()
            .is_none_or(|authors| authors.is_empty())
        {
            warnings.push(format!("Citation {position}: missing authors"));
        }
        if record.year.is_none() {
            warnings.push(format!("Citation {position}: missing year"));
        }
    }

    let kind_counts = records
        .iter()
        .filter(|record| !record.kind.trim().is_empty())
        .counts_by(|record| record.kind.clone());

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        citation_count: records.len(),
        kind_counts,
    }
}

fn id_is_well_formed(id: &str) -> bool {
    id.split_once(':')
        .is_some_and(|(family, value)| !family.trim().is_empty() && !value.trim().is_empty())
}
