//! Fuzzy header matching for roster columns
//!
//! Headers are compared after case-folding and removing all whitespace, so
//! `"Candidate Name"`, `"candidatename"` and `"CANDIDATE\nNAME"` are the same
//! column.

use crate::error::MarksheetError;

/// Whether a logical field must be present in the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Absence aborts the whole batch
    Mandatory,
    /// Absence degrades to a blank value
    Optional,
}

/// Outcome of resolving a logical field against the roster headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Column(usize),
    Blank,
}

/// A logical field with its accepted header variants in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: String,
    pub candidates: Vec<String>,
    pub requirement: Requirement,
}

impl ColumnSpec {
    pub fn mandatory(field: &str, candidates: &[&str]) -> Self {
        Self::new(field, candidates, Requirement::Mandatory)
    }

    pub fn optional(field: &str, candidates: &[&str]) -> Self {
        Self::new(field, candidates, Requirement::Optional)
    }

    fn new(field: &str, candidates: &[&str], requirement: Requirement) -> Self {
        Self {
            field: field.to_string(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            requirement,
        }
    }
}

pub fn candidate_name() -> ColumnSpec {
    ColumnSpec::mandatory("candidate name", &["CandidateName", "Name"])
}

pub fn mother_name() -> ColumnSpec {
    ColumnSpec::mandatory("mother's name", &["MotherName", "Mother"])
}

pub fn father_name() -> ColumnSpec {
    ColumnSpec::mandatory("father's name", &["FatherName", "Father"])
}

pub fn register_number() -> ColumnSpec {
    ColumnSpec::mandatory(
        "register number",
        &["RegisterNumber", "RegNo", "Register No"],
    )
}

/// SATS number; many rosters leave it out
pub fn secondary_id() -> ColumnSpec {
    ColumnSpec::optional("SATS number", &["SATSNumber", "SATS", "SATS No", "SATSNo"])
}

/// Case-fold and strip every whitespace character
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Index of the first header matching any candidate, candidates tried in order
pub fn find_column<S: AsRef<str>>(
    headers: &[String],
    field: &str,
    candidates: &[S],
) -> Result<usize, MarksheetError> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    for candidate in candidates {
        let wanted = normalize_header(candidate.as_ref());
        if let Some(idx) = normalized.iter().position(|h| *h == wanted) {
            return Ok(idx);
        }
    }

    Err(MarksheetError::MissingColumn {
        field: field.to_string(),
        candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        available: headers.to_vec(),
    })
}

/// Resolve a field, turning a missing optional column into [`Resolution::Blank`]
pub fn resolve(headers: &[String], spec: &ColumnSpec) -> Result<Resolution, MarksheetError> {
    match find_column(headers, &spec.field, &spec.candidates) {
        Ok(idx) => Ok(Resolution::Column(idx)),
        Err(err) => match spec.requirement {
            Requirement::Mandatory => Err(err),
            Requirement::Optional => {
                tracing::warn!(field = %spec.field, "optional column not found, using blank values");
                Ok(Resolution::Blank)
            }
        },
    }
}
