//! Student records pulled out of roster rows

use calamine::Data;
use serde::Serialize;

use crate::columns::{self, ColumnSpec, Resolution};
use crate::config::Subject;
use crate::error::MarksheetError;

const ABSENT_MARKERS: [&str; 3] = ["AB", "A", "ABSENT"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectMark {
    pub subject: String,
    pub mark: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub name: String,
    pub mother_name: String,
    pub father_name: String,
    pub register_number: String,
    /// SATS number, empty when the roster has no such column
    pub secondary_id: String,
    /// One entry per configured subject, in canonical order
    pub subject_marks: Vec<SubjectMark>,
}

impl StudentRecord {
    pub fn marks(&self) -> Vec<u32> {
        self.subject_marks.iter().map(|s| s.mark).collect()
    }
}

/// Column indexes for every logical field, resolved once per roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterColumns {
    pub name: usize,
    pub mother_name: usize,
    pub father_name: usize,
    pub register_number: usize,
    pub secondary_id: Resolution,
    pub subjects: Vec<usize>,
}

impl RosterColumns {
    /// Resolve all fields; fails on the first missing mandatory column
    pub fn resolve(headers: &[String], subjects: &[Subject]) -> Result<Self, MarksheetError> {
        let name = mandatory(headers, &columns::candidate_name())?;
        let mother_name = mandatory(headers, &columns::mother_name())?;
        let father_name = mandatory(headers, &columns::father_name())?;
        let register_number = mandatory(headers, &columns::register_number())?;
        let secondary_id = columns::resolve(headers, &columns::secondary_id())?;

        let subjects = subjects
            .iter()
            .map(|subject| mandatory(headers, &subject.column_spec()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            mother_name,
            father_name,
            register_number,
            secondary_id,
            subjects,
        })
    }
}

fn mandatory(headers: &[String], spec: &ColumnSpec) -> Result<usize, MarksheetError> {
    columns::find_column(headers, &spec.field, &spec.candidates)
}

pub fn extract_record(row: &[Data], columns: &RosterColumns, subjects: &[Subject]) -> StudentRecord {
    let text = |idx: usize| row.get(idx).map(cell_text).unwrap_or_default();

    let secondary_id = match columns.secondary_id {
        Resolution::Column(idx) => text(idx),
        Resolution::Blank => String::new(),
    };

    let subject_marks = subjects
        .iter()
        .zip(&columns.subjects)
        .map(|(subject, &idx)| SubjectMark {
            subject: subject.name.clone(),
            mark: row.get(idx).map(coerce_mark).unwrap_or(0),
        })
        .collect();

    StudentRecord {
        name: text(columns.name),
        mother_name: text(columns.mother_name),
        father_name: text(columns.father_name),
        register_number: text(columns.register_number),
        secondary_id,
        subject_marks,
    }
}

/// Display text of a cell; integral numbers lose their `.0`
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(n) => n.to_string(),
        Data::Float(n) => format_number(*n),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTime(dt) => format_number(dt.as_f64()),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Mark held in a cell; anything unusable counts as zero
pub fn coerce_mark(cell: &Data) -> u32 {
    match cell {
        Data::Int(n) => u32::try_from(*n).unwrap_or(0),
        Data::Float(n) => float_mark(*n),
        Data::String(s) => parse_mark(s),
        _ => 0,
    }
}

/// Parse a textual mark: absent markers, blanks and garbage become zero,
/// decimals are truncated
pub fn parse_mark(value: &str) -> u32 {
    let value = value.trim();
    if value.is_empty() || ABSENT_MARKERS.iter().any(|m| value.eq_ignore_ascii_case(m)) {
        return 0;
    }
    value.parse::<f64>().map(float_mark).unwrap_or(0)
}

fn float_mark(n: f64) -> u32 {
    if n.is_finite() && n >= 0.0 && n < u32::MAX as f64 {
        n.trunc() as u32
    } else {
        0
    }
}
