//! Batch driver: roster in, one PDF per student out

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::MarksheetConfig;
use crate::error::MarksheetError;
use crate::record::{extract_record, RosterColumns, StudentRecord};
use crate::render::MarksheetRenderer;
use crate::roster::Roster;
use crate::summary::summarize;

/// Generate a marksheet for every roster row, in row order
///
/// All-or-nothing: the configuration and columns are checked before the first
/// document is written, and any later failure aborts the remaining rows.
/// Students sharing a name and register number get `_2`, `_3`, ... suffixes,
/// so every returned path is a distinct file. Concurrent calls must not share
/// `output_dir`.
pub fn generate_marksheets(
    roster: &Roster,
    config: &MarksheetConfig,
    renderer: &MarksheetRenderer,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, MarksheetError> {
    config.validate()?;
    renderer.layout().validate(config.subjects.len())?;
    let columns = RosterColumns::resolve(&roster.headers, &config.subjects)?;
    std::fs::create_dir_all(output_dir)?;

    info!(
        rows = roster.len(),
        output = %output_dir.display(),
        "Generating marksheets"
    );

    let mut generated = Vec::with_capacity(roster.len());
    let mut taken = HashSet::new();
    for row in &roster.rows {
        let record = extract_record(row, &columns, &config.subjects);
        let summary = summarize(&record.marks(), &config.grading);

        let path = output_dir.join(claim_file_name(&record, &mut taken));
        renderer.render_to_file(&record, &summary, &path)?;

        debug!(
            name = %record.name,
            register_number = %record.register_number,
            total = summary.total,
            result = %summary.result,
            "Marksheet written"
        );
        generated.push(path);
    }

    info!(count = generated.len(), "Marksheets generated");
    Ok(generated)
}

/// `{name}_{register_number}.pdf` with path-hostile characters replaced
pub fn document_file_name(record: &StudentRecord) -> String {
    format!("{}.pdf", document_stem(record))
}

fn document_stem(record: &StudentRecord) -> String {
    format!(
        "{}_{}",
        sanitize_file_component(&record.name),
        sanitize_file_component(&record.register_number)
    )
}

/// First free name among `stem.pdf`, `stem_2.pdf`, ...; compared
/// case-insensitively so names stay distinct on case-folding filesystems
fn claim_file_name(record: &StudentRecord, taken: &mut HashSet<String>) -> String {
    let stem = document_stem(record);
    let mut candidate = format!("{}.pdf", stem);
    let mut n = 2;
    while !taken.insert(candidate.to_lowercase()) {
        candidate = format!("{}_{}.pdf", stem, n);
        n += 1;
    }
    if n > 2 {
        warn!(
            name = %record.name,
            register_number = %record.register_number,
            file = %candidate,
            "Duplicate student, marksheet renamed"
        );
    }
    candidate
}

fn sanitize_file_component(s: &str) -> String {
    let cleaned: String = s
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // A bare ".." would still walk out of the output directory
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}
