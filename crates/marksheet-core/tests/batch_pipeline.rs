//! End-to-end tests: roster workbook in, marksheet PDFs and archive out
//!
//! Run with: cargo test -p marksheet-core --test batch_pipeline

#[path = "common/fixtures.rs"]
mod fixtures;

use std::fs::File;

use fixtures::{two_student_rows, write_roster, write_template, Cell, HEADERS};
use lopdf::Document;
use marksheet_core::config::default_subjects;
use marksheet_core::{
    bundle_documents, generate_marksheets, renderer_for, MarksheetConfig, MarksheetError, Roster,
};
use pretty_assertions::assert_eq;
use zip::ZipArchive;

fn config_with_template(dir: &std::path::Path) -> MarksheetConfig {
    MarksheetConfig {
        template_image: write_template(dir),
        ..MarksheetConfig::default()
    }
}

fn shown_text(path: &std::path::Path) -> Vec<String> {
    let doc = Document::load(path).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    doc.get_and_decode_page_content(page_id)
        .unwrap()
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first()?.as_str().ok())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .collect()
}

#[test]
fn two_rows_produce_two_documents_in_row_order() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.xlsx");
    write_roster(&roster_path, &HEADERS, &two_student_rows());

    let config = config_with_template(dir.path());
    let renderer = renderer_for(&config).unwrap();
    let roster = Roster::open(&roster_path).unwrap();
    assert_eq!(roster.len(), 2);

    let out = dir.path().join("outputs");
    let generated = generate_marksheets(&roster, &config, &renderer, &out).unwrap();

    assert_eq!(
        generated,
        vec![
            out.join("Asha K_20231045.pdf"),
            out.join("Ravi M_20231046.pdf"),
        ]
    );
    for path in &generated {
        assert!(path.is_file());
        assert_eq!(Document::load(path).unwrap().get_pages().len(), 1);
    }
}

#[test]
fn rendered_text_reflects_coerced_marks_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.xlsx");
    write_roster(&roster_path, &HEADERS, &two_student_rows());

    let config = config_with_template(dir.path());
    let renderer = renderer_for(&config).unwrap();
    let roster = Roster::open(&roster_path).unwrap();
    let generated =
        generate_marksheets(&roster, &config, &renderer, &dir.path().join("out")).unwrap();

    // Asha: 78 + 0 (AB) + 66 + 91 (91.5) + 0 (blank) + 55 = 290
    let asha = shown_text(&generated[0]);
    assert!(asha.contains(&"SATS-77".to_string()));
    assert!(asha.contains(&"290".to_string()));
    assert!(asha.contains(&"Two Hundred Ninety".to_string()));
    assert!(asha.contains(&"48.3%".to_string()));
    assert!(asha.contains(&"FAIL".to_string()));
    assert!(asha.contains(&"Zero".to_string()));

    // Ravi: 6 x 40, no SATS number
    let ravi = shown_text(&generated[1]);
    assert!(ravi.contains(&"240".to_string()));
    assert!(ravi.contains(&"40.0%".to_string()));
    assert!(ravi.contains(&"PASS".to_string()));
    assert_eq!(ravi.iter().filter(|t| t.as_str() == "Forty").count(), 6);
}

#[test]
fn missing_mandatory_column_aborts_before_any_document() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.xlsx");

    // Drop the register number column from headers and rows
    let headers: Vec<&str> = HEADERS.iter().copied().filter(|h| !h.starts_with("Register")).collect();
    let rows: Vec<Vec<Cell>> = two_student_rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .filter(|(i, _)| *i != 3)
                .map(|(_, c)| c)
                .collect()
        })
        .collect();
    write_roster(&roster_path, &headers, &rows);

    let config = config_with_template(dir.path());
    let renderer = renderer_for(&config).unwrap();
    let roster = Roster::open(&roster_path).unwrap();

    let out = dir.path().join("outputs");
    let err = generate_marksheets(&roster, &config, &renderer, &out).unwrap_err();
    match &err {
        MarksheetError::MissingColumn { field, candidates, .. } => {
            assert_eq!(field, "register number");
            assert!(candidates.contains(&"RegNo".to_string()));
        }
        other => panic!("expected missing column, got {other}"),
    }
    assert!(!out.exists());
}

#[test]
fn generated_documents_bundle_into_archive() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.xlsx");
    write_roster(&roster_path, &HEADERS, &two_student_rows());

    let config = config_with_template(dir.path());
    let renderer = renderer_for(&config).unwrap();
    let roster = Roster::open(&roster_path).unwrap();
    let out = dir.path().join("outputs");
    let generated = generate_marksheets(&roster, &config, &renderer, &out).unwrap();

    let archive_path = out.join("marks_test.zip");
    let summary = bundle_documents(&generated, &archive_path).unwrap();
    assert_eq!(summary.entry_count, 2);

    let archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["Asha K_20231045.pdf", "Ravi M_20231046.pdf"]);
}

#[test]
fn roster_loads_from_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.xlsx");
    write_roster(&roster_path, &HEADERS, &two_student_rows());

    let roster = Roster::from_bytes(std::fs::read(&roster_path).unwrap()).unwrap();
    assert_eq!(roster.headers[3], "Register\nNumber");
    assert_eq!(roster.len(), 2);
}

#[test]
fn missing_template_image_is_reported() {
    let config = MarksheetConfig {
        template_image: "/nonexistent/template.png".into(),
        ..MarksheetConfig::default()
    };
    let err = renderer_for(&config).err().unwrap();
    assert!(matches!(err, MarksheetError::Template(_)));
}

#[test]
fn duplicate_students_each_keep_their_own_document() {
    use Cell::*;
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.xlsx");
    let row = |mark: f64| {
        vec![
            Text("Asha"),
            Text("Latha"),
            Text("Kumar"),
            Text("1"),
            Blank,
            Number(mark),
            Number(mark),
            Number(mark),
            Number(mark),
            Number(mark),
            Number(mark),
        ]
    };
    write_roster(&roster_path, &HEADERS, &[row(40.0), row(90.0)]);

    let config = config_with_template(dir.path());
    let renderer = renderer_for(&config).unwrap();
    let roster = Roster::open(&roster_path).unwrap();
    let out = dir.path().join("outputs");
    let generated = generate_marksheets(&roster, &config, &renderer, &out).unwrap();

    assert_eq!(generated, vec![out.join("Asha_1.pdf"), out.join("Asha_1_2.pdf")]);
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    assert!(shown_text(&generated[0]).contains(&"240".to_string()));
    assert!(shown_text(&generated[1]).contains(&"540".to_string()));

    let archive_path = dir.path().join("marks.zip");
    bundle_documents(&generated, &archive_path).unwrap();
    let archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["Asha_1.pdf", "Asha_1_2.pdf"]);
}

#[test]
fn subject_count_mismatching_layout_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.xlsx");
    write_roster(&roster_path, &HEADERS, &two_student_rows());

    let config = config_with_template(dir.path());
    let renderer = renderer_for(&config).unwrap();
    let roster = Roster::open(&roster_path).unwrap();

    // Five subjects against a six-row marks grid
    let short = MarksheetConfig {
        subjects: default_subjects()[..5].to_vec(),
        ..config
    };
    let out = dir.path().join("outputs");
    let err = generate_marksheets(&roster, &short, &renderer, &out).unwrap_err();
    assert!(matches!(err, MarksheetError::Config(_)));
    assert!(!out.exists());
}
