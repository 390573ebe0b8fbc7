//! Shared fixtures: template images and roster workbooks

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

pub const HEADERS: [&str; 11] = [
    "Candidate Name",
    "Mother Name",
    "Father Name",
    "Register\nNumber",
    "SATS No",
    "KANNADA",
    "English",
    "Chemistry",
    "Mathematics",
    "Physics",
    "Biology",
];

/// A cell in a fixture roster
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

/// Small white RGB PNG standing in for the scanned template
pub fn template_png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer
            .write_image_data(&vec![255u8; (width * height * 3) as usize])
            .unwrap();
    }
    out
}

pub fn write_template(dir: &Path) -> PathBuf {
    let path = dir.join("template.png");
    std::fs::write(&path, template_png(8, 12)).unwrap();
    path
}

pub fn write_roster(path: &Path, headers: &[&str], rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r, col, *s).unwrap();
                }
                Cell::Number(n) => {
                    sheet.write_number(r, col, *n).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }

    workbook.save(path).unwrap();
}

/// Two students: one failing on an absent ("AB") and a blank subject, one clean pass
pub fn two_student_rows() -> Vec<Vec<Cell<'static>>> {
    use Cell::*;
    vec![
        vec![
            Text("Asha K"),
            Text("Latha"),
            Text("Kumar"),
            Number(20231045.0),
            Text("SATS-77"),
            Number(78.0),
            Text("AB"),
            Number(66.0),
            Text("91.5"),
            Blank,
            Number(55.0),
        ],
        vec![
            Text("Ravi M"),
            Text("Geetha"),
            Text("Mohan"),
            Number(20231046.0),
            Blank,
            Number(40.0),
            Number(40.0),
            Number(40.0),
            Number(40.0),
            Number(40.0),
            Number(40.0),
        ],
    ]
}
