//! Fixed-position layout of the marksheet template
//!
//! Every coordinate is in PDF points from the bottom-left corner and is tuned
//! to one background image. Swapping the template means recalibrating these
//! values, which can be done from the TOML config without code changes.

use serde::{Deserialize, Serialize};

use crate::error::MarksheetError;
use crate::record::StudentRecord;
use crate::summary::ScoreSummary;
use crate::words::number_to_words;

/// The standard 14 PDF fonts, usable without embedding
pub const STANDARD_FONTS: [&str; 14] = [
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Symbol",
    "ZapfDingbats",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 595.2756,
        height: 841.8898,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// One of [`STANDARD_FONTS`]
    pub base_font: String,
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            base_font: "Times-Bold".to_string(),
            size: 13.0,
        }
    }
}

/// Single-value fields printed on the marksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutField {
    Name,
    MotherName,
    FatherName,
    RegisterNumber,
    SecondaryId,
    TotalFigures,
    TotalWords,
    Percentage,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPlacement {
    pub field: LayoutField,
    pub x: f32,
    pub y: f32,
}

impl FieldPlacement {
    pub const fn new(field: LayoutField, x: f32, y: f32) -> Self {
        Self { field, x, y }
    }
}

/// A run of consecutive subject rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowGroup {
    /// Number of subjects in this group
    pub subjects: usize,
    /// Row offset of the group's first subject, in multiples of `row_gap`
    pub start_row: f32,
}

/// Per-subject marks table: figures and words columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksGrid {
    pub figures_x: f32,
    pub words_x: f32,
    pub first_row_y: f32,
    pub row_gap: f32,
    pub groups: Vec<RowGroup>,
}

impl Default for MarksGrid {
    fn default() -> Self {
        Self {
            figures_x: 350.0,
            words_x: 445.0,
            first_row_y: 405.0,
            row_gap: 22.0,
            // Part I (languages), then Part II one printed row further down
            groups: vec![
                RowGroup {
                    subjects: 2,
                    start_row: 0.0,
                },
                RowGroup {
                    subjects: 4,
                    start_row: 3.2,
                },
            ],
        }
    }
}

impl MarksGrid {
    /// Baseline y of each subject row, in canonical subject order
    pub fn row_positions(&self) -> Vec<f32> {
        self.groups
            .iter()
            .flat_map(|group| {
                (0..group.subjects).map(move |j| {
                    self.first_row_y - (group.start_row + j as f32) * self.row_gap
                })
            })
            .collect()
    }

    pub fn subject_count(&self) -> usize {
        self.groups.iter().map(|g| g.subjects).sum()
    }
}

fn default_fields() -> Vec<FieldPlacement> {
    use LayoutField::*;
    vec![
        FieldPlacement::new(Name, 145.0, 580.0),
        FieldPlacement::new(MotherName, 145.0, 540.0),
        FieldPlacement::new(FatherName, 145.0, 500.0),
        FieldPlacement::new(RegisterNumber, 470.0, 580.0),
        FieldPlacement::new(SecondaryId, 470.0, 540.0),
        FieldPlacement::new(TotalFigures, 350.0, 241.0),
        FieldPlacement::new(TotalWords, 185.0, 210.0),
        FieldPlacement::new(Percentage, 500.0, 244.4),
        FieldPlacement::new(Result, 500.0, 207.0),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLayout {
    #[serde(default)]
    pub page: PageSize,
    #[serde(default)]
    pub font: FontSpec,
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldPlacement>,
    #[serde(default)]
    pub marks: MarksGrid,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            page: PageSize::default(),
            font: FontSpec::default(),
            fields: default_fields(),
            marks: MarksGrid::default(),
        }
    }
}

/// A literal string drawn at a fixed point
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

impl TemplateLayout {
    pub fn validate(&self, subject_count: usize) -> Result<(), MarksheetError> {
        if self.page.width <= 0.0 || self.page.height <= 0.0 {
            return Err(MarksheetError::Config(format!(
                "Page size must be positive, got {}x{}",
                self.page.width, self.page.height
            )));
        }
        if self.font.size <= 0.0 {
            return Err(MarksheetError::Config(format!(
                "Font size must be positive, got {}",
                self.font.size
            )));
        }
        if !STANDARD_FONTS.contains(&self.font.base_font.as_str()) {
            return Err(MarksheetError::Config(format!(
                "Unsupported font '{}'. Use one of: {}",
                self.font.base_font,
                STANDARD_FONTS.join(", ")
            )));
        }
        let rows = self.marks.subject_count();
        if rows != subject_count {
            return Err(MarksheetError::Config(format!(
                "Marks layout has {} subject rows but {} subjects are configured",
                rows, subject_count
            )));
        }
        Ok(())
    }

    /// Every string to draw for one student, in drawing order
    ///
    /// Values are drawn verbatim; long names simply run past their box.
    pub fn placements(&self, record: &StudentRecord, summary: &ScoreSummary) -> Vec<TextPlacement> {
        let mut out = Vec::new();

        for placement in &self.fields {
            let text = field_text(placement.field, record, summary);
            if text.is_empty() {
                continue;
            }
            out.push(TextPlacement {
                x: placement.x,
                y: placement.y,
                text,
            });
        }

        for (subject, y) in record.subject_marks.iter().zip(self.marks.row_positions()) {
            out.push(TextPlacement {
                x: self.marks.figures_x,
                y,
                text: subject.mark.to_string(),
            });
            out.push(TextPlacement {
                x: self.marks.words_x,
                y,
                text: number_to_words(subject.mark as u64),
            });
        }

        out
    }
}

fn field_text(field: LayoutField, record: &StudentRecord, summary: &ScoreSummary) -> String {
    match field {
        LayoutField::Name => record.name.clone(),
        LayoutField::MotherName => record.mother_name.clone(),
        LayoutField::FatherName => record.father_name.clone(),
        LayoutField::RegisterNumber => record.register_number.clone(),
        LayoutField::SecondaryId => record.secondary_id.clone(),
        LayoutField::TotalFigures => summary.total.to_string(),
        LayoutField::TotalWords => number_to_words(summary.total),
        LayoutField::Percentage => summary.percentage_label(),
        LayoutField::Result => summary.result.to_string(),
    }
}
