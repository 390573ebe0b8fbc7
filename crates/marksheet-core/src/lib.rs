//! Student marksheet generation
//!
//! Turns a spreadsheet roster into one PDF marksheet per student, drawn over
//! a fixed background template, and packages the results as a zip archive.
//!
//! Pipeline:
//! - `roster`: load the first worksheet (calamine)
//! - `columns` / `record`: fuzzy header matching and per-row extraction
//! - `summary`: totals, percentage and PASS/FAIL
//! - `layout` / `render`: fixed-coordinate text over the template (lopdf)
//! - `batch`: drive the above for every row
//! - `archive`: zip the produced documents

pub mod archive;
pub mod batch;
pub mod columns;
pub mod config;
pub mod error;
pub mod layout;
pub mod record;
pub mod render;
pub mod roster;
pub mod summary;
pub mod words;

pub use archive::{archive_file_name, bundle_directory, bundle_documents, ArchiveSummary};
pub use batch::{document_file_name, generate_marksheets};
pub use config::{MarksheetConfig, Subject};
pub use error::MarksheetError;
pub use layout::TemplateLayout;
pub use record::{parse_mark, StudentRecord};
pub use render::{BackgroundImage, MarksheetRenderer};
pub use roster::Roster;
pub use summary::{summarize, GradingPolicy, ResultClass, ScoreSummary};
pub use words::number_to_words;

/// Load the template image named in `config` and build a renderer for it
pub fn renderer_for(config: &MarksheetConfig) -> Result<MarksheetRenderer, MarksheetError> {
    config.validate()?;
    let background = BackgroundImage::from_file(&config.template_image)?;
    Ok(MarksheetRenderer::new(config.layout.clone(), background))
}
