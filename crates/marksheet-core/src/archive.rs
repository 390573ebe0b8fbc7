//! Zip packaging of generated marksheets

use chrono::{DateTime, TimeZone};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::MarksheetError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entry_count: usize,
}

/// Timestamped archive name, e.g. `marks_20260315_142501.zip`
pub fn archive_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("marks_{}.zip", now.format("%Y%m%d_%H%M%S"))
}

/// Zip the given documents, each stored under its file name
pub fn bundle_documents(
    documents: &[PathBuf],
    archive_path: &Path,
) -> Result<ArchiveSummary, MarksheetError> {
    if let Some(parent) = archive_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let out_file = File::create(archive_path).map_err(|e| {
        MarksheetError::Archive(format!("Cannot create {}: {}", archive_path.display(), e))
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for doc in documents {
        let entry_name = doc
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MarksheetError::Archive(format!("Bad file name: {}", doc.display())))?;

        zip.start_file(entry_name, opts)
            .map_err(|e| MarksheetError::Archive(format!("Cannot add {}: {}", entry_name, e)))?;
        let mut src = File::open(doc)?;
        std::io::copy(&mut src, &mut zip)?;
    }

    zip.finish()
        .map_err(|e| MarksheetError::Archive(format!("Cannot finalize archive: {}", e)))?;

    info!(
        archive = %archive_path.display(),
        entries = documents.len(),
        "Archive written"
    );

    Ok(ArchiveSummary {
        path: archive_path.to_path_buf(),
        entry_count: documents.len(),
    })
}

/// Zip every PDF in `output_dir`; earlier archives are never re-included
pub fn bundle_directory(
    output_dir: &Path,
    archive_path: &Path,
) -> Result<ArchiveSummary, MarksheetError> {
    let mut documents: Vec<PathBuf> = std::fs::read_dir(output_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    documents.sort();

    bundle_documents(&documents, archive_path)
}
