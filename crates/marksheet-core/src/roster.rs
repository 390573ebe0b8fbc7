//! Roster loading from spreadsheet files

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::error::MarksheetError;
use crate::record::cell_text;

/// Header row plus data rows of the first worksheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

impl Roster {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Data>>) -> Self {
        Self { headers, rows }
    }

    /// Open an xlsx/xlsm/xlsb/xls/ods workbook
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MarksheetError> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            MarksheetError::Spreadsheet(format!("Cannot open {}: {}", path.display(), e))
        })?;
        let range = first_sheet(&mut workbook)?;
        Ok(Self::from_range(&range))
    }

    /// Load a workbook already held in memory
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, MarksheetError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| MarksheetError::Spreadsheet(format!("Cannot read workbook: {}", e)))?;
        let range = first_sheet(&mut workbook)?;
        Ok(Self::from_range(&range))
    }

    fn from_range(range: &Range<Data>) -> Self {
        let mut rows = range.rows();
        let headers = rows
            .next()
            .map(|header| header.iter().map(cell_text).collect())
            .unwrap_or_default();

        let rows = rows
            .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
            .map(|row| row.to_vec())
            .collect();

        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<Range<Data>, MarksheetError> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| MarksheetError::Spreadsheet("Workbook has no worksheets".into()))?;

    workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| MarksheetError::Spreadsheet(format!("Cannot read sheet '{}': {}", sheet_name, e)))
}
