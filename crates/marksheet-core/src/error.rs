use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarksheetError {
    #[error("Missing column for {field}: none of {candidates:?} found in columns {available:?}")]
    MissingColumn {
        field: String,
        candidates: Vec<String>,
        available: Vec<String>,
    },

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("Invalid template image: {0}")]
    Template(String),

    #[error("Failed to render marksheet: {0}")]
    Render(String),

    #[error("Failed to build archive: {0}")]
    Archive(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarksheetError {
    /// True for failures caused by the uploaded roster rather than the server setup
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MarksheetError::MissingColumn { .. } | MarksheetError::Spreadsheet(_)
        )
    }
}
