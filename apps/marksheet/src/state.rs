//! Application state for the marksheet server

use std::path::PathBuf;
use std::sync::Arc;

use marksheet_core::{renderer_for, MarksheetConfig, MarksheetRenderer};

/// Shared, read-only state; every upload works in its own job directories
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MarksheetConfig>,
    pub renderer: Arc<MarksheetRenderer>,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl AppState {
    /// Decode the template once and prepare the working directories
    pub fn new(
        config: MarksheetConfig,
        upload_dir: PathBuf,
        output_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let renderer = renderer_for(&config)?;
        std::fs::create_dir_all(&upload_dir)?;
        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            config: Arc::new(config),
            renderer: Arc::new(renderer),
            upload_dir,
            output_dir,
        })
    }
}
