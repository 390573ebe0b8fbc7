//! Marksheet configuration
//!
//! Subjects, grading and the template layout can be overridden from a TOML
//! file. Every section is optional; missing values fall back to the
//! calibrated defaults for the stock marksheet template.
//!
//! ```toml
//! template_image = "static/marksheet_template.png"
//!
//! [grading]
//! pass_mark = 35
//! max_mark = 100
//!
//! [[subjects]]
//! name = "Kannada"
//! code = "01"
//! aliases = ["First Language"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::columns::ColumnSpec;
use crate::error::MarksheetError;
use crate::layout::TemplateLayout;
use crate::summary::GradingPolicy;

/// One subject of the canonical subject order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    #[serde(default)]
    pub code: String,
    /// Extra header spellings accepted for this subject's column
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Subject {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            aliases: Vec::new(),
        }
    }

    /// Header candidates: the name, then aliases, then the subject code
    pub fn column_spec(&self) -> ColumnSpec {
        let mut candidates: Vec<&str> = vec![self.name.as_str()];
        candidates.extend(self.aliases.iter().map(String::as_str));
        if !self.code.is_empty() {
            candidates.push(self.code.as_str());
        }
        ColumnSpec::mandatory(&self.name, &candidates)
    }
}

pub fn default_subjects() -> Vec<Subject> {
    vec![
        Subject::new("Kannada", "01"),
        Subject::new("English", "02"),
        Subject::new("Chemistry", "31"),
        Subject::new("Mathematics", "35"),
        Subject::new("Physics", "33"),
        Subject::new("Biology", "32"),
    ]
}

fn default_template_image() -> PathBuf {
    PathBuf::from("static/marksheet_template.png")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksheetConfig {
    /// Background PNG the layout coordinates are calibrated against
    #[serde(default = "default_template_image")]
    pub template_image: PathBuf,
    /// Canonical subject order, used for column lookup and row layout
    #[serde(default = "default_subjects")]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub grading: GradingPolicy,
    #[serde(default)]
    pub layout: TemplateLayout,
}

impl Default for MarksheetConfig {
    fn default() -> Self {
        Self {
            template_image: default_template_image(),
            subjects: default_subjects(),
            grading: GradingPolicy::default(),
            layout: TemplateLayout::default(),
        }
    }
}

impl MarksheetConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MarksheetError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MarksheetError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;

        // Relative template paths are taken from the config file's directory
        if config.template_image.is_relative() {
            if let Some(dir) = path.parent() {
                let candidate = dir.join(&config.template_image);
                if candidate.exists() {
                    return Ok(Self {
                        template_image: candidate,
                        ..config
                    });
                }
            }
        }
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self, MarksheetError> {
        let config: Self = toml::from_str(s)
            .map_err(|e| MarksheetError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MarksheetError> {
        if self.subjects.is_empty() {
            return Err(MarksheetError::Config(
                "At least one subject is required".into(),
            ));
        }
        if self.grading.max_mark == 0 {
            return Err(MarksheetError::Config("max_mark must be positive".into()));
        }
        if self.grading.pass_mark > self.grading.max_mark {
            return Err(MarksheetError::Config(format!(
                "pass_mark {} exceeds max_mark {}",
                self.grading.pass_mark, self.grading.max_mark
            )));
        }
        self.layout.validate(self.subjects.len())
    }
}
