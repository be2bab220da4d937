//! Configuration
//!
//! Every field has a default, so an empty or partial YAML file is valid.
//! CLI flags override values loaded from the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::layout::WidthRules;
use crate::core::resolver::{default_exact_labels, default_substring_fragments, ResolverPolicy};
use crate::error::{GroupdocError, GroupdocResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupdocConfig {
    /// Where the persisted dataset snapshot lives
    pub state_dir: PathBuf,
    /// Where artifacts are written
    pub output_dir: PathBuf,
    pub resolver: ResolverOptions,
    pub session: SessionOptions,
    pub xlsx: XlsxOptions,
    pub pdf: PdfOptions,
}

impl Default for GroupdocConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("output"),
            resolver: ResolverOptions::default(),
            session: SessionOptions::default(),
            xlsx: XlsxOptions::default(),
            pdf: PdfOptions::default(),
        }
    }
}

impl GroupdocConfig {
    /// Load from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> GroupdocResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GroupdocError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> GroupdocResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GroupdocResult<()> {
        if self.session.capacity == 0 {
            return Err(GroupdocError::Config(
                "session.capacity must be at least 1".to_string(),
            ));
        }
        if self.xlsx.max_column_width <= 0.0 {
            return Err(GroupdocError::Config(
                "xlsx.max_column_width must be positive".to_string(),
            ));
        }
        let pdf = &self.pdf;
        if pdf.font_size <= 0.0 || pdf.margin < 0.0 || pdf.margin * 2.0 >= PDF_PAGE_HEIGHT {
            return Err(GroupdocError::Config(
                "pdf.font_size must be positive and pdf.margin must fit the page".to_string(),
            ));
        }
        if pdf.widths.min_width > pdf.widths.max_width {
            return Err(GroupdocError::Config(
                "pdf.widths.min_width must not exceed pdf.widths.max_width".to_string(),
            ));
        }
        Ok(())
    }
}

/// Grouping-column matcher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    pub exact_labels: Vec<String>,
    pub substring_fragments: Vec<String>,
    /// Fall back to the first column when nothing matches
    pub first_column_fallback: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            exact_labels: default_exact_labels(),
            substring_fragments: default_substring_fragments(),
            first_column_fallback: false,
        }
    }
}

impl ResolverOptions {
    pub fn policy(&self) -> ResolverPolicy {
        ResolverPolicy::new(
            self.exact_labels.clone(),
            self.substring_fragments.clone(),
            self.first_column_fallback,
        )
    }
}

/// Session cache bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    pub capacity: usize,
    pub ttl_secs: u64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            capacity: 64,
            ttl_secs: 3600,
        }
    }
}

impl SessionOptions {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XlsxOptions {
    /// Upper bound for a column width, in characters
    pub max_column_width: f64,
    /// Added to the longest value length
    pub padding: f64,
}

impl Default for XlsxOptions {
    fn default() -> Self {
        Self {
            max_column_width: 50.0,
            padding: 2.0,
        }
    }
}

/// Landscape A4 in points
pub const PDF_PAGE_WIDTH: f64 = 842.0;
pub const PDF_PAGE_HEIGHT: f64 = 595.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    pub margin: f64,
    pub font_size: f64,
    pub widths: WidthRules,
    /// Columns (case-insensitive names) that share leftover width
    pub flexible_columns: Vec<String>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            margin: 28.0,
            font_size: 8.0,
            widths: WidthRules::default(),
            flexible_columns: vec![
                "uraian".to_string(),
                "uraian kegiatan".to_string(),
                "keterangan".to_string(),
                "description".to_string(),
            ],
        }
    }
}

impl PdfOptions {
    pub fn usable_width(&self) -> f64 {
        PDF_PAGE_WIDTH - 2.0 * self.margin
    }

    pub fn is_flexible(&self, column: &str) -> bool {
        let name = column.trim().to_lowercase();
        self.flexible_columns
            .iter()
            .any(|f| f.trim().to_lowercase() == name)
    }
}
