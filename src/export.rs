//! Exporter contract shared by the spreadsheet, document and PDF renderers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GroupdocError, GroupdocResult};
use crate::types::Table;

/// Kind of generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Xlsx,
    Docx,
    Pdf,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Xlsx, ArtifactKind::Docx, ArtifactKind::Pdf];

    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Xlsx => "xlsx",
            ArtifactKind::Docx => "docx",
            ArtifactKind::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ArtifactKind::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ArtifactKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ArtifactKind::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArtifactKind {
    type Err = GroupdocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ArtifactKind::Xlsx),
            "docx" | "word" => Ok(ArtifactKind::Docx),
            "pdf" => Ok(ArtifactKind::Pdf),
            other => Err(GroupdocError::Config(format!(
                "unknown export format '{}' (expected xlsx, docx or pdf)",
                other
            ))),
        }
    }
}

/// What an exporter needs to know besides the rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportContext {
    /// Document heading
    pub title: String,
    pub group_key: String,
}

impl ExportContext {
    pub fn new(grouping_column: &str, group_key: &str) -> Self {
        Self {
            title: format!("{}: {}", grouping_column, group_key),
            group_key: group_key.to_string(),
        }
    }
}

/// Renders a filtered table to file bytes
pub trait Exporter: Send + Sync {
    fn kind(&self) -> ArtifactKind;

    fn render(&self, table: &Table, ctx: &ExportContext) -> GroupdocResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("XLSX".parse::<ArtifactKind>().unwrap(), ArtifactKind::Xlsx);
        assert_eq!("word".parse::<ArtifactKind>().unwrap(), ArtifactKind::Docx);
        assert_eq!(" pdf ".parse::<ArtifactKind>().unwrap(), ArtifactKind::Pdf);
        assert!("csv".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn test_context_title() {
        let ctx = ExportContext::new("Kode Kegiatan", "A1");
        assert_eq!(ctx.title, "Kode Kegiatan: A1");
        assert_eq!(ctx.group_key, "A1");
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ArtifactKind::Pdf.to_string(), "pdf");
        assert!(ArtifactKind::Docx.mime_type().contains("wordprocessingml"));
    }
}
