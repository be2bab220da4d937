use serde::Serialize;
use thiserror::Error;

pub type GroupdocResult<T> = Result<T, GroupdocError>;

#[derive(Error, Debug)]
pub enum GroupdocError {
    #[error("Unparsable input: {0}")]
    UnparsableInput(String),

    #[error("Header row not found: no row has at least two non-empty cells")]
    HeaderNotFound,

    #[error("Grouping column not found: {0}")]
    GroupingColumnNotFound(String),

    #[error("No dataset loaded: upload a spreadsheet first")]
    NoDatasetLoaded,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GroupdocError {
    /// Stable snake_case name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            GroupdocError::UnparsableInput(_) => "unparsable_input",
            GroupdocError::HeaderNotFound => "header_not_found",
            GroupdocError::GroupingColumnNotFound(_) => "grouping_column_not_found",
            GroupdocError::NoDatasetLoaded => "no_dataset_loaded",
            GroupdocError::SessionNotFound(_) => "session_not_found",
            GroupdocError::GroupNotFound(_) => "group_not_found",
            GroupdocError::InvalidTable(_) => "invalid_table",
            GroupdocError::Export(_) => "export",
            GroupdocError::Config(_) => "config",
            GroupdocError::StoreUnavailable(_) => "store_unavailable",
            GroupdocError::Io(_) => "io",
            GroupdocError::Yaml(_) => "yaml",
        }
    }

    /// HTTP-style status for the error
    pub fn status_code(&self) -> u16 {
        match self {
            GroupdocError::UnparsableInput(_)
            | GroupdocError::HeaderNotFound
            | GroupdocError::GroupingColumnNotFound(_)
            | GroupdocError::NoDatasetLoaded
            | GroupdocError::Config(_) => 400,
            GroupdocError::SessionNotFound(_) | GroupdocError::GroupNotFound(_) => 404,
            GroupdocError::InvalidTable(_)
            | GroupdocError::Export(_)
            | GroupdocError::StoreUnavailable(_)
            | GroupdocError::Io(_)
            | GroupdocError::Yaml(_) => 500,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from(self)
    }
}

/// Presentation form of an error: kind + human message + status code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
    pub status: u16,
}

impl From<&GroupdocError> for ErrorReport {
    fn from(err: &GroupdocError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            status: err.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_by_kind() {
        assert_eq!(GroupdocError::HeaderNotFound.status_code(), 400);
        assert_eq!(GroupdocError::NoDatasetLoaded.status_code(), 400);
        assert_eq!(
            GroupdocError::SessionNotFound("abc".into()).status_code(),
            404
        );
        assert_eq!(GroupdocError::GroupNotFound("C9".into()).status_code(), 404);
        assert_eq!(GroupdocError::Export("disk".into()).status_code(), 500);
    }

    #[test]
    fn test_report_carries_kind_and_message() {
        let report = GroupdocError::GroupNotFound("C9".to_string()).report();
        assert_eq!(report.kind, "group_not_found");
        assert_eq!(report.message, "Group not found: C9");
        assert_eq!(report.status, 404);
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GroupdocError = io.into();
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_report_serializes() {
        let report = GroupdocError::NoDatasetLoaded.report();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"kind\":\"no_dataset_loaded\""));
        assert!(json.contains("\"status\":400"));
    }
}
