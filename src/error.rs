use thiserror::Error;

/// Structural failures surfaced to the caller
///
/// Unparsable cells never show up here: the parsing layer reports them as
/// [`crate::time::TimeParseError`] and extraction skips them.
#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("Missing station headers in the first sheet '{sheet}'")]
    MissingReferenceHeaders { sheet: String },

    #[error("Invalid project file format (missing or wrong _format field)")]
    InvalidProjectFormat,

    #[error("Project file does not contain sheet data (sheets_data)")]
    MissingSheetsData,

    #[error("Unsupported project version: {0}")]
    UnsupportedProjectVersion(u32),

    #[error("Sheet '{0}' does not exist")]
    UnknownSheet(String),

    #[error("Failed to parse project: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read sheet data: {0}")]
    Csv(#[from] csv::Error),

    #[error("File is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = TimetableError> = std::result::Result<T, E>;
