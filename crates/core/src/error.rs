/// Errors raised while reading GSTINs out of an uploaded document.
///
/// Every variant is fatal to the request: extraction never returns a
/// partial identifier set.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The declared content type is neither CSV nor a spreadsheet.
    #[error("unsupported file type '{0}': only CSV or Excel files are supported")]
    UnsupportedFormat(String),

    /// The delimited-text input has no rows at all.
    #[error("invalid file: no data found")]
    EmptyInput,

    /// No header cell equals "gstn" (case-insensitive).
    #[error("GSTN column not found in header")]
    ColumnNotFound,

    /// Neither of the first two spreadsheet rows contains a "gstn" cell.
    #[error("valid header row not found in the first two rows")]
    HeaderNotFound,

    /// The document could not be decoded (encrypted, corrupt, malformed CSV).
    #[error("unreadable document: {0}")]
    UnreadableDocument(String),
}

/// Errors raised while writing the CSV report.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised when validating a caller-selected reporting period.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("unknown month '{0}': expected a calendar month name such as 'April'")]
    UnknownMonth(String),

    #[error("invalid year '{0}': expected a four-digit year such as '2024'")]
    InvalidYear(String),
}
