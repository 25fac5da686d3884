//! GSTIN extraction from uploaded tabular documents.
//!
//! Two parse paths, chosen explicitly by [`InputFormat`]:
//! - [`delimited`] -- CSV; the header is always row 0
//! - [`sheet`] -- legacy or modern Excel workbooks; first sheet only, header
//!   found by scanning the first two rows
//!
//! Both locate the column whose header is "gstn" (case-insensitive) wherever
//! it sits, and collapse duplicate identifiers into a set.

mod delimited;
mod sheet;

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::ExtractError;
use crate::model::Gstin;

pub const CONTENT_TYPE_CSV: &str = "text/csv";
pub const CONTENT_TYPE_XLS: &str = "application/vnd.ms-excel";
pub const CONTENT_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The declared layout of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated text.
    DelimitedText,
    /// `.xls` or `.xlsx` workbook.
    Spreadsheet,
}

impl InputFormat {
    /// Map a declared MIME type to a parse path.
    ///
    /// MIME parameters (`; charset=...`) are ignored.
    pub fn from_content_type(content_type: &str) -> Result<Self, ExtractError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            CONTENT_TYPE_CSV => Ok(InputFormat::DelimitedText),
            CONTENT_TYPE_XLS | CONTENT_TYPE_XLSX => Ok(InputFormat::Spreadsheet),
            _ => Err(ExtractError::UnsupportedFormat(content_type.to_string())),
        }
    }

    /// Infer the format from a file extension (`.csv`, `.xls`, `.xlsx`).
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(InputFormat::DelimitedText),
            Some("xls") | Some("xlsx") => Ok(InputFormat::Spreadsheet),
            _ => Err(ExtractError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read the set of GSTINs out of `bytes`.
///
/// Performs no I/O beyond reading the buffer. Any failure aborts the whole
/// extraction; there is no partial result.
pub fn extract_gstins(bytes: &[u8], format: InputFormat) -> Result<BTreeSet<Gstin>, ExtractError> {
    let gstins = match format {
        InputFormat::DelimitedText => delimited::gstins_from_csv(bytes)?,
        InputFormat::Spreadsheet => sheet::gstins_from_spreadsheet(bytes)?,
    };
    tracing::debug!(count = gstins.len(), ?format, "extracted GSTINs");
    Ok(gstins)
}

/// True when a header cell names the GSTN column.
fn is_gstn_header(cell: &str) -> bool {
    cell.trim_start_matches('\u{feff}')
        .trim()
        .eq_ignore_ascii_case("gstn")
}
