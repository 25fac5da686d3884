//! CSV report writer.
//!
//! One row per (record, filing-status entry) under a fixed 8-column header.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::model::{ReconciledRecord, ReportingPeriod};

/// Header row of every report.
pub const REPORT_HEADER: [&str; 8] = [
    "GSTN",
    "FY",
    "Tax Period",
    "Mode of Filing",
    "Date of Filing",
    "Return Type",
    "ARN",
    "Status",
];

/// Write `records` as CSV into `sink` and flush it.
///
/// A record without entries (only possible if reconciliation was skipped)
/// still gets one row: its GSTIN, six blank columns and its overall status.
pub fn write_report<W: io::Write>(sink: W, records: &[ReconciledRecord]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(REPORT_HEADER)?;

    for record in records {
        if record.entries.is_empty() {
            writer.write_record([
                record.gstin.as_str(),
                "",
                "",
                "",
                "",
                "",
                "",
                record.status.as_str(),
            ])?;
            continue;
        }

        for entry in &record.entries {
            writer.write_record([
                record.gstin.as_str(),
                entry.financial_year.as_str(),
                entry.tax_period.as_str(),
                entry.mode_of_filing.as_str(),
                entry.date_of_filing.as_str(),
                entry.return_type.as_str(),
                entry.arn.as_str(),
                entry.status.as_str(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write the report to a new `filing_<month>_<year>_*.csv` file in `dir`.
///
/// The file is removed again if writing fails.
pub fn write_report_file(
    dir: &Path,
    period: &ReportingPeriod,
    records: &[ReconciledRecord],
) -> Result<PathBuf, ExportError> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("filing_{}_{}_", period.month(), period.year()))
        .suffix(".csv")
        .tempfile_in(dir)?;

    write_report(file.as_file_mut(), records)?;

    let (_, path) = file.keep().map_err(|e| e.error)?;
    tracing::info!(path = %path.display(), records = records.len(), "report written");
    Ok(path)
}
