//! gstn-core: the filing-status report pipeline, minus the network.
//!
//! Turns an uploaded GSTIN list into a fixed-shape CSV report:
//!
//! - [`extract`] -- read the GSTN column out of a CSV or spreadsheet upload
//! - [`reconcile()`] -- project a remote filing-status payload onto one month,
//!   always yielding one entry per expected return type
//! - [`export`] -- write reconciled records as the 8-column report
//!
//! Remote lookups and the worker pool that drives them live in `gstn-fetch`.

pub mod error;
pub mod export;
pub mod extract;
pub mod model;
pub mod reconcile;

// ── Convenience re-exports ───────────────────────────────────────────

pub use error::{ExportError, ExtractError, PeriodError};
pub use export::{write_report, write_report_file, REPORT_HEADER};
pub use extract::{extract_gstins, InputFormat};
pub use model::{
    FilingStatusEntry, Gstin, RawFilingRecord, ReconciledRecord, ReportingPeriod, MONTHS,
    OFFERED_YEARS,
};
pub use reconcile::{
    reconcile, EXPECTED_RETURN_TYPES, NO_RECORD_FOUND, PROCESSED_STATUS,
};
