//! Projection of a remote filing-status payload onto one reporting month.
//!
//! Reconciliation never fails: wherever the service reported nothing for an
//! expected return type, a "No Record Found" placeholder takes its slot, so
//! every record carries exactly [`EXPECTED_RETURN_TYPES`] in that order.

use crate::model::{FilingStatusEntry, RawFilingRecord, ReconciledRecord};

/// Return types every reconciled record carries, in output order.
pub const EXPECTED_RETURN_TYPES: [&str; 2] = ["GSTR1", "GSTR3B"];

/// Status of a synthesized placeholder entry.
pub const NO_RECORD_FOUND: &str = "No Record Found";

/// Overall status stamped on every reconciled record.
pub const PROCESSED_STATUS: &str = "Processed";

/// Reconcile `raw` against `month`.
///
/// Month and return-type matching are case-insensitive literal comparisons
/// on the service's `taxp` and `rtntype` labels. A month spelled differently
/// by the service (e.g. "04") matches nothing and yields placeholders.
pub fn reconcile(raw: &RawFilingRecord, month: &str) -> ReconciledRecord {
    let entries = if raw.filing_status.is_empty() {
        EXPECTED_RETURN_TYPES
            .iter()
            .map(|return_type| placeholder(return_type, month))
            .collect()
    } else {
        let in_month: Vec<&FilingStatusEntry> = raw
            .filing_status
            .iter()
            .flatten()
            .filter(|entry| entry.tax_period.eq_ignore_ascii_case(month))
            .collect();

        EXPECTED_RETURN_TYPES
            .iter()
            .map(|return_type| {
                in_month
                    .iter()
                    .find(|entry| entry.return_type.eq_ignore_ascii_case(return_type))
                    .map(|entry| (*entry).clone())
                    .unwrap_or_else(|| placeholder(return_type, month))
            })
            .collect()
    };

    ReconciledRecord {
        gstin: raw.gstin.clone(),
        business_unit: raw.business_unit.clone(),
        entries,
        status: PROCESSED_STATUS.to_string(),
    }
}

fn placeholder(return_type: &str, month: &str) -> FilingStatusEntry {
    FilingStatusEntry {
        tax_period: month.to_string(),
        return_type: return_type.to_string(),
        status: NO_RECORD_FOUND.to_string(),
        ..FilingStatusEntry::default()
    }
}
