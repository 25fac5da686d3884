//! Pipeline data types: identifiers, remote filing-status payloads and
//! reconciled report records.
//!
//! Field names on the wire follow the remote filing-status service
//! (`gstn`, `businessUnit`, `filingStatus`, `fy`, `taxp`, `rtntype`, ...).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PeriodError;

/// Calendar month names accepted as a reporting month.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Reporting years offered by the period picker.
pub const OFFERED_YEARS: [&str; 6] = ["2020", "2021", "2022", "2023", "2024", "2025"];

// ──────────────────────────────────────────────
// Gstin
// ──────────────────────────────────────────────

/// A taxpayer identifier: trimmed, non-empty, case preserved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Gstin(String);

impl Gstin {
    /// Trim `raw` and wrap it. Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Gstin(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Gstin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ──────────────────────────────────────────────
// FilingStatusEntry
// ──────────────────────────────────────────────

/// One return filing as reported by the remote service.
///
/// Every field is a plain string; an empty string means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingStatusEntry {
    #[serde(rename = "fy", default, deserialize_with = "null_as_default")]
    pub financial_year: String,
    /// Expected to be a calendar month name, e.g. "April".
    #[serde(rename = "taxp", default, deserialize_with = "null_as_default")]
    pub tax_period: String,
    #[serde(rename = "mof", default, deserialize_with = "null_as_default")]
    pub mode_of_filing: String,
    #[serde(rename = "dof", default, deserialize_with = "null_as_default")]
    pub date_of_filing: String,
    /// `GSTR1`, `GSTR3B`, ...
    #[serde(rename = "rtntype", default, deserialize_with = "null_as_default")]
    pub return_type: String,
    /// Acknowledgment reference number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub arn: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

// ──────────────────────────────────────────────
// RawFilingRecord
// ──────────────────────────────────────────────

/// The remote service's answer for one GSTIN, before reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilingRecord {
    /// Overwritten with the requested GSTIN by the status client.
    #[serde(rename = "gstn", default, deserialize_with = "null_as_default")]
    pub gstin: String,
    #[serde(default)]
    pub business_unit: Option<String>,
    /// Outer grouping is service-defined (typically one group per financial year).
    #[serde(default, deserialize_with = "null_as_default")]
    pub filing_status: Vec<Vec<FilingStatusEntry>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

// ──────────────────────────────────────────────
// ReconciledRecord
// ──────────────────────────────────────────────

/// One report unit per GSTIN, holding exactly one entry per expected
/// return type in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledRecord {
    pub gstin: String,
    pub business_unit: Option<String>,
    pub entries: Vec<FilingStatusEntry>,
    pub status: String,
}

// ──────────────────────────────────────────────
// ReportingPeriod
// ──────────────────────────────────────────────

/// The (month, year) pair a report is built for.
///
/// The month is kept exactly as the caller typed it, since it is echoed
/// into synthesized "No Record Found" entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportingPeriod {
    month: String,
    year: String,
}

impl ReportingPeriod {
    /// Validate a caller-selected month name and four-digit year.
    pub fn parse(month: &str, year: &str) -> Result<Self, PeriodError> {
        let month = month.trim();
        if !MONTHS.iter().any(|m| m.eq_ignore_ascii_case(month)) {
            return Err(PeriodError::UnknownMonth(month.to_string()));
        }

        let year = year.trim();
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PeriodError::InvalidYear(year.to_string()));
        }

        Ok(ReportingPeriod {
            month: month.to_string(),
            year: year.to_string(),
        })
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn year(&self) -> &str {
        &self.year
    }
}

/// Decode JSON `null` the same way as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gstin_trims_and_rejects_blank() {
        assert_eq!(
            Gstin::new("  29ABCDE1234F1Z5 ").map(|g| g.to_string()),
            Some("29ABCDE1234F1Z5".to_string())
        );
        assert!(Gstin::new("").is_none());
        assert!(Gstin::new(" \t ").is_none());
    }

    #[test]
    fn gstin_preserves_case() {
        let lower = Gstin::new("29abcde1234f1z5").unwrap();
        let upper = Gstin::new("29ABCDE1234F1Z5").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn raw_record_decodes_service_payload() {
        let json = serde_json::json!({
            "gstn": "ignored",
            "businessUnit": "North",
            "status": "Success",
            "filingStatus": [[{
                "fy": "2024-2025",
                "taxp": "April",
                "mof": "ONLINE",
                "dof": "11-05-2024",
                "rtntype": "GSTR1",
                "arn": "AA290424123456X",
                "status": "Filed"
            }]]
        });
        let record: RawFilingRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.business_unit.as_deref(), Some("North"));
        assert_eq!(record.filing_status.len(), 1);
        let entry = &record.filing_status[0][0];
        assert_eq!(entry.tax_period, "April");
        assert_eq!(entry.return_type, "GSTR1");
        assert_eq!(entry.arn, "AA290424123456X");
    }

    #[test]
    fn raw_record_treats_null_as_empty() {
        let json = serde_json::json!({
            "gstn": null,
            "filingStatus": null,
            "status": null,
        });
        let record: RawFilingRecord = serde_json::from_value(json).unwrap();
        assert!(record.gstin.is_empty());
        assert!(record.filing_status.is_empty());
        assert!(record.business_unit.is_none());

        let entry: FilingStatusEntry =
            serde_json::from_value(serde_json::json!({"taxp": "May", "arn": null})).unwrap();
        assert_eq!(entry.tax_period, "May");
        assert_eq!(entry.arn, "");
        assert_eq!(entry.status, "");
    }

    #[test]
    fn period_accepts_any_case_and_keeps_it() {
        let period = ReportingPeriod::parse("april", "2024").unwrap();
        assert_eq!(period.month(), "april");
        assert_eq!(period.year(), "2024");
    }

    #[test]
    fn period_rejects_unknown_month_and_bad_year() {
        assert_eq!(
            ReportingPeriod::parse("Apr", "2024"),
            Err(PeriodError::UnknownMonth("Apr".to_string()))
        );
        assert_eq!(
            ReportingPeriod::parse("April", "24"),
            Err(PeriodError::InvalidYear("24".to_string()))
        );
        assert_eq!(
            ReportingPeriod::parse("April", "2O24"),
            Err(PeriodError::InvalidYear("2O24".to_string()))
        );
    }
}
