use std::collections::BTreeSet;

use super::is_gstn_header;
use crate::error::ExtractError;
use crate::model::Gstin;

/// CSV path: header in row 0, one GSTIN per subsequent row.
///
/// Rows shorter than the GSTN column are skipped. Quote characters left
/// inside a cell are stripped.
pub(super) fn gstins_from_csv(bytes: &[u8]) -> Result<BTreeSet<Gstin>, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = reader.records();

    let header = match rows.next() {
        Some(row) => row.map_err(unreadable)?,
        None => return Err(ExtractError::EmptyInput),
    };
    let column = header
        .iter()
        .position(is_gstn_header)
        .ok_or(ExtractError::ColumnNotFound)?;

    let mut gstins = BTreeSet::new();
    for row in rows {
        let row = row.map_err(unreadable)?;
        if let Some(gstin) = row.get(column).and_then(|cell| Gstin::new(&cell.replace('"', ""))) {
            gstins.insert(gstin);
        }
    }
    Ok(gstins)
}

fn unreadable(err: csv::Error) -> ExtractError {
    ExtractError::UnreadableDocument(format!("error processing the CSV file: {err}"))
}
