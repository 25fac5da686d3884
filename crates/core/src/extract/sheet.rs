use std::collections::BTreeSet;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use super::is_gstn_header;
use crate::error::ExtractError;
use crate::model::Gstin;

/// Last absolute sheet row that may hold the header (one title row is
/// allowed above it).
const HEADER_SCAN_LAST_ROW: u32 = 1;

/// Spreadsheet path: first sheet only, `.xls` and `.xlsx` detected from the
/// bytes.
pub(super) fn gstins_from_spreadsheet(bytes: &[u8]) -> Result<BTreeSet<Gstin>, ExtractError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
        ExtractError::UnreadableDocument(format!("the file cannot be processed: {e}"))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExtractError::UnreadableDocument("workbook has no sheets".to_string()))?
        .map_err(|e| ExtractError::UnreadableDocument(format!("error reading the file: {e}")))?;

    gstins_from_range(&range)
}

/// Walk a sheet grid using absolute coordinates.
pub(super) fn gstins_from_range(range: &Range<Data>) -> Result<BTreeSet<Gstin>, ExtractError> {
    let header_row = (0..=HEADER_SCAN_LAST_ROW)
        .find(|&row| gstn_column(range, row).is_some())
        .ok_or(ExtractError::HeaderNotFound)?;
    let column = gstn_column(range, header_row).ok_or(ExtractError::ColumnNotFound)?;

    let mut gstins = BTreeSet::new();
    let Some((last_row, _)) = range.end() else {
        return Ok(gstins);
    };
    for row in header_row + 1..=last_row {
        if let Some(gstin) = cell_text(range, row, column).and_then(|text| Gstin::new(&text)) {
            gstins.insert(gstin);
        }
    }
    Ok(gstins)
}

/// Index of the first cell in `row` that names the GSTN column.
fn gstn_column(range: &Range<Data>, row: u32) -> Option<u32> {
    let (_, last_col) = range.end()?;
    (0..=last_col).find(|&col| cell_text(range, row, col).is_some_and(|text| is_gstn_header(&text)))
}

fn cell_text(range: &Range<Data>, row: u32, col: u32) -> Option<String> {
    match range.get_value((row, col))? {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
