//! Corrected report serialization - working table → .xlsx.
//!
//! Writes the single-sheet intermediate workbook: header labels on row 1,
//! data below, no index column. Fill tags carried by the table become solid
//! cell backgrounds here; all other styling is the formatter's job.

use crate::error::{ReportError, ReportResult};
use crate::table::{CellValue, WorkingTable};
use rust_xlsxwriter::{Color, Format, Workbook};
use std::collections::HashMap;
use std::path::Path;

/// Serialize the table to `path`, overwriting any previous file.
pub fn write_table(table: &WorkingTable, path: &Path, sheet_name: &str) -> ReportResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| ReportError::Export(format!("failed to set worksheet name: {e}")))?;

    for (col_idx, name) in table.column_names().iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, name)
            .map_err(|e| ReportError::Export(format!("failed to write header: {e}")))?;
    }

    // Formats are deduplicated per fill color across the whole sheet
    let mut fill_formats: HashMap<String, Format> = HashMap::new();

    for row_idx in 0..table.row_count() {
        for (col_idx, name) in table.column_names().iter().enumerate() {
            let cell = table
                .cell(row_idx, name)
                .ok_or_else(|| ReportError::Export(format!("missing cell at row {row_idx}")))?;
            let row = (row_idx + 1) as u32;
            let col = col_idx as u16;

            let format = cell.fill.as_deref().and_then(|fill| {
                fill_color(fill).map(|color| {
                    fill_formats
                        .entry(fill.to_string())
                        .or_insert_with(|| Format::new().set_background_color(color))
                        .clone()
                })
            });

            match (&cell.value, format) {
                (CellValue::Number(n), Some(format)) => worksheet
                    .write_number_with_format(row, col, *n, &format)
                    .map_err(|e| ReportError::Export(format!("failed to write number: {e}")))?,
                (CellValue::Number(n), None) => worksheet
                    .write_number(row, col, *n)
                    .map_err(|e| ReportError::Export(format!("failed to write number: {e}")))?,
                (CellValue::Text(s), Some(format)) => worksheet
                    .write_string_with_format(row, col, s, &format)
                    .map_err(|e| ReportError::Export(format!("failed to write text: {e}")))?,
                (CellValue::Text(s), None) => worksheet
                    .write_string(row, col, s)
                    .map_err(|e| ReportError::Export(format!("failed to write text: {e}")))?,
                (CellValue::Empty, Some(format)) => worksheet
                    .write_blank(row, col, &format)
                    .map_err(|e| ReportError::Export(format!("failed to write blank: {e}")))?,
                (CellValue::Empty, None) => continue,
            };
        }
    }

    workbook
        .save(path)
        .map_err(|e| ReportError::Export(format!("failed to save workbook: {e}")))?;

    Ok(())
}

/// Resolve a named fill color; unknown names fall back to RGB hex parsing.
fn fill_color(name: &str) -> Option<Color> {
    match name {
        "green" => Some(Color::Green),
        "red" => Some(Color::Red),
        other => u32::from_str_radix(other.trim_start_matches('#'), 16)
            .ok()
            .map(Color::RGB),
    }
}
