//! Source report loader - .xlsx → working table.
//!
//! The source layout is fixed: the first physical row is a discarded
//! super-header, the second holds column labels, and only columns 0, 1, 4
//! and 5 of the sheet are read. That positional contract is validated here
//! so a reshaped upload fails loudly instead of silently renaming the wrong
//! column downstream.

use crate::error::{ReportError, ReportResult};
use crate::table::{CellValue, WorkingTable};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::io::{Read, Seek};
use std::path::Path;

/// Sheet columns read from the source report, in working-table order.
pub const COLUMN_SELECTION: [usize; 4] = [0, 1, 4, 5];

/// 0-based index of the physical row holding the column labels.
pub const HEADER_ROW: usize = 1;

/// Load the first sheet of an .xlsx file into a working table.
pub fn load_table<P: AsRef<Path>>(path: P) -> ReportResult<WorkingTable> {
    let workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| ReportError::InputFormat(format!("failed to open workbook: {e}")))?;
    read_first_sheet(workbook)
}

/// Load from any seekable byte source (an uploaded file body, a cursor).
pub fn load_table_from<RS: Read + Seek>(source: RS) -> ReportResult<WorkingTable> {
    let workbook = Xlsx::new(source)
        .map_err(|e| ReportError::InputFormat(format!("failed to open workbook: {e}")))?;
    read_first_sheet(workbook)
}

fn read_first_sheet<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> ReportResult<WorkingTable> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::InputFormat("workbook has no sheets".to_string()))?
        .map_err(|e| ReportError::InputFormat(format!("unreadable sheet: {e}")))?;
    table_from_range(&range)
}

/// Build the working table from a cell range: validate the shape, take the
/// labels from the header row, then the data rows below it.
pub fn table_from_range(range: &Range<Data>) -> ReportResult<WorkingTable> {
    let (height, width) = range.get_size();

    let required_width = COLUMN_SELECTION.iter().max().unwrap() + 1;
    if width < required_width {
        return Err(ReportError::InputFormat(format!(
            "expected a sheet with at least {required_width} columns, found {width}"
        )));
    }
    if height < HEADER_ROW + 1 {
        return Err(ReportError::InputFormat(
            "sheet has no header row".to_string(),
        ));
    }

    let headers: Vec<String> = COLUMN_SELECTION
        .iter()
        .map(|&col| header_name(range.get((HEADER_ROW, col)), col))
        .collect();

    let mut table = WorkingTable::new(headers)?;
    for row in (HEADER_ROW + 1)..height {
        let cells = COLUMN_SELECTION
            .iter()
            .map(|&col| convert_cell(range.get((row, col))))
            .collect();
        table.push_row(cells)?;
    }

    Ok(table)
}

/// Header label for a selected column. Blank header cells get a positional
/// placeholder so names stay unique until the rename step replaces them.
fn header_name(cell: Option<&Data>, column: usize) -> String {
    let label = match cell {
        Some(Data::Empty) | None => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    if label.is_empty() {
        format!("col_{column}")
    } else {
        label
    }
}

fn convert_cell(cell: Option<&Data>) -> CellValue {
    match cell {
        None | Some(Data::Empty) => CellValue::Empty,
        Some(Data::Float(f)) => CellValue::Number(*f),
        Some(Data::Int(i)) => CellValue::Number(*i as f64),
        Some(Data::String(s)) => CellValue::Text(s.clone()),
        Some(other) => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2 header rows + data over 6 sheet columns, like the real reports.
    fn sample_range(data_rows: &[[Data; 6]]) -> Range<Data> {
        let height = (2 + data_rows.len()) as u32;
        let mut range = Range::new((0, 0), (height - 1, 5));
        range.set_value((0, 0), Data::String("Сводный отчет".to_string()));
        let labels = ["", "", "Оклад", "Премия", "Налоговая база за год", "Исчислено всего"];
        for (col, label) in labels.iter().enumerate() {
            if !label.is_empty() {
                range.set_value((1, col as u32), Data::String(label.to_string()));
            }
        }
        for (row, cells) in data_rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                range.set_value((2 + row as u32, col as u32), cell.clone());
            }
        }
        range
    }

    #[test]
    fn test_loads_selected_columns_only() {
        let range = sample_range(&[[
            Data::String("Б1".to_string()),
            Data::String("Иванов".to_string()),
            Data::Float(50_000.0),
            Data::Float(10_000.0),
            Data::Float(1_000_000.0),
            Data::Float(130_000.0),
        ]]);
        let table = table_from_range(&range).unwrap();

        assert_eq!(table.column_count(), 4);
        assert_eq!(table.row_count(), 1);
        // Positions 0 and 1 had blank labels, position 4 and 5 keep theirs
        assert_eq!(table.column_names()[0], "col_0");
        assert_eq!(table.column_names()[1], "col_1");
        assert_eq!(table.column_names()[2], "Налоговая база за год");
        assert_eq!(table.column_names()[3], "Исчислено всего");

        let row = table.row(0).unwrap();
        assert_eq!(row.text("col_0"), Some("Б1"));
        assert_eq!(row.number("Налоговая база за год"), Some(1_000_000.0));
        assert_eq!(row.number("Исчислено всего"), Some(130_000.0));
    }

    #[test]
    fn test_empty_cells_become_empty_values() {
        let range = sample_range(&[[
            Data::String("Б2".to_string()),
            Data::String("Петров".to_string()),
            Data::Empty,
            Data::Empty,
            Data::Empty,
            Data::Float(999.0),
        ]]);
        let table = table_from_range(&range).unwrap();
        let row = table.row(0).unwrap();
        assert!(row.value("Налоговая база за год").unwrap().is_empty());
        assert_eq!(row.number("Исчислено всего"), Some(999.0));
    }

    #[test]
    fn test_narrow_sheet_rejected() {
        // Only 3 columns: position 5 of the contract cannot exist
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("x".to_string()));
        let result = table_from_range(&range);
        assert!(matches!(result, Err(ReportError::InputFormat(_))));
    }

    #[test]
    fn test_header_only_sheet_gives_empty_table() {
        let range = sample_range(&[]);
        let table = table_from_range(&range).unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 4);
    }

    #[test]
    fn test_missing_header_row_rejected() {
        let mut range = Range::new((0, 0), (0, 5));
        range.set_value((0, 0), Data::String("заголовок".to_string()));
        let result = table_from_range(&range);
        assert!(matches!(result, Err(ReportError::InputFormat(_))));
    }

    #[test]
    fn test_integer_cells_read_as_numbers() {
        let range = sample_range(&[[
            Data::String("Б3".to_string()),
            Data::String("Сидоров".to_string()),
            Data::Empty,
            Data::Empty,
            Data::Int(2_000_000),
            Data::Int(260_000),
        ]]);
        let table = table_from_range(&range).unwrap();
        let row = table.row(0).unwrap();
        assert_eq!(row.number("Налоговая база за год"), Some(2_000_000.0));
        assert_eq!(row.number("Исчислено всего"), Some(260_000.0));
    }
}
