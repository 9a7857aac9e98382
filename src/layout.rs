//! Report layout configuration.
//!
//! Every styling and formatting constant of the corrected report lives in one
//! [`ReportLayout`] value, so alternate layouts can be composed from a YAML
//! file instead of code changes. The defaults reproduce the canonical report
//! layout expected by downstream consumers.

use crate::error::ReportResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One merged header region, in 1-based row/column coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSpan {
    pub start_row: u32,
    pub end_row: u32,
    pub start_col: u32,
    pub end_col: u32,
}

/// Styling and formatting configuration for the corrected report.
///
/// Fields not present in a YAML override file keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// Single sheet name of the output workbook.
    pub sheet_name: String,
    /// Base name of the output file (`<stem>.xlsx`).
    pub file_stem: String,
    /// Sort direction for the deviation column.
    pub sort_ascending: bool,
    /// Fill color for rows with zero deviation.
    pub highlight_color: String,
    /// Background fill of the two header rows (RGB hex).
    pub header_fill: String,
    pub font_name: String,
    pub font_size: f64,
    /// Synthetic super-header spanning the two computed-total columns.
    pub tax_super_header: String,
    /// Header band depth in rows.
    pub header_rows: u32,
    /// Column count of the report; reused by every formatting pass.
    pub header_columns: u32,
    pub merge_spans: Vec<MergeSpan>,
    /// Explicit width per column letter.
    pub column_widths: Vec<(String, f64)>,
    /// Explicit height per 1-based row number.
    pub row_heights: Vec<(u32, f64)>,
    /// Header cells that get center/center/wrap alignment. Cells covered by a
    /// vertical merge inherit theirs from the row-1 counterpart and are not
    /// listed.
    pub aligned_cells: Vec<String>,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            sheet_name: "Лист1".to_string(),
            file_stem: "report".to_string(),
            sort_ascending: false,
            highlight_color: "green".to_string(),
            header_fill: "cbe4e5".to_string(),
            font_name: "Arial".to_string(),
            font_size: 10.0,
            tax_super_header: "Налог".to_string(),
            header_rows: 2,
            header_columns: 6,
            merge_spans: vec![
                MergeSpan { start_row: 1, end_row: 2, start_col: 1, end_col: 1 },
                MergeSpan { start_row: 1, end_row: 2, start_col: 2, end_col: 2 },
                MergeSpan { start_row: 1, end_row: 2, start_col: 3, end_col: 3 },
                MergeSpan { start_row: 1, end_row: 1, start_col: 4, end_col: 5 },
                MergeSpan { start_row: 1, end_row: 2, start_col: 6, end_col: 6 },
            ],
            column_widths: vec![
                ("A".to_string(), 30.0),
                ("B".to_string(), 20.0),
                ("C".to_string(), 20.0),
                ("D".to_string(), 20.0),
                ("E".to_string(), 20.0),
                ("F".to_string(), 20.0),
            ],
            row_heights: vec![(1, 12.0), (2, 27.0)],
            aligned_cells: vec![
                "A1".to_string(),
                "B1".to_string(),
                "C1".to_string(),
                "D1".to_string(),
                "D2".to_string(),
                "E2".to_string(),
                "F1".to_string(),
            ],
        }
    }
}

impl ReportLayout {
    /// Load a layout from a YAML file. Missing fields fall back to defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn to_yaml(&self) -> ReportResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
