//! In-place workbook formatting - the visual pass over the persisted report.
//!
//! Reopens the file written by the exporter and applies the header layout:
//! a thin spacer row is inserted on top, the original header row becomes the
//! sub-header row, and the fixed super-header labels, merges, alignment,
//! column widths, row heights, fonts and fills are written over the result.
//! Data cells are untouched apart from the base font.

use crate::error::{ReportError, ReportResult};
use crate::excel::column_letter;
use crate::layout::ReportLayout;
use std::path::Path;
use umya_spreadsheet::{HorizontalAlignmentValues, VerticalAlignmentValues, Worksheet};

pub struct WorkbookFormatter<'a> {
    layout: &'a ReportLayout,
}

impl<'a> WorkbookFormatter<'a> {
    pub fn new(layout: &'a ReportLayout) -> Self {
        Self { layout }
    }

    /// Format the workbook at `path` and save it back to the same path.
    ///
    /// The file must be the one the exporter just wrote; if it was deleted or
    /// moved in between, the IO error propagates and the pipeline aborts.
    pub fn format_in_place(&self, path: &Path) -> ReportResult<()> {
        std::fs::metadata(path)?;

        let mut book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| ReportError::Format(format!("failed to reopen workbook: {e}")))?;
        let sheet = book
            .get_sheet_by_name_mut(&self.layout.sheet_name)
            .ok_or_else(|| {
                ReportError::Format(format!(
                    "sheet '{}' not found in workbook",
                    self.layout.sheet_name
                ))
            })?;

        let captured_headers = self.capture_headers(sheet);

        // Everything below shifts down one row; the old header row becomes
        // the sub-header row 2.
        sheet.insert_new_row(&1, &1);

        self.set_super_headers(sheet, &captured_headers);
        self.merge_header_cells(sheet);
        self.align_header_cells(sheet);
        self.set_column_widths(sheet);
        self.set_row_heights(sheet);
        self.apply_base_font(sheet);
        self.apply_header_style(sheet);

        umya_spreadsheet::writer::xlsx::write(&book, path)
            .map_err(|e| ReportError::Format(format!("failed to save workbook: {e}")))?;

        Ok(())
    }

    /// Header labels as written by the exporter, captured before the row
    /// insertion moves them.
    fn capture_headers(&self, sheet: &Worksheet) -> Vec<String> {
        (1..=self.layout.header_columns)
            .map(|col| sheet.get_value((col, 1)))
            .collect()
    }

    /// The fixed super-header mapping: branch, employee and tax-base keep
    /// their captured labels, D1 becomes the synthetic tax super-header
    /// spanning the two computed-total sub-columns, F1 gets the deviation
    /// label. E1 and the row-2 sub-headers stay as the shift left them.
    fn set_super_headers(&self, sheet: &mut Worksheet, captured: &[String]) {
        sheet.get_cell_mut("A1").set_value(captured[0].as_str());
        sheet.get_cell_mut("B1").set_value(captured[1].as_str());
        sheet.get_cell_mut("C1").set_value(captured[2].as_str());
        sheet
            .get_cell_mut("D1")
            .set_value(self.layout.tax_super_header.as_str());
        if let Some(last) = captured.last() {
            sheet.get_cell_mut("F1").set_value(last.as_str());
        }
    }

    fn merge_header_cells(&self, sheet: &mut Worksheet) {
        for span in &self.layout.merge_spans {
            let range = format!(
                "{}{}:{}{}",
                column_letter(span.start_col),
                span.start_row,
                column_letter(span.end_col),
                span.end_row
            );
            sheet.add_merge_cells(&range);
        }
    }

    fn align_header_cells(&self, sheet: &mut Worksheet) {
        for coordinate in &self.layout.aligned_cells {
            let alignment = sheet
                .get_style_mut(coordinate.as_str())
                .get_alignment_mut();
            alignment.set_horizontal(HorizontalAlignmentValues::Center);
            alignment.set_vertical(VerticalAlignmentValues::Center);
            alignment.set_wrap_text(true);
        }
    }

    fn set_column_widths(&self, sheet: &mut Worksheet) {
        for (column, width) in &self.layout.column_widths {
            sheet.get_column_dimension_mut(column).set_width(*width);
        }
    }

    fn set_row_heights(&self, sheet: &mut Worksheet) {
        for (row, height) in &self.layout.row_heights {
            sheet.get_row_dimension_mut(row).set_height(*height);
        }
    }

    /// Base font over every row of the report's columns.
    fn apply_base_font(&self, sheet: &mut Worksheet) {
        let last_row = sheet.get_highest_row();
        for row in 1..=last_row {
            for col in 1..=self.layout.header_columns {
                let font = sheet.get_style_mut((col, row)).get_font_mut();
                font.set_name(self.layout.font_name.as_str());
                font.set_size(self.layout.font_size);
            }
        }
    }

    /// Bold font and background fill over the header band. Overwrites the
    /// base font for rows 1..header_rows, leaves data rows alone.
    fn apply_header_style(&self, sheet: &mut Worksheet) {
        let fill = argb(&self.layout.header_fill);
        for row in 1..=self.layout.header_rows {
            for col in 1..=self.layout.header_columns {
                let style = sheet.get_style_mut((col, row));
                style.set_background_color(fill.as_str());
                let font = style.get_font_mut();
                font.set_name(self.layout.font_name.as_str());
                font.set_size(self.layout.font_size);
                font.set_bold(true);
            }
        }
    }
}

/// Normalize a 6-digit RGB hex to the ARGB form the workbook stores.
fn argb(color: &str) -> String {
    let hex = color.trim_start_matches('#');
    if hex.len() == 6 {
        format!("FF{}", hex.to_uppercase())
    } else {
        hex.to_uppercase()
    }
}
