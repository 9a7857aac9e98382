//! Report pipeline orchestration.
//!
//! [`ReportService`] sequences the whole correction: load the source report,
//! transform the working table (rename, filter, derive, sort, style), persist
//! the intermediate workbook, then run the in-place formatting pass. Either
//! both phases complete and the returned path is valid, or the error
//! propagates and no usable file is guaranteed.

use crate::error::ReportResult;
use crate::excel::{exporter, importer, WorkbookFormatter};
use crate::formula;
use crate::layout::ReportLayout;
use crate::table::{CellValue, WorkingTable};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

pub struct ReportService {
    media_root: PathBuf,
    layout: ReportLayout,
    unique_paths: bool,
}

impl ReportService {
    /// Branch label marking spreadsheet subtotal rows; these are dropped
    /// before any recomputation.
    pub const TOTAL_SENTINEL: &'static str = "Итого";

    /// Reported-total column label, preserved verbatim from the input header.
    pub const COMPUTED_TOTAL: &'static str = "Исчислено всего";

    /// Derived column labels.
    pub const FORMULA_TOTAL: &'static str = "Исчислено всего по формуле";
    pub const DEVIATION: &'static str = "Отклонения";

    /// Domain names for the positionally selected source columns.
    pub const BRANCH: &'static str = "Филиал";
    pub const EMPLOYEE: &'static str = "Сотрудник";
    pub const TAX_BASE: &'static str = "Налоговая база";

    /// Positional renames applied right after the column subset is
    /// materialized, before any other column operation. The reported-total
    /// column (position 3) is never renamed.
    const RENAMES: [(usize, &'static str); 3] = [
        (0, Self::BRANCH),
        (1, Self::EMPLOYEE),
        (2, Self::TAX_BASE),
    ];

    pub fn new<P: Into<PathBuf>>(media_root: P) -> Self {
        Self {
            media_root: media_root.into(),
            layout: ReportLayout::default(),
            unique_paths: false,
        }
    }

    pub fn with_layout(mut self, layout: ReportLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Write each report to a unique per-invocation file instead of the
    /// fixed `<stem>.xlsx` slot. Avoids concurrent invocations racing on one
    /// path; cleanup of the generated files is the caller's job.
    pub fn with_unique_paths(mut self, unique: bool) -> Self {
        self.unique_paths = unique;
        self
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Run the full pipeline on an .xlsx file, returning the report path.
    pub fn create_report(&self, input: &Path) -> ReportResult<PathBuf> {
        let table = importer::load_table(input)?;
        self.run_pipeline(table)
    }

    /// Same, from any seekable byte source (e.g. an uploaded file body).
    pub fn create_report_from<RS: Read + Seek>(&self, input: RS) -> ReportResult<PathBuf> {
        let table = importer::load_table_from(input)?;
        self.run_pipeline(table)
    }

    /// Tabular phase only: load and transform without writing any file.
    pub fn build_table(&self, input: &Path) -> ReportResult<WorkingTable> {
        let table = importer::load_table(input)?;
        self.transform(table)
    }

    fn run_pipeline(&self, table: WorkingTable) -> ReportResult<PathBuf> {
        let table = self.transform(table)?;

        std::fs::create_dir_all(&self.media_root)?;
        let path = self.output_path();
        exporter::write_table(&table, &path, &self.layout.sheet_name)?;
        info!(path = %path.display(), rows = table.row_count(), "corrected report written");

        WorkbookFormatter::new(&self.layout).format_in_place(&path)?;
        info!(path = %path.display(), "report formatted");

        Ok(path)
    }

    /// The transformation stages, in their fixed order. Each stage consumes
    /// the table the previous one produced.
    fn transform(&self, mut table: WorkingTable) -> ReportResult<WorkingTable> {
        info!(rows = table.row_count(), "source report loaded");

        for (position, name) in Self::RENAMES {
            table.rename_position(position, name)?;
        }

        let dropped = table.filter_out(Self::BRANCH, Self::TOTAL_SENTINEL)?;
        debug!(dropped, "subtotal rows removed");

        // Both derivations depend on the reported-total column keeping its
        // original label through the rename step.
        table.column_index(Self::COMPUTED_TOTAL)?;

        table.derive_column(Self::FORMULA_TOTAL, |row| {
            match formula::compute_formula_total(
                row.number(Self::TAX_BASE),
                row.number(Self::COMPUTED_TOTAL),
            ) {
                Some(value) => CellValue::Number(value),
                None => CellValue::Empty,
            }
        })?;

        table.derive_column(Self::DEVIATION, |row| {
            match formula::compute_deviation(
                row.number(Self::COMPUTED_TOTAL),
                row.number(Self::FORMULA_TOTAL),
            ) {
                Some(value) => CellValue::Number(value),
                None => CellValue::Empty,
            }
        })?;

        table.sort_by_column(Self::DEVIATION, self.layout.sort_ascending)?;

        table.style_column(Self::DEVIATION, |value| {
            formula::classify_deviation(value.as_number(), &self.layout.highlight_color)
        })?;

        debug!(rows = table.row_count(), "working table transformed");
        Ok(table)
    }

    fn output_path(&self) -> PathBuf {
        let stem = &self.layout.file_stem;
        let file_name = if self.unique_paths {
            format!("{stem}-{}.xlsx", Uuid::new_v4())
        } else {
            format!("{stem}.xlsx")
        };
        self.media_root.join(file_name)
    }
}
