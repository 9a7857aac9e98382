//! ndfl-report - payroll tax report corrector
//!
//! This library takes a payroll report workbook, recomputes the expected
//! NDFL total for every employee row, flags rows whose reported total
//! deviates from the recomputation, and emits a reformatted single-sheet
//! workbook with a styled two-row header and a color-coded deviation column.
//!
//! # Pipeline
//!
//! Data flows one way: raw spreadsheet → working table → intermediate file →
//! formatted file. The tabular phase (column selection and renaming, subtotal
//! filtering, derived columns, sorting, style tagging) and the visual phase
//! (header merges, fonts, fills) are deliberately separate passes over
//! separate representations, split by the serialized intermediate file.
//!
//! # Example
//!
//! ```no_run
//! use ndfl_report::ReportService;
//! use std::path::Path;
//!
//! let service = ReportService::new("media");
//! let path = service.create_report(Path::new("upload.xlsx"))?;
//! println!("Report: {}", path.display());
//! # Ok::<(), ndfl_report::ReportError>(())
//! ```

pub mod cli;
pub mod error;
pub mod excel;
pub mod formula;
pub mod layout;
pub mod service;
pub mod table;

// Re-export commonly used types
pub use error::{ReportError, ReportResult};
pub use layout::{MergeSpan, ReportLayout};
pub use service::ReportService;
pub use table::{Cell, CellValue, WorkingTable};
