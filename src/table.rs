//! In-memory tabular model for the report pipeline.
//!
//! A [`WorkingTable`] is an ordered set of uniquely named columns over rows of
//! cells. The bulk operations mirror the pipeline stages: positional rename,
//! row filtering, row-wise column derivation, stable sort, and per-cell style
//! tagging. Style tags stay plain data (a named fill color) until the table
//! is serialized to a workbook.

use crate::error::{ReportError, ReportResult};

/// A single cell value as read from (or derived for) the report.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// A cell plus its optional fill tag (a named color, applied at serialization).
#[derive(Debug, Clone)]
pub struct Cell {
    pub value: CellValue,
    pub fill: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self { value, fill: None }
    }
}

/// Read-only view of one row, with access to cells by column name.
pub struct RowView<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl RowView<'_> {
    pub fn value(&self, column: &str) -> Option<&CellValue> {
        let index = self.columns.iter().position(|name| name == column)?;
        Some(&self.cells[index].value)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.value(column)?.as_number()
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.value(column)?.as_text()
    }

    pub fn fill(&self, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.cells[index].fill.as_deref()
    }
}

/// Ordered columns with unique names over rows of cells.
#[derive(Debug, Clone, Default)]
pub struct WorkingTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl WorkingTable {
    /// Create an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> ReportResult<Self> {
        for (index, name) in columns.iter().enumerate() {
            if columns[..index].contains(name) {
                return Err(ReportError::InputFormat(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Append a row; its width must match the column count.
    pub fn push_row(&mut self, values: Vec<CellValue>) -> ReportResult<()> {
        if values.len() != self.columns.len() {
            return Err(ReportError::InputFormat(format!(
                "row has {} cells, expected {}",
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(values.into_iter().map(Cell::new).collect());
        Ok(())
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a named column, or `MissingColumn`.
    pub fn column_index(&self, name: &str) -> ReportResult<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
    }

    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.columns.iter().position(|name| name == column)?;
        Some(&self.rows.get(row)?[index])
    }

    /// Rename the column at `position`. The new name must stay unique.
    pub fn rename_position(&mut self, position: usize, new_name: &str) -> ReportResult<()> {
        if position >= self.columns.len() {
            return Err(ReportError::MissingColumn(format!(
                "no column at position {position}"
            )));
        }
        if self.columns[position] != new_name && self.columns.iter().any(|name| name == new_name) {
            return Err(ReportError::InputFormat(format!(
                "rename collision: column '{new_name}' already exists"
            )));
        }
        self.columns[position] = new_name.to_string();
        Ok(())
    }

    /// Drop every row whose cell in `column` equals the given text sentinel.
    /// Returns how many rows were removed.
    pub fn filter_out(&mut self, column: &str, sentinel: &str) -> ReportResult<usize> {
        let index = self.column_index(column)?;
        let before = self.rows.len();
        self.rows
            .retain(|cells| cells[index].value.as_text() != Some(sentinel));
        Ok(before - self.rows.len())
    }

    /// Append a new column computed row-wise from the existing ones.
    pub fn derive_column<F>(&mut self, name: &str, f: F) -> ReportResult<()>
    where
        F: Fn(RowView<'_>) -> CellValue,
    {
        if self.columns.iter().any(|column| column == name) {
            return Err(ReportError::InputFormat(format!(
                "derived column '{name}' already exists"
            )));
        }
        let values: Vec<CellValue> = self
            .rows
            .iter()
            .map(|cells| {
                f(RowView {
                    columns: &self.columns,
                    cells,
                })
            })
            .collect();
        self.columns.push(name.to_string());
        for (cells, value) in self.rows.iter_mut().zip(values) {
            cells.push(Cell::new(value));
        }
        Ok(())
    }

    /// Stable sort on a numeric column. Rows whose cell is not a number sort
    /// after all numeric rows regardless of direction.
    pub fn sort_by_column(&mut self, column: &str, ascending: bool) -> ReportResult<()> {
        let index = self.column_index(column)?;
        self.rows.sort_by(|a, b| {
            match (a[index].value.as_number(), b[index].value.as_number()) {
                (Some(x), Some(y)) => {
                    let order = x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal);
                    if ascending {
                        order
                    } else {
                        order.reverse()
                    }
                }
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
        Ok(())
    }

    /// Tag cells of one column with fill colors chosen per value.
    pub fn style_column<F>(&mut self, column: &str, f: F) -> ReportResult<()>
    where
        F: Fn(&CellValue) -> Option<String>,
    {
        let index = self.column_index(column)?;
        for cells in &mut self.rows {
            cells[index].fill = f(&cells[index].value);
        }
        Ok(())
    }
}
