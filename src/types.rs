use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{GroupdocError, GroupdocResult};

/// Display format for date cells (day-month-year)
pub const DATE_DISPLAY_FORMAT: &str = "%d-%m-%Y";

/// Largest integer an f64 represents exactly (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

//==============================================================================
// Cell values
//==============================================================================

/// A single typed cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    /// Missing marker
    Empty,
}

impl CellValue {
    /// Build a text cell, mapping blank/whitespace-only strings to `Empty`
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Canonical string form; group keys and filters compare on this.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_plain_number(*n)),
            CellValue::Date(d) => write!(f, "{}", d.format(DATE_DISPLAY_FORMAT)),
            CellValue::Empty => Ok(()),
        }
    }
}

/// Integral values print without a fraction, everything else uses the shortest float form
pub fn format_plain_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

//==============================================================================
// Table
//==============================================================================

/// Named column of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every value is missing
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(CellValue::is_empty)
    }

    /// At least one value, and every non-missing value is a number
    pub fn is_numeric(&self) -> bool {
        let mut seen = false;
        for value in &self.values {
            match value {
                CellValue::Number(_) => seen = true,
                CellValue::Empty => {}
                _ => return false,
            }
        }
        seen
    }

    /// Longest canonical string, in characters
    pub fn max_value_chars(&self) -> usize {
        self.values
            .iter()
            .map(|v| v.to_string().chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Ordered set of equally long, uniquely named columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns, validating length and name uniqueness
    pub fn from_columns(columns: Vec<Column>) -> GroupdocResult<Self> {
        let mut table = Table::new();
        for column in columns {
            table.add_column(column)?;
        }
        Ok(table)
    }

    pub fn add_column(&mut self, column: Column) -> GroupdocResult<()> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(GroupdocError::InvalidTable(format!(
                "duplicate column name '{}'",
                column.name
            )));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(GroupdocError::InvalidTable(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.len(),
                    first.len()
                )));
            }
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Cells of one row, in column order
    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// Canonical strings of one row
    pub fn row_strings(&self, index: usize) -> Option<Vec<String>> {
        self.row(index)
            .map(|cells| cells.into_iter().map(|c| c.to_string()).collect())
    }

    /// New table holding the given rows in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                Column::new(
                    c.name.clone(),
                    indices
                        .iter()
                        .filter_map(|&i| c.values.get(i).cloned())
                        .collect(),
                )
            })
            .collect();
        Table { columns }
    }

    /// Keep only columns accepted by the predicate
    pub fn retain_columns<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Column) -> bool,
    {
        self.columns.retain(|c| keep(c));
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }
}

//==============================================================================
// Dataset
//==============================================================================

/// A normalized table with its resolved grouping column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    table: Table,
    grouping_column: String,
}

impl Dataset {
    pub fn new(table: Table, grouping_column: impl Into<String>) -> GroupdocResult<Self> {
        let grouping_column = grouping_column.into();
        if table.column(&grouping_column).is_none() {
            return Err(GroupdocError::GroupingColumnNotFound(format!(
                "'{}' is not a column of the table",
                grouping_column
            )));
        }
        Ok(Self {
            table,
            grouping_column,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn grouping_column(&self) -> &str {
        &self.grouping_column
    }

    /// Values of the grouping column
    pub fn grouping_values(&self) -> &[CellValue] {
        self.table
            .column(&self.grouping_column)
            .map(|c| c.values.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct non-missing group keys, sorted
    pub fn group_keys(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keys: Vec<String> = self
            .grouping_values()
            .iter()
            .filter(|v| !v.is_empty())
            .map(CellValue::canonical)
            .filter(|k| seen.insert(k.clone()))
            .collect();
        keys.sort();
        keys
    }
}
