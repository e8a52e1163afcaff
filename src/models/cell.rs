use chrono::{NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;

/// A single raw spreadsheet cell as delivered by a workbook reader
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Empty cells and whitespace-only text both count as blank
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(v) => v.is_nan(),
            Self::Text(s) => s.trim().is_empty(),
            Self::Time(_) | Self::DateTime(_) => false,
        }
    }

    /// Render the cell as trimmed text, `None` for blank cells
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        let text = match self {
            Self::Empty => return None,
            Self::Number(v) => format_number(*v),
            Self::Text(s) => s.trim().to_string(),
            Self::Time(t) => t.format("%H:%M:%S").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        Some(text)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

/// Integral floats print without a fractional part so numeric train numbers
/// read back as "4521" rather than "4521.0"
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

/// Rectangular cell grid of one sheet, merged ranges already expanded
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
    /// Columns the source workbook marks as hidden
    pub hidden_columns: BTreeSet<usize>,
}

impl SheetGrid {
    #[must_use]
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
            hidden_columns: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at (row, col); reads outside the grid yield an empty cell
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    #[must_use]
    pub fn is_hidden(&self, col: usize) -> bool {
        self.hidden_columns.contains(&col)
    }
}

/// All sheets of a workbook in their original order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<SheetGrid>,
}

impl Workbook {
    #[must_use]
    pub fn new(sheets: Vec<SheetGrid>) -> Self {
        Self { sheets }
    }

    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_cell_is_empty() {
        let grid = SheetGrid::new("S", vec![vec![CellValue::from("a")]]);
        assert_eq!(grid.cell(0, 0), &CellValue::Text("a".to_string()));
        assert_eq!(grid.cell(5, 5), &CellValue::Empty);
        assert_eq!(grid.cell(0, 1), &CellValue::Empty);
    }

    #[test]
    fn test_width_uses_longest_row() {
        let grid = SheetGrid::new(
            "S",
            vec![vec![CellValue::Empty], vec![CellValue::Empty, CellValue::Empty, CellValue::Empty]],
        );
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::Number(4521.0).as_text().as_deref(), Some("4521"));
        assert_eq!(CellValue::Number(12.5).as_text().as_deref(), Some("12.5"));
        assert_eq!(CellValue::Text("  Legnica ".to_string()).as_text().as_deref(), Some("Legnica"));
        assert_eq!(CellValue::Text("   ".to_string()).as_text(), None);
        assert_eq!(CellValue::Empty.as_text(), None);
    }
}
