//! Spreadsheet layouts for re-export
//!
//! Layouts are plain lists of cell placements with 1-based coordinates. A
//! byte-level writer turns them into a workbook; [`ExportSheet::to_csv`]
//! renders one sheet as CSV.

mod circuits;
mod timetable;

pub use circuits::{build_circuits, circuits_sheet, train_summaries, CircuitGroup, TrainSummary};
pub use timetable::{build_timetable_export, export_sheet_name};

use chrono::NaiveTime;
use serde::Serialize;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportValue {
    Text(String),
    Number {
        value: f64,
        /// Excel number format, e.g. `0.000`
        format: Option<&'static str>,
    },
    Time {
        value: NaiveTime,
        format: &'static str,
    },
}

impl ExportValue {
    /// Cell text as a spreadsheet would display it
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number { value, format: Some(fmt) } => {
                let decimals = fmt.split_once('.').map_or(0, |(_, d)| d.len());
                format!("{value:.decimals$}")
            }
            Self::Number { value, format: None } => {
                if value.fract() == 0.0 {
                    format!("{value:.0}")
                } else {
                    value.to_string()
                }
            }
            Self::Time { value, .. } => value.format("%-H:%M").to_string(),
        }
    }
}

impl From<&str> for ExportValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ExportValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellPlacement {
    pub row: u32,
    pub col: u32,
    pub value: ExportValue,
}

/// One output sheet as a list of placed cells
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExportSheet {
    pub name: String,
    pub cells: Vec<CellPlacement>,
}

impl ExportSheet {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: Vec::new(),
        }
    }

    /// Place a value at a 1-based (row, col); later placements win
    pub fn put(&mut self, row: u32, col: u32, value: impl Into<ExportValue>) {
        self.cells.push(CellPlacement {
            row,
            col,
            value: value.into(),
        });
    }

    /// The value last placed at (row, col)
    #[must_use]
    pub fn cell(&self, row: u32, col: u32) -> Option<&ExportValue> {
        self.cells
            .iter()
            .rev()
            .find(|c| c.row == row && c.col == col)
            .map(|c| &c.value)
    }

    /// Render the sheet as CSV, row 1 / column A at the top left
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV writer fails.
    pub fn to_csv(&self) -> Result<String> {
        let rows = self.cells.iter().map(|c| c.row).max().unwrap_or(0) as usize;
        let cols = self.cells.iter().map(|c| c.col).max().unwrap_or(0) as usize;

        let mut grid = vec![vec![String::new(); cols]; rows];
        for cell in &self.cells {
            if cell.row == 0 || cell.col == 0 {
                continue;
            }
            grid[cell.row as usize - 1][cell.col as usize - 1] = cell.value.display();
        }

        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
        for row in &grid {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let km = ExportValue::Number { value: 20.5, format: Some("0.000") };
        assert_eq!(km.display(), "20.500");
        let plain = ExportValue::Number { value: 4521.0, format: None };
        assert_eq!(plain.display(), "4521");
        let time = ExportValue::Time {
            value: NaiveTime::from_hms_opt(7, 5, 0).expect("valid"),
            format: "h:mm",
        };
        assert_eq!(time.display(), "7:05");
    }

    #[test]
    fn test_to_csv() {
        let mut sheet = ExportSheet::new("S");
        sheet.put(1, 2, "b1");
        sheet.put(3, 1, "a,3");
        sheet.put(1, 2, "B1");
        assert_eq!(sheet.cell(1, 2), Some(&ExportValue::Text("B1".to_string())));

        let csv = sheet.to_csv().expect("renders");
        assert_eq!(csv, ",B1\n,\n\"a,3\",\n");
    }

    #[test]
    fn test_empty_sheet_to_csv() {
        assert_eq!(ExportSheet::new("S").to_csv().expect("renders"), "");
    }
}
