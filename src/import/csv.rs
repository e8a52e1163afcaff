use crate::error::Result;
use crate::import::workbook::WorkbookReader;
use crate::models::{CellValue, SheetGrid, Workbook};

/// Reads a single CSV file as a one-sheet workbook
///
/// Every field stays text; the time and km parsers take care of numeric
/// content. Empty fields become [`CellValue::Empty`].
#[derive(Debug, Clone)]
pub struct CsvSheetReader {
    pub sheet_name: String,
    pub delimiter: u8,
}

impl CsvSheetReader {
    #[must_use]
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            delimiter: b',',
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse CSV text into a grid
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be read.
    pub fn read_sheet(&self, content: &str) -> Result<SheetGrid> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|field| CellValue::from(field.trim())).collect());
        }

        Ok(SheetGrid::new(self.sheet_name.clone(), rows))
    }
}

impl WorkbookReader for CsvSheetReader {
    fn read_workbook(&self, bytes: &[u8]) -> Result<Workbook> {
        let content = String::from_utf8(bytes.to_vec())?;
        Ok(Workbook::new(vec![self.read_sheet(&content)?]))
    }
}
