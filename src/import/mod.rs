pub mod csv;
pub mod headers;
pub mod shared;
pub mod stations;
pub mod trains;
pub mod workbook;

// Re-export commonly used items
pub use csv::CsvSheetReader;
pub use headers::{find_headers, HeaderPositions, StationRange};
pub use stations::{extract_stations, StationRow};
pub use trains::extract_train_columns;
pub use workbook::{extract_workbook, Extraction, WorkbookReader};
