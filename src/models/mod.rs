mod cell;
mod edits;
mod station;
mod stop;
mod timetable;

pub use cell::{CellValue, SheetGrid, Workbook};
pub use edits::{CellEdit, ClearTimeRequest, SaveTimeRequest, TimeEdits};
pub use station::{stations_by_km, Station, StationMap};
pub use stop::{RecordKey, StopType, TrainStopRecord};
pub use timetable::{Sheet, StationCheck, Timetable};
