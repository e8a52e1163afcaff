use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::constants::{PROJECT_FORMAT, PROJECT_VERSION};
use crate::error::{Result, TimetableError};
use crate::logging::dev_log;
use crate::models::{Sheet, StationMap, StopType, Timetable, TrainStopRecord};
use crate::time::{format_time_decimal, parse_time_str};

/// On-disk project file
#[derive(Debug, Serialize, Deserialize)]
struct ProjectFile {
    #[serde(rename = "_format", default)]
    format: Option<String>,
    #[serde(rename = "_version", default)]
    version: Option<u32>,
    #[serde(default)]
    uploaded_name: String,
    #[serde(default)]
    selected_sheet: String,
    #[serde(default)]
    station_map: StationMap,
    #[serde(default)]
    station_maps: IndexMap<String, StationMap>,
    #[serde(default)]
    sheets_data: Option<Vec<SheetData>>,
    #[serde(default)]
    train_colors: IndexMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SheetData {
    sheet: String,
    #[serde(default)]
    trains: Vec<RecordData>,
}

/// Train numbers written by other tools may be bare JSON numbers
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum TrainNumber {
    Text(String),
    Number(serde_json::Number),
}

impl TrainNumber {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordData {
    train_number: TrainNumber,
    station: String,
    km: f64,
    /// Display form, kept for readers that ignore `time_decimal`
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    time_decimal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop_type: Option<StopType>,
}

impl From<&TrainStopRecord> for RecordData {
    fn from(record: &TrainStopRecord) -> Self {
        Self {
            train_number: TrainNumber::Text(record.train_number.clone()),
            station: record.station.clone(),
            km: record.km,
            time: Some(format_time_decimal(record.time_decimal)),
            time_decimal: Some(record.time_decimal),
            stop_type: record.stop_type,
        }
    }
}

impl RecordData {
    /// `time_decimal` wins; otherwise the display string is parsed
    fn into_record(self) -> Option<TrainStopRecord> {
        let time_decimal = self
            .time_decimal
            .filter(|t| t.is_finite())
            .or_else(|| self.time.as_deref().and_then(|t| parse_time_str(t).ok()))?;
        Some(TrainStopRecord {
            train_number: self.train_number.into_string(),
            station: self.station,
            km: self.km,
            time_decimal,
            stop_type: self.stop_type,
        })
    }
}

/// A project file read back into memory
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedProject {
    pub timetable: Timetable,
    pub uploaded_name: String,
    pub selected_sheet: String,
}

/// Serialize a timetable and its session metadata as project JSON
///
/// # Errors
/// Returns an error if JSON serialization fails
pub fn serialize_project(timetable: &Timetable, uploaded_name: &str, selected_sheet: &str) -> Result<Vec<u8>> {
    let file = ProjectFile {
        format: Some(PROJECT_FORMAT.to_string()),
        version: Some(PROJECT_VERSION),
        uploaded_name: uploaded_name.to_string(),
        selected_sheet: selected_sheet.to_string(),
        station_map: timetable.reference_station_map.clone(),
        station_maps: timetable.station_maps.clone(),
        sheets_data: Some(
            timetable
                .sheets
                .iter()
                .map(|sheet| SheetData {
                    sheet: sheet.name.clone(),
                    trains: sheet.records.iter().map(RecordData::from).collect(),
                })
                .collect(),
        ),
        train_colors: timetable.train_colors.clone(),
    };
    Ok(serde_json::to_vec_pretty(&file)?)
}

/// Deserialize project JSON
///
/// Records carrying neither a usable `time_decimal` nor a parsable `time`
/// are dropped.
///
/// # Errors
/// Returns an error if the bytes are not JSON, the format tag is missing or
/// wrong, the version is newer than supported, or `sheets_data` is missing
pub fn deserialize_project(bytes: &[u8]) -> Result<LoadedProject> {
    let file: ProjectFile = serde_json::from_slice(bytes)?;

    if file.format.as_deref() != Some(PROJECT_FORMAT) {
        return Err(TimetableError::InvalidProjectFormat);
    }
    if let Some(version) = file.version.filter(|&v| v > PROJECT_VERSION) {
        return Err(TimetableError::UnsupportedProjectVersion(version));
    }
    let Some(sheets_data) = file.sheets_data else {
        return Err(TimetableError::MissingSheetsData);
    };

    let mut sheets = Vec::with_capacity(sheets_data.len());
    for data in sheets_data {
        let total = data.trains.len();
        let records: Vec<TrainStopRecord> = data.trains.into_iter().filter_map(RecordData::into_record).collect();
        if records.len() < total {
            log::warn!(
                "Sheet '{}': dropped {} records without a usable time",
                data.sheet,
                total - records.len()
            );
        }
        sheets.push(Sheet {
            name: data.sheet,
            records,
        });
    }
    dev_log!("Loaded project with {} sheets", sheets.len());

    Ok(LoadedProject {
        timetable: Timetable {
            reference_station_map: file.station_map,
            station_maps: file.station_maps,
            sheets,
            train_colors: file.train_colors,
        },
        uploaded_name: file.uploaded_name,
        selected_sheet: file.selected_sheet,
    })
}
