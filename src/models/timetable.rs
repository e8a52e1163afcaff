use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use super::station::StationMap;
use super::stop::TrainStopRecord;
use crate::constants::NO_COLOR;

/// Train records of one sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub records: Vec<TrainStopRecord>,
}

impl Sheet {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Distinct train numbers in order of first appearance
    #[must_use]
    pub fn train_numbers(&self) -> Vec<&str> {
        let mut seen = indexmap::IndexSet::new();
        for record in &self.records {
            seen.insert(record.train_number.as_str());
        }
        seen.into_iter().collect()
    }

    pub fn train_records<'a>(&'a self, train_number: &'a str) -> impl Iterator<Item = &'a TrainStopRecord> + 'a {
        self.records.iter().filter(move |r| r.train_number == train_number)
    }
}

/// Outcome of comparing every sheet's station names against the first sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StationCheck {
    pub ok: bool,
    pub mismatches: Vec<String>,
}

impl StationCheck {
    #[must_use]
    pub fn from_mismatches(mismatches: Vec<String>) -> Self {
        Self {
            ok: mismatches.is_empty(),
            mismatches,
        }
    }
}

/// The whole in-memory timetable of one session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timetable {
    /// Station map of the first sheet
    pub reference_station_map: StationMap,
    pub station_maps: IndexMap<String, StationMap>,
    pub sheets: Vec<Sheet>,
    pub train_colors: IndexMap<String, String>,
}

impl Timetable {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Station map of a sheet, falling back to the reference map
    #[must_use]
    pub fn station_map_for(&self, sheet: &str) -> &StationMap {
        self.station_maps
            .get(sheet)
            .unwrap_or(&self.reference_station_map)
    }

    /// km of a station on the given sheet's own scale
    ///
    /// Views may show a train against another sheet's km values; edits must
    /// use the km of the sheet the train belongs to. Falls back to
    /// `fallback_km` when the sheet does not list the station.
    #[must_use]
    pub fn canonical_km(&self, sheet: &str, station: &str, fallback_km: f64) -> f64 {
        self.station_maps
            .get(sheet)
            .and_then(|map| map.get(station))
            .copied()
            .unwrap_or(fallback_km)
    }

    /// Assign a plot color to a train; the "no color" value removes it
    pub fn set_train_color(&mut self, train_number: &str, color: &str) {
        if color.eq_ignore_ascii_case(NO_COLOR) {
            self.train_colors.shift_remove(train_number);
        } else {
            self.train_colors.insert(train_number.to_string(), color.to_string());
        }
    }

    pub fn clear_train_colors(&mut self) {
        self.train_colors.clear();
    }
}
