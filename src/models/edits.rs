use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use super::stop::{RecordKey, StopType, TrainStopRecord};
use super::timetable::{Sheet, Timetable};
use crate::constants::KM_MATCH_TOLERANCE;
use crate::logging::dev_log;
use crate::time::{edit_delta, parse_time_str, time_of_day_to_hours};

/// A single-cell time edit coming from the grid or the plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveTimeRequest {
    pub sheet: String,
    pub station: String,
    /// km as displayed; replaced by the train's own sheet km before use
    pub km: f64,
    pub train_number: String,
    pub hour: u32,
    pub minute: u32,
    #[serde(default)]
    pub second: u32,
    #[serde(default)]
    pub day_offset: i32,
    #[serde(default)]
    pub stop_type: Option<StopType>,
    /// Shift the train's downstream stops by the same amount
    #[serde(default)]
    pub propagate: bool,
}

impl SaveTimeRequest {
    /// The entered time of day, `None` when out of range
    #[must_use]
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, self.second)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearTimeRequest {
    pub sheet: String,
    pub station: String,
    pub km: f64,
    pub train_number: String,
    #[serde(default)]
    pub stop_type: Option<StopType>,
}

/// One changed cell of a bulk grid edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellEdit {
    /// Grid row index, used in error messages
    pub row: usize,
    pub station: String,
    pub km: f64,
    pub train_number: String,
    #[serde(default)]
    pub stop_type: Option<StopType>,
    /// New cell text; blank clears the cell
    pub value: String,
}

/// Record-level edit operations on a [`Timetable`]
///
/// Edits against a sheet that does not exist are no-ops.
pub trait TimeEdits {
    /// Set the time of the record identified by `key`, creating it if needed
    ///
    /// Returns `false` when the sheet does not exist.
    fn save_cell_time(&mut self, sheet: &str, key: RecordKey<'_>, time: NaiveTime, day_offset: i32) -> bool;

    /// Remove the record identified by `key`
    ///
    /// Returns `true` when a record was removed.
    fn clear_cell_time(&mut self, sheet: &str, key: RecordKey<'_>) -> bool;

    /// Shift a train's stops downstream of `from_km` by `delta_hours`
    ///
    /// Direction comes from the train's own records: ordered by km, the train
    /// runs towards higher km when its last time is not earlier than its
    /// first. Only stops strictly past `from_km` in that direction move; the
    /// stop at `from_km` (both halves of a dual station included) stays put.
    /// Trains with fewer than two records are left alone. Returns the number
    /// of records shifted.
    fn propagate_time_shift(&mut self, sheet: &str, train_number: &str, from_km: f64, delta_hours: f64) -> usize;

    /// Full save flow: canonical km, optional propagation, then the save
    fn save_time(&mut self, request: &SaveTimeRequest) -> bool;

    /// Full clear flow: canonical km, then the clear
    fn clear_time(&mut self, request: &ClearTimeRequest) -> bool;

    /// Apply a batch of grid cell edits, returning validation messages for
    /// cells that could not be applied
    fn apply_cell_edits(&mut self, sheet: &str, edits: &[CellEdit]) -> Vec<String>;
}

fn upsert(sheet: &mut Sheet, key: RecordKey<'_>, time_decimal: f64) {
    if let Some(record) = sheet.records.iter_mut().find(|r| r.matches(&key)) {
        record.time_decimal = time_decimal;
        return;
    }
    sheet.records.push(TrainStopRecord {
        train_number: key.train_number.to_string(),
        station: key.station.to_string(),
        km: key.km,
        time_decimal,
        stop_type: key.stop_type,
    });
}

impl TimeEdits for Timetable {
    fn save_cell_time(&mut self, sheet: &str, key: RecordKey<'_>, time: NaiveTime, day_offset: i32) -> bool {
        let Some(sheet) = self.sheet_mut(sheet) else {
            return false;
        };
        let decimal = time_of_day_to_hours(&time) + 24.0 * f64::from(day_offset);
        upsert(sheet, key, decimal);
        true
    }

    fn clear_cell_time(&mut self, sheet: &str, key: RecordKey<'_>) -> bool {
        let Some(sheet) = self.sheet_mut(sheet) else {
            return false;
        };
        let before = sheet.records.len();
        sheet.records.retain(|r| !r.matches(&key));
        sheet.records.len() != before
    }

    fn propagate_time_shift(&mut self, sheet: &str, train_number: &str, from_km: f64, delta_hours: f64) -> usize {
        let Some(sheet) = self.sheet_mut(sheet) else {
            return 0;
        };

        let mut timed: Vec<(f64, f64)> = sheet
            .train_records(train_number)
            .map(|r| (r.km, r.time_decimal))
            .collect();
        if timed.len() < 2 {
            return 0;
        }
        timed.sort_by(|a, b| a.0.total_cmp(&b.0));
        let ascending = timed[timed.len() - 1].1 >= timed[0].1;

        let mut shifted = 0;
        for record in sheet.records.iter_mut().filter(|r| r.train_number == train_number) {
            let downstream = if ascending {
                record.km > from_km
            } else {
                record.km < from_km
            };
            if !downstream {
                continue;
            }

            let mut t = record.time_decimal + delta_hours;
            if t < 0.0 {
                // Which day the stop falls on is lost here
                log::warn!(
                    "Train {train_number} at {}: shifted time {t:.3}h is negative, wrapping into the day",
                    record.station
                );
                t = t.rem_euclid(24.0);
            }
            record.time_decimal = t;
            shifted += 1;
        }

        dev_log!("Propagated {delta_hours:+.3}h to {shifted} stops of train {train_number}");
        shifted
    }

    fn save_time(&mut self, request: &SaveTimeRequest) -> bool {
        let Some(time) = request.time_of_day() else {
            log::warn!(
                "Ignoring invalid time {}:{}:{} for train {}",
                request.hour, request.minute, request.second, request.train_number
            );
            return false;
        };
        let km = self.canonical_km(&request.sheet, &request.station, request.km);

        if request.propagate {
            let previous = self.sheet(&request.sheet).and_then(|sheet| {
                sheet
                    .train_records(&request.train_number)
                    .find(|r| {
                        r.station == request.station
                            && (r.km - km).abs() < KM_MATCH_TOLERANCE
                            && r.stop_type == request.stop_type
                    })
                    .map(|r| r.time_decimal)
            });

            if let Some(old_decimal) = previous {
                let delta = edit_delta(old_decimal, &time);
                if delta != 0.0 {
                    self.propagate_time_shift(&request.sheet, &request.train_number, km, delta);
                }
            }
        }

        let key = RecordKey {
            station: &request.station,
            km,
            train_number: &request.train_number,
            stop_type: request.stop_type,
        };
        self.save_cell_time(&request.sheet, key, time, request.day_offset)
    }

    fn clear_time(&mut self, request: &ClearTimeRequest) -> bool {
        let km = self.canonical_km(&request.sheet, &request.station, request.km);
        let key = RecordKey {
            station: &request.station,
            km,
            train_number: &request.train_number,
            stop_type: request.stop_type,
        };
        self.clear_cell_time(&request.sheet, key)
    }

    fn apply_cell_edits(&mut self, sheet: &str, edits: &[CellEdit]) -> Vec<String> {
        let Some(target) = self.sheet_mut(sheet) else {
            return vec![format!("No data found for sheet '{sheet}'.")];
        };

        let mut errors = Vec::new();
        for edit in edits {
            let key = RecordKey {
                station: edit.station.trim(),
                km: edit.km,
                train_number: &edit.train_number,
                stop_type: edit.stop_type,
            };

            if edit.value.trim().is_empty() {
                target.records.retain(|r| !r.matches(&key));
                continue;
            }

            match parse_time_str(&edit.value) {
                Ok(decimal) => upsert(target, key, decimal),
                Err(_) => errors.push(format!(
                    "Invalid time in row {}, train {}, station {}: '{}'",
                    edit.row + 1,
                    edit.train_number,
                    key.station,
                    edit.value
                )),
            }
        }
        errors
    }
}
