use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use crate::models::{Sheet, Station, StopType};
use crate::time::format_time_hhmm;

/// One row of the editable timetable grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    /// km with three decimals
    pub km: String,
    /// Station name as shown, with " (p)"/" (o)" on dual stations
    #[serde(rename = "stacja")]
    pub label: String,
    #[serde(rename = "_station_raw")]
    pub station: String,
    #[serde(rename = "_stop_type")]
    pub stop_type: Option<StopType>,
    /// Train number → display time, empty when the train has no stop here
    #[serde(flatten)]
    pub times: IndexMap<String, String>,
    /// Train number → decimal hours, only for cells holding a time
    #[serde(rename = "_decimals")]
    pub decimals: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub field: String,
    pub header_name: String,
    pub editable: bool,
    pub width: u32,
}

impl ColumnDef {
    fn fixed(field: &str, width: u32) -> Self {
        Self {
            field: field.to_string(),
            header_name: field.to_string(),
            editable: false,
            width,
        }
    }

    fn train(train_number: &str) -> Self {
        Self {
            field: train_number.to_string(),
            header_name: train_number.to_string(),
            editable: true,
            width: 120,
        }
    }
}

/// Slot of a record within a station row; records without a stop type sit in
/// the arrival slot
fn slot(stop_type: Option<StopType>) -> StopType {
    stop_type.unwrap_or(StopType::Arrival)
}

type CellKey<'a> = (&'a str, u64);

/// Bit pattern of a km with `-0.0` folded into `0.0`
fn km_bits(km: f64) -> u64 {
    (km + 0.0).to_bits()
}
type TrainSlots = HashMap<(String, StopType), (String, f64)>;

/// Grid rows for one sheet, stations in km order
///
/// A station where any train has a departure record is dual and produces two
/// rows: arrivals first, then departures.
#[must_use]
pub fn build_grid_rows(sheet: &Sheet, stations: &[Station], trains: &[&str]) -> Vec<GridRow> {
    let mut cells: HashMap<CellKey<'_>, TrainSlots> = HashMap::new();
    for record in &sheet.records {
        let key = (record.station.as_str(), km_bits(record.km));
        cells.entry(key).or_default().insert(
            (record.train_number.clone(), slot(record.stop_type)),
            (format_time_hhmm(record.time_decimal), record.time_decimal),
        );
    }

    let dual: HashSet<CellKey<'_>> = cells
        .iter()
        .filter(|(_, slots)| slots.keys().any(|(_, st)| *st == StopType::Departure))
        .map(|(key, _)| *key)
        .collect();

    let empty = TrainSlots::new();
    let mut rows = Vec::new();
    for station in stations {
        let key = (station.name.as_str(), km_bits(station.km));
        let slots = cells.get(&key).unwrap_or(&empty);

        if dual.contains(&key) {
            for stop_type in [StopType::Arrival, StopType::Departure] {
                let label = format!("{} ({stop_type})", station.name);
                rows.push(row(station, label, Some(stop_type), stop_type, slots, trains));
            }
        } else {
            rows.push(row(station, station.name.clone(), None, StopType::Arrival, slots, trains));
        }
    }
    rows
}

fn row(
    station: &Station,
    label: String,
    stop_type: Option<StopType>,
    slot: StopType,
    slots: &TrainSlots,
    trains: &[&str],
) -> GridRow {
    let mut times = IndexMap::new();
    let mut decimals = IndexMap::new();
    for &train in trains {
        match slots.get(&(train.to_string(), slot)) {
            Some((display, decimal)) => {
                times.insert(train.to_string(), display.clone());
                decimals.insert(train.to_string(), *decimal);
            }
            None => {
                times.insert(train.to_string(), String::new());
            }
        }
    }

    GridRow {
        km: format!("{:.3}", station.km),
        label,
        station: station.name.clone(),
        stop_type,
        times,
        decimals,
    }
}

/// Read-only `km` and `stacja` columns followed by one editable column per train
#[must_use]
pub fn build_column_defs(trains: &[&str]) -> Vec<ColumnDef> {
    let mut defs = vec![ColumnDef::fixed("km", 60), ColumnDef::fixed("stacja", 60)];
    defs.extend(trains.iter().map(|t| ColumnDef::train(t)));
    defs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrainStopRecord;

    fn rec(train: &str, station: &str, km: f64, t: f64, stop_type: Option<StopType>) -> TrainStopRecord {
        TrainStopRecord {
            train_number: train.to_string(),
            station: station.to_string(),
            km,
            time_decimal: t,
            stop_type,
        }
    }

    fn stations() -> Vec<Station> {
        [("A", 0.0), ("B", 10.0), ("C", 20.0)]
            .iter()
            .map(|(n, km)| Station { name: (*n).to_string(), km: *km })
            .collect()
    }

    #[test]
    fn test_plain_rows() {
        let sheet = Sheet {
            name: "S".to_string(),
            records: vec![rec("101", "A", 0.0, 6.0, None), rec("101", "C", 20.0, 25.5, None)],
        };
        let rows = build_grid_rows(&sheet, &stations(), &["101", "102"]);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].km, "0.000");
        assert_eq!(rows[0].times.get("101").map(String::as_str), Some("06:00"));
        assert_eq!(rows[0].times.get("102").map(String::as_str), Some(""));
        assert_eq!(rows[1].times.get("101").map(String::as_str), Some(""));
        assert!(rows[1].decimals.is_empty());
        assert_eq!(rows[2].times.get("101").map(String::as_str), Some("01:30"));
        assert_eq!(rows[2].decimals.get("101"), Some(&25.5));
    }

    #[test]
    fn test_dual_station_splits_rows() {
        let sheet = Sheet {
            name: "S".to_string(),
            records: vec![
                rec("301", "B", 10.0, 6.5, Some(StopType::Arrival)),
                rec("301", "B", 10.0, 6.6, Some(StopType::Departure)),
                rec("302", "B", 10.0, 8.0, None),
            ],
        };
        let rows = build_grid_rows(&sheet, &stations(), &["301", "302"]);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B (p)", "B (o)", "C"]);

        assert_eq!(rows[1].stop_type, Some(StopType::Arrival));
        assert_eq!(rows[1].station, "B");
        assert_eq!(rows[1].times.get("301").map(String::as_str), Some("06:30"));
        // A record without a stop type shows in the arrival row
        assert_eq!(rows[1].times.get("302").map(String::as_str), Some("08:00"));
        assert_eq!(rows[2].times.get("301").map(String::as_str), Some("06:36"));
        assert_eq!(rows[2].times.get("302").map(String::as_str), Some(""));
    }

    #[test]
    fn test_negative_zero_km_matches_station() {
        let sheet = Sheet {
            name: "S".to_string(),
            records: vec![rec("101", "A", -0.0, 6.0, None)],
        };
        let rows = build_grid_rows(&sheet, &stations()[..1], &["101"]);
        assert_eq!(rows[0].times.get("101").map(String::as_str), Some("06:00"));
    }

    #[test]
    fn test_row_json_shape() {
        let sheet = Sheet {
            name: "S".to_string(),
            records: vec![rec("101", "A", 0.0, 6.0, None)],
        };
        let rows = build_grid_rows(&sheet, &stations()[..1], &["101"]);
        let json = serde_json::to_value(&rows[0]).expect("serializes");
        assert_eq!(json["stacja"], "A");
        assert_eq!(json["101"], "06:00");
        assert_eq!(json["_decimals"]["101"], 6.0);
        assert!(json["_stop_type"].is_null());
    }

    #[test]
    fn test_column_defs() {
        let defs = build_column_defs(&["101", "202"]);
        assert_eq!(defs.len(), 4);
        assert!(!defs[0].editable && !defs[1].editable);
        assert_eq!(defs[1].field, "stacja");
        assert!(defs[3].editable);
        assert_eq!(defs[3].width, 120);
        let json = serde_json::to_value(&defs[2]).expect("serializes");
        assert_eq!(json["headerName"], "101");
    }
}
