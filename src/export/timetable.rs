use std::collections::{HashMap, HashSet};
use super::{ExportSheet, ExportValue};
use crate::constants::{
    EXPORT_DEFAULT_SHEET_NAME, EXPORT_FIRST_STATION_ROW, EXPORT_FIRST_TRAIN_COL, EXPORT_HEADER_ROW, EXPORT_KM_COL,
    EXPORT_KM_FORMAT, EXPORT_SHEET_NAME_MAX, EXPORT_STATION_COL, EXPORT_STOP_TYPE_COL, EXPORT_TRAIN_ROW,
};
use crate::import::shared::normalize_label;
use crate::models::{stations_by_km, Sheet, Station, StationMap, StopType, Timetable};
use crate::time::format_time_hhmm;

/// Workbook sheet name: at most 31 characters, never empty
#[must_use]
pub fn export_sheet_name(name: &str) -> String {
    let truncated: String = name.chars().take(EXPORT_SHEET_NAME_MAX).collect();
    if truncated.is_empty() {
        EXPORT_DEFAULT_SHEET_NAME.to_string()
    } else {
        truncated
    }
}

/// One output sheet per timetable sheet, in the layout extraction reads back
///
/// Stations run down from row 12 in km order, trains across from column G.
/// Dual stations get an arrival row tagged "p" and a departure row tagged
/// "o"; records without a stop type count as arrivals. A "do stacji" label
/// closes the station range.
#[must_use]
pub fn build_timetable_export(timetable: &Timetable) -> Vec<ExportSheet> {
    let empty = StationMap::new();
    timetable
        .sheets
        .iter()
        .map(|sheet| {
            let map = timetable.station_maps.get(&sheet.name).unwrap_or(&empty);
            sheet_layout(sheet, &stations_by_km(map))
        })
        .collect()
}

/// Formatted times of one sheet keyed by (station, train), with a fallback
/// keyed by normalized station name
struct TimeLookup {
    exact: HashMap<(String, String), HashMap<StopType, String>>,
    normalized: HashMap<(String, String), HashMap<StopType, String>>,
}

impl TimeLookup {
    fn new(sheet: &Sheet) -> Self {
        let mut exact: HashMap<(String, String), HashMap<StopType, String>> = HashMap::new();
        let mut normalized: HashMap<(String, String), HashMap<StopType, String>> = HashMap::new();
        for record in &sheet.records {
            let slot = record.stop_type.unwrap_or(StopType::Arrival);
            let time = format_time_hhmm(record.time_decimal);
            exact
                .entry((record.station.clone(), record.train_number.clone()))
                .or_default()
                .insert(slot, time.clone());
            normalized
                .entry((normalize_label(&record.station), record.train_number.clone()))
                .or_default()
                .insert(slot, time);
        }
        Self { exact, normalized }
    }

    fn get(&self, station: &str, train: &str, slot: StopType) -> Option<&str> {
        let slots = self
            .exact
            .get(&(station.to_string(), train.to_string()))
            .or_else(|| self.normalized.get(&(normalize_label(station), train.to_string())))?;
        slots.get(&slot).map(String::as_str)
    }

    /// Names of stations where some train departs, resolved against the
    /// sheet's station list
    fn dual_stations(&self, stations: &[Station]) -> HashSet<String> {
        let mut dual = HashSet::new();
        for ((station, _), slots) in &self.exact {
            if !slots.contains_key(&StopType::Departure) {
                continue;
            }
            let wanted = normalize_label(station);
            if let Some(found) = stations
                .iter()
                .find(|s| s.name == *station || normalize_label(&s.name) == wanted)
            {
                dual.insert(found.name.clone());
            }
        }
        dual
    }
}

fn sheet_layout(sheet: &Sheet, stations: &[Station]) -> ExportSheet {
    let mut out = ExportSheet::new(export_sheet_name(&sheet.name));
    out.put(EXPORT_TRAIN_ROW, EXPORT_STATION_COL, "numer pociągu");
    out.put(EXPORT_HEADER_ROW, EXPORT_KM_COL, "km");
    out.put(EXPORT_HEADER_ROW, EXPORT_STATION_COL, "ze stacji");
    out.put(EXPORT_HEADER_ROW, EXPORT_STOP_TYPE_COL, "p/o");

    let trains = sheet.train_numbers();
    for (col, train) in (EXPORT_FIRST_TRAIN_COL..).zip(&trains) {
        out.put(EXPORT_TRAIN_ROW, col, *train);
    }

    let lookup = TimeLookup::new(sheet);
    let dual = lookup.dual_stations(stations);

    let mut row = EXPORT_FIRST_STATION_ROW;
    for station in stations {
        let slots: &[(StopType, Option<&str>)] = if dual.contains(&station.name) {
            &[(StopType::Arrival, Some("p")), (StopType::Departure, Some("o"))]
        } else {
            &[(StopType::Arrival, None)]
        };

        for &(slot, marker) in slots {
            out.put(row, EXPORT_KM_COL, ExportValue::Number {
                value: station.km,
                format: Some(EXPORT_KM_FORMAT),
            });
            out.put(row, EXPORT_STATION_COL, station.name.as_str());
            if let Some(marker) = marker {
                out.put(row, EXPORT_STOP_TYPE_COL, marker);
            }
            for (col, train) in (EXPORT_FIRST_TRAIN_COL..).zip(&trains) {
                if let Some(time) = lookup.get(&station.name, train, slot) {
                    out.put(row, col, time);
                }
            }
            row += 1;
        }
    }

    out.put(row, EXPORT_STATION_COL, "do stacji");
    out
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

    fn text(sheet: &ExportSheet, row: u32, col: u32) -> Option<String> {
        sheet.cell(row, col).map(ExportValue::display)
    }

    fn timetable() -> Timetable {
        let map: StationMap = [("Legnica", 0.0), ("Jawor", 20.0), ("Środa Śląska", 65.0)]
            .iter()
            .map(|(n, km)| ((*n).to_string(), *km))
            .collect();
        let mut timetable = Timetable {
            reference_station_map: map.clone(),
            ..Timetable::default()
        };
        timetable.station_maps.insert("WL".to_string(), map);
        timetable.sheets.push(Sheet {
            name: "WL".to_string(),
            records: vec![
                rec("101", "Legnica", 0.0, 6.0, None),
                rec("101", "Jawor", 20.0, 6.5, Some(StopType::Arrival)),
                rec("101", "Jawor", 20.0, 6.6, Some(StopType::Departure)),
                rec("101", "Sroda Slaska", 65.0, 25.5, None),
                rec("103", "Legnica", 0.0, 8.0, None),
            ],
        });
        timetable
    }

    #[test]
    fn test_sheet_name() {
        assert_eq!(export_sheet_name(""), "Arkusz");
        assert_eq!(export_sheet_name("WL"), "WL");
        assert_eq!(export_sheet_name(&"ą".repeat(40)).chars().count(), 31);
    }

    #[test]
    fn test_layout() {
        let sheets = build_timetable_export(&timetable());
        assert_eq!(sheets.len(), 1);
        let sheet = &sheets[0];

        assert_eq!(text(sheet, 3, 5).as_deref(), Some("numer pociągu"));
        assert_eq!(text(sheet, 11, 4).as_deref(), Some("km"));
        assert_eq!(text(sheet, 11, 6).as_deref(), Some("p/o"));
        assert_eq!(text(sheet, 3, 7).as_deref(), Some("101"));
        assert_eq!(text(sheet, 3, 8).as_deref(), Some("103"));

        assert_eq!(text(sheet, 12, 4).as_deref(), Some("0.000"));
        assert_eq!(text(sheet, 12, 7).as_deref(), Some("06:00"));
        assert_eq!(text(sheet, 12, 8).as_deref(), Some("08:00"));
        assert_eq!(text(sheet, 12, 6), None);

        // Jawor is dual
        assert_eq!(text(sheet, 13, 5).as_deref(), Some("Jawor"));
        assert_eq!(text(sheet, 13, 6).as_deref(), Some("p"));
        assert_eq!(text(sheet, 13, 7).as_deref(), Some("06:30"));
        assert_eq!(text(sheet, 14, 6).as_deref(), Some("o"));
        assert_eq!(text(sheet, 14, 7).as_deref(), Some("06:36"));
        assert_eq!(text(sheet, 14, 8), None);

        // Record spelled without accents still lands on its station
        assert_eq!(text(sheet, 15, 5).as_deref(), Some("Środa Śląska"));
        assert_eq!(text(sheet, 15, 7).as_deref(), Some("01:30"));
        assert_eq!(text(sheet, 16, 5).as_deref(), Some("do stacji"));
    }

    #[test]
    fn test_sheet_without_station_map() {
        let mut timetable = timetable();
        timetable.sheets.push(Sheet::new("Uwagi"));
        let sheets = build_timetable_export(&timetable);
        assert_eq!(sheets[1].name, "Uwagi");
        assert_eq!(text(&sheets[1], 12, 5).as_deref(), Some("do stacji"));
    }
}
