//! Derived views of a [`Timetable`]: the editable grid and the time/distance
//! plot

mod grid;
mod plot;

pub use grid::{build_column_defs, build_grid_rows, ColumnDef, GridRow};
pub use plot::{build_plot_series, hours_to_ms, sort_points_by_direction, PlotPoint, PlotSeries};

use indexmap::IndexMap;
use serde::Serialize;
use crate::constants::{PLOT_DEFAULT_SPAN_MS, PLOT_PAD_LEFT_MS, PLOT_PAD_RIGHT_MS};
use crate::models::{stations_by_km, Station, Timetable};

/// Everything a front end needs to draw the selected sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainsPayload {
    pub grid_rows: Vec<GridRow>,
    pub column_defs: Vec<ColumnDef>,
    pub plot_series: Vec<PlotSeries>,
    /// Y axis of the plot, km ascending
    pub station_items: Vec<Station>,
    pub x_min_ms: i64,
    pub x_max_ms: i64,
    pub train_colors: IndexMap<String, String>,
    pub selected_sheet: String,
}

impl TrainsPayload {
    fn empty(timetable: &Timetable, selected_sheet: &str) -> Self {
        Self {
            grid_rows: Vec::new(),
            column_defs: Vec::new(),
            plot_series: Vec::new(),
            station_items: Vec::new(),
            x_min_ms: 0,
            x_max_ms: PLOT_DEFAULT_SPAN_MS,
            train_colors: timetable.train_colors.clone(),
            selected_sheet: selected_sheet.to_string(),
        }
    }
}

/// Project the timetable onto the views of `selected_sheet`
///
/// The grid shows only the selected sheet; the plot shows every sheet on the
/// selected sheet's station scale. An unknown sheet yields an empty grid but
/// still plots against the reference stations.
#[must_use]
pub fn build_trains_payload(timetable: &Timetable, selected_sheet: &str) -> TrainsPayload {
    if timetable.reference_station_map.is_empty() || timetable.sheets.is_empty() {
        return TrainsPayload::empty(timetable, selected_sheet);
    }

    let stations = stations_by_km(timetable.station_map_for(selected_sheet));

    let (grid_rows, trains) = match timetable.sheet(selected_sheet) {
        Some(sheet) => {
            let trains = sheet.train_numbers();
            (build_grid_rows(sheet, &stations, &trains), trains)
        }
        None => (Vec::new(), Vec::new()),
    };
    let column_defs = build_column_defs(&trains);

    let (plot_series, bounds) = build_plot_series(timetable, &stations);
    let (x_min_ms, x_max_ms) = match bounds {
        Some((lo, hi)) => ((lo - PLOT_PAD_LEFT_MS).max(0), hi + PLOT_PAD_RIGHT_MS),
        None => (0, PLOT_DEFAULT_SPAN_MS + PLOT_PAD_RIGHT_MS),
    };

    TrainsPayload {
        grid_rows,
        column_defs,
        plot_series,
        station_items: stations,
        x_min_ms,
        x_max_ms,
        train_colors: timetable.train_colors.clone(),
        selected_sheet: selected_sheet.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sheet, StationMap, TrainStopRecord};

    fn timetable() -> Timetable {
        let map: StationMap = [("A", 0.0), ("B", 10.0)]
            .iter()
            .map(|(n, km)| ((*n).to_string(), *km))
            .collect();
        let mut timetable = Timetable {
            reference_station_map: map.clone(),
            ..Timetable::default()
        };
        timetable.station_maps.insert("S".to_string(), map);
        timetable.sheets.push(Sheet {
            name: "S".to_string(),
            records: vec![
                TrainStopRecord {
                    train_number: "101".to_string(),
                    station: "A".to_string(),
                    km: 0.0,
                    time_decimal: 6.0,
                    stop_type: None,
                },
                TrainStopRecord {
                    train_number: "101".to_string(),
                    station: "B".to_string(),
                    km: 10.0,
                    time_decimal: 1.0,
                    stop_type: None,
                },
            ],
        });
        timetable
    }

    #[test]
    fn test_empty_payload() {
        let payload = build_trains_payload(&Timetable::default(), "S");
        assert!(payload.grid_rows.is_empty());
        assert_eq!(payload.x_min_ms, 0);
        assert_eq!(payload.x_max_ms, 24 * 3_600_000);
        assert_eq!(payload.selected_sheet, "S");
    }

    #[test]
    fn test_payload_axes_are_padded() {
        let mut timetable = timetable();
        timetable.set_train_color("101", "#e6194b");
        let payload = build_trains_payload(&timetable, "S");

        assert_eq!(payload.grid_rows.len(), 2);
        assert_eq!(payload.column_defs.len(), 3);
        assert_eq!(payload.plot_series.len(), 1);
        assert_eq!(payload.station_items[1].name, "B");
        // 1:00 minus two hours clamps to zero
        assert_eq!(payload.x_min_ms, 0);
        assert_eq!(payload.x_max_ms, 6 * 3_600_000 + 30 * 60_000);
        assert_eq!(payload.train_colors.get("101").map(String::as_str), Some("#e6194b"));
    }

    #[test]
    fn test_unknown_sheet_uses_reference_stations() {
        let payload = build_trains_payload(&timetable(), "missing");
        assert!(payload.grid_rows.is_empty());
        assert_eq!(payload.column_defs.len(), 2);
        assert_eq!(payload.station_items.len(), 2);
        assert_eq!(payload.plot_series.len(), 1);
    }
}
