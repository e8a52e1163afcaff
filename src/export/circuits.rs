use indexmap::IndexMap;
use serde::Serialize;
use super::{ExportSheet, ExportValue};
use crate::constants::{
    CIRCUITS_FIRST_COL, CIRCUITS_HEADERS, CIRCUITS_HEADER_ROW, CIRCUITS_SHEET_NAME, CIRCUITS_UNASSIGNED_LABEL,
    COLOR_NAMES, EXPORT_TIME_FORMAT, NO_COLOR,
};
use crate::models::{Timetable, TrainStopRecord};
use crate::time::hours_to_time_of_day;

/// First and last stop of a train across all sheets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainSummary {
    pub train_number: String,
    pub dep_station: String,
    pub dep_time: f64,
    pub arr_station: String,
    pub arr_time: f64,
    /// Distance between the train's smallest and largest km
    pub km: f64,
}

/// Trains sharing one vehicle, identified by plot color
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitGroup {
    pub label: String,
    /// `None` for the group of trains without a color
    pub color: Option<String>,
    pub trains: Vec<TrainSummary>,
}

/// Summaries of every train with at least two stops, in order of first
/// appearance
#[must_use]
pub fn train_summaries(timetable: &Timetable) -> Vec<TrainSummary> {
    let mut by_train: IndexMap<&str, Vec<&TrainStopRecord>> = IndexMap::new();
    for record in timetable.sheets.iter().flat_map(|s| &s.records) {
        by_train.entry(record.train_number.as_str()).or_default().push(record);
    }

    by_train
        .into_iter()
        .filter(|(_, records)| records.len() >= 2)
        .filter_map(|(train, mut records)| {
            records.sort_by(|a, b| a.time_decimal.total_cmp(&b.time_decimal));
            let first = records.first()?;
            let last = records.last()?;
            let (lo, hi) = records
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r.km), hi.max(r.km)));
            Some(TrainSummary {
                train_number: train.to_string(),
                dep_station: first.station.clone(),
                dep_time: first.time_decimal,
                arr_station: last.station.clone(),
                arr_time: last.time_decimal,
                km: (hi - lo).abs(),
            })
        })
        .collect()
}

fn color_label(color: &str) -> String {
    let name = COLOR_NAMES
        .iter()
        .find(|(hex, _)| hex.eq_ignore_ascii_case(color))
        .map_or(color, |&(_, name)| name);
    format!("Obieg '{name}'")
}

/// Group train summaries by assigned color
///
/// Colored groups are ordered by their earliest departure; trains without a
/// color, or with the "no color" value, form a last group. Trains inside a
/// group run by departure time.
#[must_use]
pub fn build_circuits(timetable: &Timetable) -> Vec<CircuitGroup> {
    let mut colored: IndexMap<String, Vec<TrainSummary>> = IndexMap::new();
    let mut unassigned = Vec::new();

    for summary in train_summaries(timetable) {
        match timetable
            .train_colors
            .get(&summary.train_number)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(NO_COLOR))
        {
            Some(color) => colored.entry(color.clone()).or_default().push(summary),
            None => unassigned.push(summary),
        }
    }

    let by_departure = |a: &TrainSummary, b: &TrainSummary| a.dep_time.total_cmp(&b.dep_time);
    let mut groups: Vec<CircuitGroup> = colored
        .into_iter()
        .map(|(color, mut trains)| {
            trains.sort_by(by_departure);
            CircuitGroup {
                label: color_label(&color),
                color: Some(color),
                trains,
            }
        })
        .collect();
    groups.sort_by(|a, b| earliest(a).total_cmp(&earliest(b)));

    if !unassigned.is_empty() {
        unassigned.sort_by(by_departure);
        groups.push(CircuitGroup {
            label: CIRCUITS_UNASSIGNED_LABEL.to_string(),
            color: None,
            trains: unassigned,
        });
    }
    groups
}

fn earliest(group: &CircuitGroup) -> f64 {
    group.trains.first().map_or(f64::INFINITY, |t| t.dep_time)
}

/// Blank row plus separator row; the separator carries an empty cell in the
/// train number column so the pair survives in sparse output
fn put_gap_rows(sheet: &mut ExportSheet, row: &mut u32) {
    *row += 2;
    sheet.put(*row, 3, "");
}

/// Vehicle circuit sheet: header row, then per group a blank and a separator
/// row followed by one row per train, closed by one more gap pair
#[must_use]
pub fn circuits_sheet(groups: &[CircuitGroup]) -> ExportSheet {
    let mut sheet = ExportSheet::new(CIRCUITS_SHEET_NAME);
    for (col, header) in (CIRCUITS_FIRST_COL..).zip(CIRCUITS_HEADERS) {
        sheet.put(CIRCUITS_HEADER_ROW, col, header);
    }

    let time = |hours: f64| ExportValue::Time {
        value: hours_to_time_of_day(hours),
        format: EXPORT_TIME_FORMAT,
    };

    let mut row = CIRCUITS_HEADER_ROW;
    for group in groups {
        put_gap_rows(&mut sheet, &mut row);
        for (i, train) in group.trains.iter().enumerate() {
            row += 1;
            if i == 0 {
                sheet.put(row, 2, group.label.as_str());
            }
            let number = match train.train_number.parse::<u32>() {
                Ok(n) if train.train_number.chars().all(|c| c.is_ascii_digit()) => ExportValue::Number {
                    value: f64::from(n),
                    format: None,
                },
                _ => ExportValue::Text(train.train_number.clone()),
            };
            sheet.put(row, 3, number);
            sheet.put(row, 4, time(train.dep_time));
            sheet.put(row, 5, train.dep_station.as_str());
            sheet.put(row, 6, train.arr_station.as_str());
            sheet.put(row, 7, time(train.arr_time));
            sheet.put(row, 10, ExportValue::Number {
                value: train.km,
                format: None,
            });
        }
    }
    if !groups.is_empty() {
        put_gap_rows(&mut sheet, &mut row);
    }
    sheet
}
