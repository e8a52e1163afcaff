use std::collections::BTreeSet;
use crate::config::ImportOptions;
use crate::error::{Result, TimetableError};
use crate::import::headers::{find_headers, HeaderPositions};
use crate::import::stations::{extract_stations, StationRow};
use crate::import::trains::extract_train_columns;
use crate::logging::dev_log;
use crate::models::{Sheet, SheetGrid, StationCheck, StationMap, StopType, Timetable, TrainStopRecord, Workbook};
use crate::time::{apply_midnight_correction, parse_cell_time};

/// Byte-level workbook source
///
/// Implementations must deliver one rectangular grid per sheet, in workbook
/// order, with merged ranges already expanded (top-left value copied across
/// the range).
pub trait WorkbookReader {
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be decoded as a workbook.
    fn read_workbook(&self, bytes: &[u8]) -> Result<Workbook>;
}

/// Result of extracting a whole workbook
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    pub timetable: Timetable,
    pub station_check: StationCheck,
}

/// Build a [`Timetable`] from every sheet of a workbook
///
/// The first sheet supplies the reference station map. Every sheet's station
/// names are compared against it; differences end up in the returned
/// [`StationCheck`] and never stop extraction. A non-reference sheet without
/// station headers gets an empty station map and no trains.
///
/// # Errors
///
/// Returns [`TimetableError::MissingReferenceHeaders`] when the first sheet
/// lacks any of the station range, station column or km headers.
pub fn extract_workbook(workbook: &Workbook, options: &ImportOptions) -> Result<Extraction> {
    let Some(first) = workbook.sheets.first() else {
        return Ok(Extraction {
            timetable: Timetable::default(),
            station_check: StationCheck::from_mismatches(vec!["Workbook has no sheets.".to_string()]),
        });
    };

    let first_pos = find_headers(first, &options.labels);
    let Some(range) = first_pos.station_range() else {
        return Err(TimetableError::MissingReferenceHeaders {
            sheet: first.name.clone(),
        });
    };
    let reference = station_map(&extract_stations(first, range));
    let reference_names: BTreeSet<&str> = reference.keys().map(String::as_str).collect();

    let mut timetable = Timetable {
        reference_station_map: reference.clone(),
        ..Timetable::default()
    };
    let mut mismatches = Vec::new();

    for grid in &workbook.sheets {
        let pos = find_headers(grid, &options.labels);

        let stations = match pos.station_range() {
            Some(range) => {
                let stations = extract_stations(grid, range);
                let names: BTreeSet<&str> = stations.iter().map(|s| s.name.as_str()).collect();
                mismatches.extend(station_set_mismatches(&grid.name, &names, &reference_names));
                stations
            }
            None => {
                log::warn!("Sheet '{}' has no station headers, skipping its trains", grid.name);
                mismatches.push(format!("Sheet '{}' is missing station headers.", grid.name));
                Vec::new()
            }
        };

        timetable.station_maps.insert(grid.name.clone(), station_map(&stations));

        let records = if stations.is_empty() {
            Vec::new()
        } else {
            extract_records(grid, &pos, &stations, options)
        };
        dev_log!(
            "Sheet '{}': {} stations, {} timed stops",
            grid.name,
            stations.len(),
            records.len()
        );

        timetable.sheets.push(Sheet {
            name: grid.name.clone(),
            records,
        });
    }

    for message in &mismatches {
        log::warn!("{message}");
    }

    Ok(Extraction {
        timetable,
        station_check: StationCheck::from_mismatches(mismatches),
    })
}

fn station_map(stations: &[StationRow]) -> StationMap {
    stations.iter().map(|s| (s.name.clone(), s.km)).collect()
}

fn station_set_mismatches(sheet: &str, names: &BTreeSet<&str>, reference: &BTreeSet<&str>) -> Vec<String> {
    let mut messages = Vec::new();
    let extra: Vec<&str> = names.difference(reference).copied().collect();
    let missing: Vec<&str> = reference.difference(names).copied().collect();
    if !extra.is_empty() {
        messages.push(format!("Sheet '{sheet}' has stations not in reference: {extra:?}"));
    }
    if !missing.is_empty() {
        messages.push(format!("Sheet '{sheet}' misses stations from reference: {missing:?}"));
    }
    messages
}

/// Timed stops of every train column, midnight-corrected per train in sheet
/// row order
fn extract_records(
    grid: &SheetGrid,
    pos: &HeaderPositions,
    stations: &[StationRow],
    options: &ImportOptions,
) -> Vec<TrainStopRecord> {
    let Some(train_row) = pos.train_row else {
        log::warn!("Sheet '{}' has no train number header", grid.name);
        return Vec::new();
    };

    let columns = extract_train_columns(grid, train_row, pos.station_start_row, pos.station_end_row);
    let mut records = Vec::new();

    for (train_number, col) in columns {
        if options.skip_hidden_columns && grid.is_hidden(col) {
            dev_log!("Skipping hidden column {col} of train {train_number}");
            continue;
        }

        let mut timed: Vec<&StationRow> = Vec::new();
        let mut raw_times = Vec::new();
        for station in stations {
            match parse_cell_time(grid.cell(station.row, col)) {
                Ok(t) => {
                    timed.push(station);
                    raw_times.push(t);
                }
                Err(_) => continue,
            }
        }

        let corrected = apply_midnight_correction(&raw_times);
        for (station, time_decimal) in timed.into_iter().zip(corrected) {
            let stop_type = pos
                .stop_type_col
                .and_then(|c| grid.cell(station.row, c).as_text())
                .and_then(|marker| StopType::from_marker(&marker));
            records.push(TrainStopRecord {
                train_number: train_number.clone(),
                station: station.name.clone(),
                km: station.km,
                time_decimal,
                stop_type,
            });
        }
    }

    records
}
