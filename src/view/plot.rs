use serde::Serialize;
use std::cmp::Ordering;
use crate::constants::MS_PER_HOUR;
use crate::models::{Station, StopType, Timetable};

/// One stop of one train on the time/distance plot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotPoint {
    /// Milliseconds since midnight of the train's first day
    pub ms: i64,
    /// km on the active sheet's scale
    pub km: f64,
    pub station: String,
    pub train: String,
    pub sheet: String,
    pub stop_type: Option<StopType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    /// "{train} ({sheet})"
    pub name: String,
    pub points: Vec<PlotPoint>,
}

/// Truncating conversion from decimal hours to milliseconds
#[must_use]
pub fn hours_to_ms(hours: f64) -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    let ms = (hours * MS_PER_HOUR) as i64;
    ms
}

/// Plot series of every train on every sheet, laid out on the given stations
///
/// Stations are matched by name, so trains from other sheets are drawn at
/// the active sheet's km values. Returns the series together with the
/// smallest and largest point time.
#[must_use]
pub fn build_plot_series(timetable: &Timetable, stations: &[Station]) -> (Vec<PlotSeries>, Option<(i64, i64)>) {
    let mut series = Vec::new();
    let mut bounds: Option<(i64, i64)> = None;

    for sheet in &timetable.sheets {
        let mut trains = sheet.train_numbers();
        trains.sort_unstable();

        for train in trains {
            let mut points = Vec::new();
            for station in stations {
                for record in sheet.train_records(train).filter(|r| r.station == station.name) {
                    let ms = hours_to_ms(record.time_decimal);
                    bounds = Some(match bounds {
                        Some((lo, hi)) => (lo.min(ms), hi.max(ms)),
                        None => (ms, ms),
                    });
                    points.push(PlotPoint {
                        ms,
                        km: station.km,
                        station: station.name.clone(),
                        train: train.to_string(),
                        sheet: sheet.name.clone(),
                        stop_type: record.stop_type,
                    });
                }
            }

            if !points.is_empty() {
                sort_points_by_direction(&mut points);
                series.push(PlotSeries {
                    name: format!("{train} ({})", sheet.name),
                    points,
                });
            }
        }
    }

    (series, bounds)
}

/// Order points along the train's dominant direction of travel
///
/// Consecutive km-distinct points vote for ascending (time grows with km) or
/// descending travel; ties go to ascending. Points at the same km keep time
/// order, so arrival and departure at a dual station never run backwards.
pub fn sort_points_by_direction(points: &mut [PlotPoint]) {
    points.sort_by(|a, b| a.km.total_cmp(&b.km));

    let (mut ascending, mut descending) = (0usize, 0usize);
    for pair in points.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.km == next.km {
            continue;
        }
        match next.ms.cmp(&prev.ms) {
            Ordering::Greater => ascending += 1,
            Ordering::Less => descending += 1,
            Ordering::Equal => {}
        }
    }

    if descending > ascending {
        points.sort_by(|a, b| b.km.total_cmp(&a.km).then(a.ms.cmp(&b.ms)));
    } else {
        points.sort_by(|a, b| a.km.total_cmp(&b.km).then(a.ms.cmp(&b.ms)));
    }
}
