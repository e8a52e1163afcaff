use crate::config::{HeaderKind, HeaderLabels};
use crate::import::shared::normalize_cell;
use crate::models::SheetGrid;

/// Grid positions of the labelled header cells of one sheet
///
/// Any field left `None` means the label was not found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderPositions {
    pub train_row: Option<usize>,
    pub km_col: Option<usize>,
    pub station_col: Option<usize>,
    pub station_start_row: Option<usize>,
    pub station_end_row: Option<usize>,
    /// Column with "p"/"o" arrival/departure markers, if the sheet has one
    pub stop_type_col: Option<usize>,
}

/// Everything needed to read the station table of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationRange {
    pub start_row: usize,
    pub end_row: usize,
    pub station_col: usize,
    pub km_col: usize,
}

impl HeaderPositions {
    /// The station range, if every header it needs was found
    #[must_use]
    pub fn station_range(&self) -> Option<StationRange> {
        Some(StationRange {
            start_row: self.station_start_row?,
            end_row: self.station_end_row?,
            station_col: self.station_col?,
            km_col: self.km_col?,
        })
    }
}

/// Scan the grid row by row for header labels
///
/// The first cell matching a category wins; later matches are ignored. The
/// station column is the column of the range-start label.
#[must_use]
pub fn find_headers(grid: &SheetGrid, labels: &HeaderLabels) -> HeaderPositions {
    let matcher = labels.matcher();
    let mut pos = HeaderPositions::default();

    for (r, row) in grid.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let text = normalize_cell(cell);
            if text.is_empty() {
                continue;
            }
            let Some(kind) = matcher.classify(&text) else { continue };

            match kind {
                HeaderKind::TrainNumber => {
                    pos.train_row.get_or_insert(r);
                }
                HeaderKind::Km => {
                    pos.km_col.get_or_insert(c);
                }
                HeaderKind::StationStart => {
                    if pos.station_start_row.is_none() {
                        pos.station_start_row = Some(r);
                        pos.station_col = Some(c);
                    }
                }
                HeaderKind::StationEnd => {
                    pos.station_end_row.get_or_insert(r);
                }
                HeaderKind::StopType => {
                    pos.stop_type_col.get_or_insert(c);
                }
            }
        }
    }

    pos
}
