use indexmap::IndexMap;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use crate::import::shared::normalize_label;
use crate::models::SheetGrid;
use crate::time::parse_time;

/// Hands out unique keys for repeated train numbers: "101", "101 (2)", ...
///
/// A suffixed key that a header already uses verbatim is skipped.
#[derive(Default)]
struct KeyAllocator {
    counters: HashMap<String, usize>,
}

impl KeyAllocator {
    fn next(&mut self, base: &str, taken: &IndexMap<String, usize>) -> String {
        let count = self.counters.entry(base.to_string()).or_insert(0);
        loop {
            *count += 1;
            let candidate = if *count == 1 {
                base.to_string()
            } else {
                format!("{base} ({count})")
            };
            if !taken.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

/// Rows strictly between the station range headers, if the range is known
/// and non-empty
fn station_rows(start: Option<usize>, end: Option<usize>) -> Option<RangeInclusive<usize>> {
    let first = start? + 1;
    let last = end?.checked_sub(1)?;
    (last >= first).then_some(first..=last)
}

/// Map each train header to the column holding its times
///
/// A header cell is a train number when its text contains a digit. Headers
/// may span several columns (a merged cell expanded across its range, or the
/// same text repeated): the span runs right over empty cells and cells with
/// the same normalized text.
///
/// Column choice:
/// - single column: the header column if any station row below it holds a
///   time, else the next column if that one does, else the next column anyway
/// - span: every span column holding a time becomes its own entry; if none
///   does, each span column maps to the column after it
///
/// Repeated train numbers get keys suffixed with " (2)", " (3)", ... in the
/// order they are found. Without a known station range there is nothing to
/// verify against, so single headers keep their own column.
#[must_use]
pub fn extract_train_columns(
    grid: &SheetGrid,
    train_row: usize,
    station_start_row: Option<usize>,
    station_end_row: Option<usize>,
) -> IndexMap<String, usize> {
    let mut mapping = IndexMap::new();
    let mut keys = KeyAllocator::default();
    let ncols = grid.width();
    let rows = station_rows(station_start_row, station_end_row);

    let column_has_time = |col: usize| -> bool {
        rows.clone()
            .is_some_and(|mut range| range.any(|r| parse_time(grid.cell(r, col)).is_some()))
    };
    let next_or_same = |col: usize| if col + 1 < ncols { col + 1 } else { col };

    let mut c = 0;
    while c < ncols {
        let Some(header) = grid.cell(train_row, c).as_text() else {
            c += 1;
            continue;
        };
        if !header.chars().any(|ch| ch.is_ascii_digit()) {
            c += 1;
            continue;
        }

        let span_end = span_end(grid, train_row, c, ncols, &normalize_label(&header));

        if span_end == c {
            let time_col = if rows.is_none() || column_has_time(c) {
                c
            } else if c + 1 < ncols && column_has_time(c + 1) {
                c + 1
            } else {
                next_or_same(c)
            };
            let key = keys.next(&header, &mapping);
            mapping.insert(key, time_col);
        } else {
            let timed: Vec<usize> = (c..=span_end).filter(|&j| column_has_time(j)).collect();
            if timed.is_empty() {
                for j in c..=span_end {
                    let key = keys.next(&header, &mapping);
                    mapping.insert(key, next_or_same(j));
                }
            } else {
                for j in timed {
                    let key = keys.next(&header, &mapping);
                    mapping.insert(key, j);
                }
            }
        }

        c = span_end + 1;
    }

    mapping
}

/// Last column of the header span starting at `start`
fn span_end(grid: &SheetGrid, row: usize, start: usize, ncols: usize, normalized: &str) -> usize {
    let mut end = start;
    while end + 1 < ncols {
        let next = grid.cell(row, end + 1);
        let continues = match next.as_text() {
            None => true,
            Some(text) => {
                let next_norm = normalize_label(&text);
                !next_norm.is_empty() && next_norm == normalized
            }
        };
        if !continues {
            break;
        }
        end += 1;
    }
    end
}
