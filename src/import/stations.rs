use crate::import::headers::StationRange;
use crate::import::shared::parse_km;
use crate::models::SheetGrid;

/// One row of a sheet's station table
#[derive(Debug, Clone, PartialEq)]
pub struct StationRow {
    pub km: f64,
    pub name: String,
    pub row: usize,
}

/// Read the station table between the range-start and range-end header rows
///
/// Header rows themselves are excluded. A row counts only when it has a
/// station name and a km value that parses. Rows come back in sheet order;
/// callers sort by km where distance ordering matters.
#[must_use]
pub fn extract_stations(grid: &SheetGrid, range: StationRange) -> Vec<StationRow> {
    let first = range.start_row + 1;
    let Some(last) = range.end_row.checked_sub(1) else {
        return Vec::new();
    };

    (first..=last)
        .filter_map(|r| {
            let name = grid.cell(r, range.station_col).as_text()?;
            let km = parse_km(grid.cell(r, range.km_col))?;
            Some(StationRow { km, name, row: r })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn grid() -> SheetGrid {
        let rows = vec![
            vec![CellValue::from("km"), CellValue::from("ze stacji")],
            vec![CellValue::Number(0.0), CellValue::from("Legnica")],
            vec![CellValue::from("20,5"), CellValue::from("Jawor")],
            vec![CellValue::from(""), CellValue::from("uwagi")],
            vec![CellValue::from("30"), CellValue::Empty],
            vec![CellValue::from("65.2"), CellValue::from("Wrocław")],
            vec![CellValue::Empty, CellValue::from("do stacji")],
            vec![CellValue::from("70"), CellValue::from("Poza zakresem")],
        ];
        SheetGrid::new("S", rows)
    }

    fn range() -> StationRange {
        StationRange { start_row: 0, end_row: 6, station_col: 1, km_col: 0 }
    }

    #[test]
    fn test_extract_stations_skips_incomplete_rows() {
        let stations = extract_stations(&grid(), range());
        let names: Vec<&str> = stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Legnica", "Jawor", "Wrocław"]);
        assert_eq!(stations[1].km, 20.5);
        assert_eq!(stations[1].row, 2);
        assert_eq!(stations[2].km, 65.2);
    }

    #[test]
    fn test_extract_stations_empty_window() {
        let r = StationRange { start_row: 3, end_row: 4, station_col: 1, km_col: 0 };
        assert!(extract_stations(&grid(), r).is_empty());

        let r = StationRange { start_row: 0, end_row: 0, station_col: 1, km_col: 0 };
        assert!(extract_stations(&grid(), r).is_empty());
    }

    #[test]
    fn test_extract_stations_keeps_sheet_order() {
        let rows = vec![
            vec![CellValue::from("ze stacji"), CellValue::Empty],
            vec![CellValue::from("B"), CellValue::Number(10.0)],
            vec![CellValue::from("A"), CellValue::Number(0.0)],
            vec![CellValue::from("do stacji"), CellValue::Empty],
        ];
        let g = SheetGrid::new("S", rows);
        let r = StationRange { start_row: 0, end_row: 3, station_col: 0, km_col: 1 };
        let stations = extract_stations(&g, r);
        assert_eq!(stations[0].name, "B");
        assert_eq!(stations[1].name, "A");
    }
}
