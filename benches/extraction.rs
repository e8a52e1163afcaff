use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rail_timetable::config::ImportOptions;
use rail_timetable::import::extract_workbook;
use rail_timetable::models::{CellValue, SheetGrid, Workbook};
use rail_timetable::view::build_trains_payload;

const STATIONS: usize = 60;
const TRAINS: usize = 120;

/// A sheet laid out like a real timetable: headers on top, stations down
/// column B, one train every 10 minutes crossing midnight near the end
fn synthetic_sheet(name: &str) -> SheetGrid {
    let width = TRAINS + 2;
    let mut rows = vec![vec![CellValue::Empty; width]; STATIONS + 3];

    rows[0][1] = CellValue::from("numer pociągu");
    rows[1][0] = CellValue::from("km");
    rows[1][1] = CellValue::from("ze stacji");
    rows[STATIONS + 2][1] = CellValue::from("do stacji");

    for t in 0..TRAINS {
        rows[0][t + 2] = CellValue::Text(format!("{}", 1000 + t));
    }
    for s in 0..STATIONS {
        let row = &mut rows[s + 2];
        row[0] = CellValue::Text(format!("{},{}", s * 3, s % 10));
        row[1] = CellValue::Text(format!("Stacja {s}"));
        for t in 0..TRAINS {
            let minutes = (300 + t * 10 + s * 4) % (24 * 60);
            row[t + 2] = CellValue::Text(format!("{}:{:02}", minutes / 60, minutes % 60));
        }
    }

    SheetGrid::new(name, rows)
}

fn benchmark_extraction(c: &mut Criterion) {
    let workbook = Workbook::new(vec![synthetic_sheet("WL"), synthetic_sheet("LW")]);
    let options = ImportOptions::default();

    c.bench_function("extract_workbook", |b| {
        b.iter(|| extract_workbook(black_box(&workbook), black_box(&options)));
    });

    let Ok(extraction) = extract_workbook(&workbook, &options) else {
        return;
    };

    c.bench_function("build_trains_payload", |b| {
        b.iter(|| build_trains_payload(black_box(&extraction.timetable), black_box("WL")));
    });
}

criterion_group!(benches, benchmark_extraction);
criterion_main!(benches);
