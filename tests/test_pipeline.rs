use rail_timetable::config::ImportOptions;
use rail_timetable::import::{extract_workbook, CsvSheetReader, WorkbookReader};
use rail_timetable::models::{SaveTimeRequest, Workbook};
use rail_timetable::{LoadOutcome, Result, Session};

// Two sheets of one line, `Legnica` (km 0) to `Wrocław` (km 65).
//
// sheet | train | stops
// WL    | 101   | Legnica 6:00, Jawor 6:30, Wrocław 7:30
// WL    | 103   | Legnica 23:30, Jawor 23:55, Wrocław 0:40 next day
// LW    | 202   | Wrocław 10:00, Jawor 11:00, Legnica 11:30
//
// LW counts km from Wrocław, so Jawor is km 20 on WL and km 45 on LW.
const WL: &str = "\
,numer pociągu,101,103
km,ze stacji,,
0,Legnica,6:00,23:30
20,Jawor,6:30,23:55
65,Wrocław,7:30,0:40
,do stacji,,
";

const LW: &str = "\
,numer pociągu,202
km,ze stacji,
0,Wrocław,10:00
45,Jawor,11:00
65,Legnica,11:30
,do stacji,
";

/// Sheets separated by a line holding only `---`, named in order
struct MultiCsvReader(Vec<&'static str>);

impl WorkbookReader for MultiCsvReader {
    fn read_workbook(&self, bytes: &[u8]) -> Result<Workbook> {
        let content = String::from_utf8(bytes.to_vec())?;
        let sheets = content
            .split("---\n")
            .zip(&self.0)
            .map(|(csv, name)| CsvSheetReader::new(*name).read_sheet(csv))
            .collect::<Result<Vec<_>>>()?;
        Ok(Workbook::new(sheets))
    }
}

fn load() -> Result<Session> {
    let bytes = format!("{WL}---\n{LW}");
    let mut session = Session::new();
    let outcome = session.load_workbook(
        bytes.as_bytes(),
        "linia.csv",
        &MultiCsvReader(vec!["WL", "LW"]),
        &ImportOptions::default(),
    )?;
    assert_eq!(outcome, LoadOutcome::Loaded {
        sheets: vec!["WL".to_string(), "LW".to_string()],
    });
    Ok(session)
}

fn time_of(session: &Session, sheet: &str, train: &str, station: &str) -> Option<f64> {
    session
        .timetable()
        .sheet(sheet)?
        .train_records(train)
        .find(|r| r.station == station)
        .map(|r| r.time_decimal)
}

#[test]
fn test_extraction() -> Result<()> {
    let session = load()?;
    assert!(session.station_check().ok);
    assert_eq!(session.selected_sheet(), "WL");

    // 103 crosses midnight before Wrocław
    let arrival = time_of(&session, "WL", "103", "Wrocław").expect("has a time");
    assert!((arrival - (24.0 + 40.0 / 60.0)).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_cross_sheet_edit_propagates_on_own_scale() -> Result<()> {
    let mut session = load()?;

    // The plot shows 202 on the WL scale, so the edit arrives with km 20
    let saved = session.save_time(&SaveTimeRequest {
        sheet: "LW".to_string(),
        station: "Jawor".to_string(),
        km: 20.0,
        train_number: "202".to_string(),
        hour: 11,
        minute: 10,
        second: 0,
        day_offset: 0,
        stop_type: None,
        propagate: true,
    });
    assert!(saved);

    let jawor = time_of(&session, "LW", "202", "Jawor").expect("has a time");
    let legnica = time_of(&session, "LW", "202", "Legnica").expect("has a time");
    let wroclaw = time_of(&session, "LW", "202", "Wrocław").expect("has a time");
    assert!((jawor - (11.0 + 10.0 / 60.0)).abs() < 1e-9);
    assert!((legnica - (11.5 + 10.0 / 60.0)).abs() < 1e-9);
    assert!((wroclaw - 10.0).abs() < 1e-9);
    assert_eq!(session.timetable().sheet("LW").expect("sheet").records.len(), 3);

    let payload = session.trains_payload();
    assert_eq!(payload.plot_series.len(), 3);
    let lw = payload.plot_series.iter().find(|s| s.name == "202 (LW)").expect("series");
    let kms: Vec<f64> = lw.points.iter().map(|p| p.km).collect();
    assert_eq!(kms, vec![65.0, 20.0, 0.0]);
    Ok(())
}

#[test]
fn test_export_reimports_to_same_records() -> Result<()> {
    let session = load()?;
    let exported = session.export_timetable();
    assert_eq!(exported.len(), 2);

    let csv = exported[0].to_csv()?;
    let grid = CsvSheetReader::new("WL").read_sheet(&csv)?;
    let extraction = extract_workbook(&Workbook::new(vec![grid]), &ImportOptions::default())?;

    let original = session.timetable().sheet("WL").expect("sheet");
    let reimported = extraction.timetable.sheet("WL").expect("sheet");
    assert_eq!(reimported.records, original.records);
    Ok(())
}

#[test]
fn test_project_round_trip() -> Result<()> {
    let mut session = load()?;
    session.set_train_color("101", "#e6194b");
    session.select_sheet("LW")?;

    let bytes = session.export_project()?;
    let mut restored = Session::new();
    restored.load_project(&bytes)?;

    assert_eq!(restored.timetable(), session.timetable());
    assert_eq!(restored.selected_sheet(), "LW");
    assert_eq!(restored.uploaded_name(), "linia.csv");
    Ok(())
}
