#![warn(clippy::complexity)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::suspicious)]
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use rail_timetable::config::ImportOptions;
use rail_timetable::export::{build_circuits, build_timetable_export, circuits_sheet, ExportSheet};
use rail_timetable::import::{extract_workbook, CsvSheetReader};
use rail_timetable::models::Workbook;
use rail_timetable::storage::serialize_project;

const USAGE: &str = "\
usage: rail_timetable [--out FILE] [--labels FILE] [--export DIR] [--delimiter CHAR] SHEET.csv...

Each CSV file becomes one sheet named after the file; the first one is the
reference sheet. The project JSON goes to --out or stdout. --export writes
the re-export layout and the vehicle circuits as CSV files into DIR.";

#[derive(Debug, Default)]
struct Args {
    out: Option<PathBuf>,
    labels: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    delimiter: Option<u8>,
    inputs: Vec<PathBuf>,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();
    while let Some(arg) = raw.next() {
        let mut value = |flag: &str| raw.next().ok_or_else(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--out" => args.out = Some(value("--out")?.into()),
            "--labels" => args.labels = Some(value("--labels")?.into()),
            "--export" => args.export_dir = Some(value("--export")?.into()),
            "--delimiter" => {
                let delimiter = value("--delimiter")?;
                let &[byte] = delimiter.as_bytes() else {
                    return Err(format!("delimiter must be a single byte, got '{delimiter}'"));
                };
                args.delimiter = Some(byte);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}\n\n{USAGE}")),
            other => args.inputs.push(PathBuf::from(other)),
        }
    }
    if args.inputs.is_empty() {
        return Err(USAGE.to_string());
    }
    Ok(args)
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_sheet(dir: &Path, sheet: &ExportSheet) -> Result<(), Box<dyn Error>> {
    let path = dir.join(format!("{}.csv", sheet.name));
    std::fs::write(&path, sheet.to_csv()?)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let options = match &args.labels {
        Some(path) => ImportOptions::from_json_str(&std::fs::read_to_string(path)?)?,
        None => ImportOptions::default(),
    };

    let mut sheets = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let mut reader = CsvSheetReader::new(sheet_name(path));
        if let Some(delimiter) = args.delimiter {
            reader = reader.with_delimiter(delimiter);
        }
        sheets.push(reader.read_sheet(&std::fs::read_to_string(path)?)?);
    }

    let extraction = extract_workbook(&Workbook::new(sheets), &options)?;
    if !extraction.station_check.ok {
        log::warn!("{} station mismatches between sheets", extraction.station_check.mismatches.len());
    }
    let timetable = extraction.timetable;

    let uploaded_name = args
        .inputs
        .first()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let selected = timetable.sheets.first().map(|s| s.name.clone()).unwrap_or_default();
    let project = serialize_project(&timetable, &uploaded_name, &selected)?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, &project)?;
            log::info!("Wrote project to {}", path.display());
        }
        None => println!("{}", String::from_utf8(project)?),
    }

    if let Some(dir) = &args.export_dir {
        std::fs::create_dir_all(dir)?;
        for sheet in build_timetable_export(&timetable) {
            write_sheet(dir, &sheet)?;
        }
        write_sheet(dir, &circuits_sheet(&build_circuits(&timetable)))?;
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
