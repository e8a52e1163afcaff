use sha2::{Digest, Sha256};
use crate::config::ImportOptions;
use crate::error::{Result, TimetableError};
use crate::export::{build_circuits, build_timetable_export, circuits_sheet, ExportSheet};
use crate::import::{extract_workbook, WorkbookReader};
use crate::logging::dev_log;
use crate::models::{CellEdit, ClearTimeRequest, SaveTimeRequest, StationCheck, TimeEdits, Timetable};
use crate::storage::{deserialize_project, serialize_project};
use crate::view::{build_trains_payload, TrainsPayload};

/// What a load call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Same bytes as the last load; nothing was touched
    Unchanged,
    Loaded { sheets: Vec<String> },
}

/// State of one logical editing session
///
/// Each session owns its timetable outright. Callers that share a session
/// between requests must serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct Session {
    timetable: Timetable,
    station_check: StationCheck,
    selected_sheet: String,
    uploaded_hash: Option<String>,
    uploaded_name: String,
}

fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    #[must_use]
    pub fn station_check(&self) -> &StationCheck {
        &self.station_check
    }

    #[must_use]
    pub fn selected_sheet(&self) -> &str {
        &self.selected_sheet
    }

    #[must_use]
    pub fn uploaded_name(&self) -> &str {
        &self.uploaded_name
    }

    /// Replace the timetable with a freshly extracted workbook
    ///
    /// Train colors survive the reload. The selected sheet is kept when the
    /// new workbook still has it, otherwise the first sheet is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails or the first sheet lacks station
    /// headers. The session is left untouched in that case.
    pub fn load_workbook(
        &mut self,
        bytes: &[u8],
        filename: &str,
        reader: &impl WorkbookReader,
        options: &ImportOptions,
    ) -> Result<LoadOutcome> {
        let hash = content_hash(bytes);
        if self.uploaded_hash.as_deref() == Some(hash.as_str()) {
            dev_log!("Workbook {filename} unchanged, skipping reload");
            return Ok(LoadOutcome::Unchanged);
        }

        let workbook = reader.read_workbook(bytes)?;
        let extraction = extract_workbook(&workbook, options)?;

        let colors = std::mem::take(&mut self.timetable.train_colors);
        self.timetable = extraction.timetable;
        self.timetable.train_colors = colors;
        self.station_check = extraction.station_check;
        self.uploaded_hash = Some(hash);
        self.uploaded_name = filename.to_string();

        let sheets = self.sheet_names();
        if !sheets.contains(&self.selected_sheet) {
            self.selected_sheet = sheets.first().cloned().unwrap_or_default();
        }
        log::info!("Loaded {filename}: {} sheets", sheets.len());
        Ok(LoadOutcome::Loaded { sheets })
    }

    /// Replace the session with a saved project
    ///
    /// # Errors
    ///
    /// Returns an error if the project file is malformed.
    pub fn load_project(&mut self, bytes: &[u8]) -> Result<LoadOutcome> {
        let hash = content_hash(bytes);
        if self.uploaded_hash.as_deref() == Some(hash.as_str()) {
            return Ok(LoadOutcome::Unchanged);
        }

        let project = deserialize_project(bytes)?;
        self.timetable = project.timetable;
        self.station_check = StationCheck::from_mismatches(Vec::new());
        self.selected_sheet = project.selected_sheet;
        self.uploaded_name = project.uploaded_name;
        self.uploaded_hash = Some(hash);

        Ok(LoadOutcome::Loaded {
            sheets: self.sheet_names(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_project(&self) -> Result<Vec<u8>> {
        serialize_project(&self.timetable, &self.uploaded_name, &self.selected_sheet)
    }

    /// # Errors
    ///
    /// Returns [`TimetableError::UnknownSheet`] if no sheet has that name.
    pub fn select_sheet(&mut self, name: &str) -> Result<()> {
        if self.timetable.sheet(name).is_none() {
            return Err(TimetableError::UnknownSheet(name.to_string()));
        }
        self.selected_sheet = name.to_string();
        Ok(())
    }

    pub fn set_train_color(&mut self, train_number: &str, color: &str) {
        self.timetable.set_train_color(train_number, color);
    }

    pub fn clear_train_colors(&mut self) {
        self.timetable.clear_train_colors();
    }

    pub fn save_time(&mut self, request: &SaveTimeRequest) -> bool {
        self.timetable.save_time(request)
    }

    pub fn clear_time(&mut self, request: &ClearTimeRequest) -> bool {
        self.timetable.clear_time(request)
    }

    /// Apply grid edits to the selected sheet
    pub fn apply_cell_edits(&mut self, edits: &[CellEdit]) -> Vec<String> {
        self.timetable.apply_cell_edits(&self.selected_sheet, edits)
    }

    #[must_use]
    pub fn trains_payload(&self) -> TrainsPayload {
        build_trains_payload(&self.timetable, &self.selected_sheet)
    }

    #[must_use]
    pub fn export_timetable(&self) -> Vec<ExportSheet> {
        build_timetable_export(&self.timetable)
    }

    #[must_use]
    pub fn export_circuits(&self) -> ExportSheet {
        circuits_sheet(&build_circuits(&self.timetable))
    }

    fn sheet_names(&self) -> Vec<String> {
        self.timetable.sheets.iter().map(|s| s.name.clone()).collect()
    }
}
