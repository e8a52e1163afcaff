use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::error::Result;
use crate::import::shared::normalize_label;

/// Which header a labelled cell announces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    TrainNumber,
    Km,
    StationStart,
    StationEnd,
    StopType,
}

/// Accepted spellings for each header label
///
/// Spellings are compared after [`normalize_label`], so configured values may
/// carry accents, capitals or a trailing colon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderLabels {
    #[serde(default = "default_train_labels")]
    pub train_number: Vec<String>,
    #[serde(default = "default_km_labels")]
    pub km: Vec<String>,
    #[serde(default = "default_station_start_labels")]
    pub station_start: Vec<String>,
    #[serde(default = "default_station_end_labels")]
    pub station_end: Vec<String>,
    #[serde(default = "default_stop_type_labels")]
    pub stop_type: Vec<String>,
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn default_train_labels() -> Vec<String> {
    to_strings(&["numer pociagu", "nr pociagu", "pociag", "train number"])
}

fn default_km_labels() -> Vec<String> {
    to_strings(&["km", "kilometraz", "kilometr"])
}

fn default_station_start_labels() -> Vec<String> {
    to_strings(&["ze stacji", "od stacji", "start stacji"])
}

fn default_station_end_labels() -> Vec<String> {
    to_strings(&["do stacji", "na stacje", "cel stacji", "koniec stacji"])
}

fn default_stop_type_labels() -> Vec<String> {
    to_strings(&["p/o"])
}

impl Default for HeaderLabels {
    fn default() -> Self {
        Self {
            train_number: default_train_labels(),
            km: default_km_labels(),
            station_start: default_station_start_labels(),
            station_end: default_station_end_labels(),
            stop_type: default_stop_type_labels(),
        }
    }
}

impl HeaderLabels {
    /// Build a lookup from normalized label to header kind
    ///
    /// When the same spelling is configured for two kinds, the kind listed
    /// first (train, km, start, end, stop type) keeps it.
    #[must_use]
    pub fn matcher(&self) -> HeaderMatcher {
        let groups = [
            (HeaderKind::TrainNumber, &self.train_number),
            (HeaderKind::Km, &self.km),
            (HeaderKind::StationStart, &self.station_start),
            (HeaderKind::StationEnd, &self.station_end),
            (HeaderKind::StopType, &self.stop_type),
        ];

        let mut labels = HashMap::new();
        for (kind, variants) in groups {
            for variant in variants {
                let key = normalize_label(variant);
                if !key.is_empty() {
                    labels.entry(key).or_insert(kind);
                }
            }
        }
        HeaderMatcher { labels }
    }
}

/// Normalized header label lookup
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    labels: HashMap<String, HeaderKind>,
}

impl HeaderMatcher {
    /// Classify an already-normalized cell text
    #[must_use]
    pub fn classify(&self, normalized: &str) -> Option<HeaderKind> {
        self.labels.get(normalized).copied()
    }
}

/// Knobs for workbook extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOptions {
    #[serde(default)]
    pub labels: HeaderLabels,
    /// Drop train columns the workbook marks as hidden
    #[serde(default = "default_skip_hidden")]
    pub skip_hidden_columns: bool,
}

fn default_skip_hidden() -> bool {
    true
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            labels: HeaderLabels::default(),
            skip_hidden_columns: true,
        }
    }
}

impl ImportOptions {
    /// Load options from JSON; missing fields keep their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
