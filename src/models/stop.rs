use serde::{Deserialize, Serialize};
use std::fmt;

/// Arrival ("p", przyjazd) or departure ("o", odjazd) at a dual station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopType {
    #[serde(rename = "p")]
    Arrival,
    #[serde(rename = "o")]
    Departure,
}

impl StopType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arrival => "p",
            Self::Departure => "o",
        }
    }

    /// Parse a "p"/"o" marker (case and surrounding whitespace ignored)
    #[must_use]
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.trim().to_lowercase().as_str() {
            "p" => Some(Self::Arrival),
            "o" => Some(Self::Departure),
            _ => None,
        }
    }
}

impl fmt::Display for StopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timed stop of one train on one sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainStopRecord {
    pub train_number: String,
    pub station: String,
    pub km: f64,
    /// Hours since midnight of the train's first day; values past 24 fall on
    /// later days
    pub time_decimal: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_type: Option<StopType>,
}

/// Identity of a record within a sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordKey<'a> {
    pub station: &'a str,
    pub km: f64,
    pub train_number: &'a str,
    pub stop_type: Option<StopType>,
}

impl TrainStopRecord {
    #[must_use]
    pub fn key(&self) -> RecordKey<'_> {
        RecordKey {
            station: &self.station,
            km: self.km,
            train_number: &self.train_number,
            stop_type: self.stop_type,
        }
    }

    #[must_use]
    pub fn matches(&self, key: &RecordKey<'_>) -> bool {
        self.key() == *key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stop_type: Option<StopType>) -> TrainStopRecord {
        TrainStopRecord {
            train_number: "301".to_string(),
            station: "B".to_string(),
            km: 10.0,
            time_decimal: 6.5,
            stop_type,
        }
    }

    #[test]
    fn test_stop_type_markers() {
        assert_eq!(StopType::from_marker("p"), Some(StopType::Arrival));
        assert_eq!(StopType::from_marker(" O "), Some(StopType::Departure));
        assert_eq!(StopType::from_marker("x"), None);
        assert_eq!(StopType::Departure.to_string(), "o");
    }

    #[test]
    fn test_key_includes_stop_type() {
        let arrival = record(Some(StopType::Arrival));
        let departure = record(Some(StopType::Departure));
        assert!(!arrival.matches(&departure.key()));
        assert!(arrival.matches(&record(Some(StopType::Arrival)).key()));
        assert!(!record(None).matches(&arrival.key()));
    }

    #[test]
    fn test_record_json_omits_missing_stop_type() {
        let json = serde_json::to_string(&record(None)).expect("serializes");
        assert!(!json.contains("stop_type"));

        let json = serde_json::to_string(&record(Some(StopType::Departure))).expect("serializes");
        assert!(json.contains(r#""stop_type":"o""#));
    }
}
