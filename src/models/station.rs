use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Station name → km for one sheet, in the order the sheet lists them
pub type StationMap = IndexMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub km: f64,
}

/// Stations of a map ordered by km (ascending = downstream)
#[must_use]
pub fn stations_by_km(map: &StationMap) -> Vec<Station> {
    let mut stations: Vec<Station> = map
        .iter()
        .map(|(name, &km)| Station { name: name.clone(), km })
        .collect();
    stations.sort_by(|a, b| a.km.total_cmp(&b.km));
    stations
}
