use std::collections::HashMap;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static BUILTIN_JSON: &str = include_str!("../assets/cities.json");
static BUILTIN: OnceCell<CityTable> = OnceCell::new();

/// Home city of a club, keyed by the club name as the archive spells it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Read-only lookup from home-team display name to its city.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityTable {
    entries: HashMap<String, CityRecord>,
}

impl CityTable {
    /// Serie A and Premier League clubs, parsed once from the bundled asset.
    pub fn builtin() -> &'static CityTable {
        BUILTIN.get_or_init(|| CityTable::from_json(BUILTIN_JSON).unwrap_or_default())
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn lookup(&self, team: &str) -> Option<&CityRecord> {
        self.entries.get(team)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, CityRecord)> for CityTable {
    fn from_iter<I: IntoIterator<Item = (String, CityRecord)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
