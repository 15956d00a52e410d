use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::corrections::us_state::correct_state;
use crate::error::ConfigError;
use crate::normalize::normalize_text;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityLocation {
    pub city: String,
    pub state: String,
}

/// One employer's known sites: city -> state, and facility name -> city/state.
///
/// Keys are stored normalized (lower-case, single spaces) and states as USPS
/// codes; entries whose state does not correct are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityDirectory {
    pub cities: HashMap<String, String>,
    pub facilities: HashMap<String, FacilityLocation>,
}

impl FacilityDirectory {
    pub fn with_city(mut self, city: &str, state: &str) -> Self {
        if let Some(state) = correct_state(state) {
            self.cities.insert(normalize_text(city), state);
        }
        self
    }

    pub fn with_facility(mut self, name: &str, city: &str, state: &str) -> Self {
        if let Some(state) = correct_state(state) {
            self.facilities.insert(
                normalize_text(name),
                FacilityLocation {
                    city: city.trim().to_string(),
                    state,
                },
            );
        }
        self
    }

    /// Re-keys a directory read from JSON.
    pub fn normalized(self) -> Self {
        let mut out = FacilityDirectory::default();
        for (city, state) in &self.cities {
            match correct_state(state) {
                Some(_) => out = out.with_city(city, state),
                None => warn!(city = %city, state = %state, "dropping facility city with unknown state"),
            }
        }
        for (name, location) in &self.facilities {
            match correct_state(&location.state) {
                Some(_) => out = out.with_facility(name, &location.city, &location.state),
                None => warn!(facility = %name, state = %location.state, "dropping facility with unknown state"),
            }
        }
        out
    }

    pub fn state_for_city(&self, city: &str) -> Option<&str> {
        self.cities.get(&normalize_text(city)).map(String::as_str)
    }

    /// Longest facility name contained in `text`; ties break alphabetically
    /// so the answer does not depend on map order.
    pub fn find_facility(&self, text: &str) -> Option<&FacilityLocation> {
        let haystack = normalize_text(text);
        if haystack.is_empty() {
            return None;
        }

        self.facilities
            .iter()
            .filter(|(name, _)| !name.is_empty() && haystack.contains(name.as_str()))
            .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
            .map(|(_, location)| location)
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty() && self.facilities.is_empty()
    }
}

/// Per-employer override tables, keyed by normalized employer name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityTables {
    employers: HashMap<String, FacilityDirectory>,
}

impl FacilityTables {
    pub fn insert(&mut self, employer: &str, directory: FacilityDirectory) {
        self.employers
            .insert(normalize_text(employer), directory.normalized());
    }

    pub fn for_employer(&self, employer: Option<&str>) -> Option<&FacilityDirectory> {
        let key = normalize_text(employer?);
        self.employers.get(&key)
    }

    pub fn len(&self) -> usize {
        self.employers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employers.is_empty()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed: HashMap<String, FacilityDirectory> = serde_json::from_str(raw)?;
        let mut tables = FacilityTables::default();
        for (employer, directory) in parsed {
            tables.insert(&employer, directory);
        }
        Ok(tables)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let tables = Self::from_json_str(&raw)?;
        info!(path = %path.display(), employers = tables.len(), "loaded facility tables");
        Ok(tables)
    }
}
