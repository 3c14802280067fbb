// src/domain/area.rs
//
// Monitoring areas and their geographic position

use std::hash::{Hash, Hasher};

/// Geographic position of a monitoring area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// An area that will be observed during a bird count.
///
/// Each area is identified through a globally unique, stable code plus a
/// "plaintext" name. Equality and hashing go by the code only.
#[derive(Debug, Clone)]
pub struct MonitoringArea {
    name: String,
    code: String,
    location: Location,
}

impl MonitoringArea {
    pub fn new(name: impl Into<String>, code: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

impl PartialEq for MonitoringArea {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for MonitoringArea {}

impl Hash for MonitoringArea {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl std::fmt::Display for MonitoringArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// A station observers are assigned to during a census.
///
/// Modeled as composition: a monitoring area value plus the codes of the
/// areas it aggregates. Stations are an in-memory concept only and are not
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringStation {
    area: MonitoringArea,
    observed_area_codes: Vec<String>,
}

impl MonitoringStation {
    pub fn new(area: MonitoringArea) -> Self {
        Self {
            area,
            observed_area_codes: Vec::new(),
        }
    }

    pub fn area(&self) -> &MonitoringArea {
        &self.area
    }

    pub fn observed_area_codes(&self) -> &[String] {
        &self.observed_area_codes
    }

    pub fn set_observed_areas(&mut self, codes: Vec<String>) {
        self.observed_area_codes = codes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn areas_compare_by_code_only() {
        let bay = MonitoringArea::new("Southern Bay", "SB", Location::new(54.1, 8.85));
        let renamed = MonitoringArea::new("South Bay", "SB", Location::new(0.0, 0.0));
        let pond = MonitoringArea::new("Great Pond", "GP", Location::new(54.2, 8.9));

        assert_eq!(bay, renamed);
        assert_ne!(bay, pond);
    }

    #[test]
    fn station_aggregates_area_codes() {
        let area = MonitoringArea::new("Lighthouse", "LH", Location::new(54.0, 8.8));
        let mut station = MonitoringStation::new(area);
        assert!(station.observed_area_codes().is_empty());

        station.set_observed_areas(vec!["SB".to_string(), "GP".to_string()]);
        assert_eq!(station.observed_area_codes(), ["SB", "GP"]);
    }
}
