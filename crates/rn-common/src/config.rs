use std::path::Path;

use crate::error::ConfigError;
use crate::location::FacilityTables;
use crate::salary::SalaryType;

pub const FACILITIES_PATH_ENV: &str = "RN_FACILITIES_PATH";

/// Salary plausibility bounds and the unit-inference threshold.
///
/// Amounts below `hourly_threshold` with no unit keyword are read as hourly,
/// amounts at or above `annual_floor_magnitude` as annual. Anything between
/// is left unparsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryConfig {
    pub hourly_threshold: f64,
    pub annual_floor_magnitude: f64,
    pub hourly_min: f64,
    pub hourly_max: f64,
    pub annual_min: f64,
    pub annual_max: f64,
    pub weekly_min: f64,
    pub weekly_max: f64,
}

impl Default for SalaryConfig {
    fn default() -> Self {
        Self {
            hourly_threshold: 200.0,
            annual_floor_magnitude: 1_000.0,
            hourly_min: 15.0,
            hourly_max: 500.0,
            annual_min: 30_000.0,
            annual_max: 1_000_000.0,
            weekly_min: 300.0,
            weekly_max: 15_000.0,
        }
    }
}

impl SalaryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` over an arbitrary key lookup. Missing, unparseable,
    /// or non-positive values keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_f64 = |key: &str, default: f64| -> f64 {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite() && *value > 0.0)
                .unwrap_or(default)
        };

        let defaults = Self::default();
        Self {
            hourly_threshold: parse_f64("RN_SALARY_HOURLY_THRESHOLD", defaults.hourly_threshold),
            annual_floor_magnitude: defaults.annual_floor_magnitude,
            hourly_min: parse_f64("RN_SALARY_HOURLY_MIN", defaults.hourly_min),
            hourly_max: parse_f64("RN_SALARY_HOURLY_MAX", defaults.hourly_max),
            annual_min: parse_f64("RN_SALARY_ANNUAL_MIN", defaults.annual_min),
            annual_max: parse_f64("RN_SALARY_ANNUAL_MAX", defaults.annual_max),
            weekly_min: parse_f64("RN_SALARY_WEEKLY_MIN", defaults.weekly_min),
            weekly_max: parse_f64("RN_SALARY_WEEKLY_MAX", defaults.weekly_max),
        }
    }

    pub fn bounds(&self, salary_type: SalaryType) -> (f64, f64) {
        match salary_type {
            SalaryType::Hourly => (self.hourly_min, self.hourly_max),
            SalaryType::Annual => (self.annual_min, self.annual_max),
            SalaryType::Weekly => (self.weekly_min, self.weekly_max),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NormalizerConfig {
    pub salary: SalaryConfig,
    pub facilities: FacilityTables,
}

impl NormalizerConfig {
    /// Salary settings from the environment plus an optional facility table file.
    pub fn load(facilities_path: Option<&Path>) -> Result<Self, ConfigError> {
        let facilities = match facilities_path {
            Some(path) => FacilityTables::from_json_file(path)?,
            None => FacilityTables::default(),
        };

        Ok(Self {
            salary: SalaryConfig::from_env(),
            facilities,
        })
    }
}
