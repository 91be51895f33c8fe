use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::visibility::DEFAULT_MIN_ELEVATION_DEG;

const DEFAULT_SEARCH_WINDOW_DAYS: i64 = 1;
const DEFAULT_ENTITY_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("at least one evaluation time is required")]
    NoTimes,
    #[error("minimum elevation must be within [-90, 90] degrees, got {0}")]
    ElevationOutOfRange(f64),
    #[error("search window must be positive, got {0} days")]
    NonPositiveWindow(i64),
    #[error("entity limits must be positive")]
    ZeroLimit,
}

/// Inclusive time window the data providers are queried for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Resolved query parameters for a visibility session.
///
/// Immutable once built; construct through [`ParamsBuilder`] or load from
/// a YAML document. Unknown keys in a document are rejected rather than
/// merged in.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    /// Instants to evaluate, in request order.
    #[serde(deserialize_with = "deserialize_times")]
    pub times: Vec<DateTime<Utc>>,
    /// Minimum elevation above the horizon for a hit, in degrees.
    #[serde(default = "default_min_elevation")]
    pub minimum_elevation_degrees: f64,
    /// Days either side of the requested times the providers are asked to
    /// cover.
    #[serde(default = "default_search_window_days")]
    pub search_window_days: i64,
    /// Satellites to consider; `None` means all available.
    #[serde(default)]
    pub satellite_ids: Option<Vec<u32>>,
    /// Vessels to consider; `None` means all available.
    #[serde(default)]
    pub vessel_ids: Option<Vec<u32>>,
    /// Cap on discovered satellites, applied only without an explicit
    /// satellite filter.
    #[serde(default = "default_entity_limit")]
    pub satellite_limit: usize,
    /// Cap on discovered vessels, applied only without an explicit vessel
    /// filter.
    #[serde(default = "default_entity_limit")]
    pub vessel_limit: usize,
}

fn default_min_elevation() -> f64 {
    DEFAULT_MIN_ELEVATION_DEG
}

fn default_search_window_days() -> i64 {
    DEFAULT_SEARCH_WINDOW_DAYS
}

fn default_entity_limit() -> usize {
    DEFAULT_ENTITY_LIMIT
}

impl Params {
    pub fn builder() -> ParamsBuilder {
        ParamsBuilder::new()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ParamsError> {
        let params: Params = serde_yaml::from_str(yaml)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_yaml_file(path: &str) -> Result<Self, ParamsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Window covering every requested time plus the search margin.
    pub fn window(&self) -> TimeWindow {
        let margin = Duration::days(self.search_window_days);
        // times is non-empty by construction
        let min = *self.times.iter().min().unwrap();
        let max = *self.times.iter().max().unwrap();
        TimeWindow {
            start: min - margin,
            end: max + margin,
        }
    }

    fn validate(&self) -> Result<(), ParamsError> {
        if self.times.is_empty() {
            return Err(ParamsError::NoTimes);
        }
        if !self.minimum_elevation_degrees.is_finite()
            || self.minimum_elevation_degrees.abs() > 90.0
        {
            return Err(ParamsError::ElevationOutOfRange(
                self.minimum_elevation_degrees,
            ));
        }
        if self.search_window_days <= 0 {
            return Err(ParamsError::NonPositiveWindow(self.search_window_days));
        }
        if self.satellite_limit == 0 || self.vessel_limit == 0 {
            return Err(ParamsError::ZeroLimit);
        }
        Ok(())
    }
}

/// Builder applying the documented defaults.
#[derive(Debug, Default)]
pub struct ParamsBuilder {
    times: Vec<DateTime<Utc>>,
    minimum_elevation_degrees: Option<f64>,
    search_window_days: Option<i64>,
    satellite_ids: Option<Vec<u32>>,
    vessel_ids: Option<Vec<u32>>,
    satellite_limit: Option<usize>,
    vessel_limit: Option<usize>,
}

impl ParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(mut self, t: DateTime<Utc>) -> Self {
        self.times.push(t);
        self
    }

    pub fn times<I: IntoIterator<Item = DateTime<Utc>>>(mut self, times: I) -> Self {
        self.times.extend(times);
        self
    }

    pub fn minimum_elevation_degrees(mut self, degrees: f64) -> Self {
        self.minimum_elevation_degrees = Some(degrees);
        self
    }

    pub fn search_window_days(mut self, days: i64) -> Self {
        self.search_window_days = Some(days);
        self
    }

    pub fn satellite_ids(mut self, ids: Vec<u32>) -> Self {
        self.satellite_ids = Some(ids);
        self
    }

    pub fn vessel_ids(mut self, ids: Vec<u32>) -> Self {
        self.vessel_ids = Some(ids);
        self
    }

    pub fn satellite_limit(mut self, limit: usize) -> Self {
        self.satellite_limit = Some(limit);
        self
    }

    pub fn vessel_limit(mut self, limit: usize) -> Self {
        self.vessel_limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<Params, ParamsError> {
        let params = Params {
            times: self.times,
            minimum_elevation_degrees: self
                .minimum_elevation_degrees
                .unwrap_or(DEFAULT_MIN_ELEVATION_DEG),
            search_window_days: self.search_window_days.unwrap_or(DEFAULT_SEARCH_WINDOW_DAYS),
            satellite_ids: self.satellite_ids,
            vessel_ids: self.vessel_ids,
            satellite_limit: self.satellite_limit.unwrap_or(DEFAULT_ENTITY_LIMIT),
            vessel_limit: self.vessel_limit.unwrap_or(DEFAULT_ENTITY_LIMIT),
        };
        params.validate()?;
        Ok(params)
    }
}

fn deserialize_times<'de, D>(deserializer: D) -> Result<Vec<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    raw.iter()
        .map(|s| parse_time(s).map_err(serde::de::Error::custom))
        .collect()
}

/// Parse an RFC3339 timestamp, or a naive one interpreted as UTC.
fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(format!("unrecognized timestamp: {s}"))
}
