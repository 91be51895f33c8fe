use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::LatLon;
use crate::track::Timestamped;

/// One two-line element set for a satellite at a specific epoch. The
/// element lines are opaque to the engine; only the ephemeris capability
/// interprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitalElementSet {
    pub satellite_id: u32,
    pub epoch: DateTime<Utc>,
    pub line1: String,
    pub line2: String,
}

impl Timestamped for OrbitalElementSet {
    fn timestamp(&self) -> DateTime<Utc> {
        self.epoch
    }
}

/// Geodetic point directly beneath a satellite, plus its altitude.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Subpoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Topocentric look angles and slant range from an observer to a
/// satellite.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Aer {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
}

/// A ground-level observer position.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Observer {
    pub fn at_sea_level(position: LatLon) -> Self {
        Self {
            latitude_deg: position.latitude_deg,
            longitude_deg: position.longitude_deg,
            altitude_m: 0.0,
        }
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}
