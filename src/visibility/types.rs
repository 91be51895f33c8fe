use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::track::ReconcileMethod;

/// Identifies one satellite-vessel pair within a report. Serializes to the
/// wire form `"<satellite_id>,<vessel_id>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PairKey {
    pub satellite_id: u32,
    pub vessel_id: u32,
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.satellite_id, self.vessel_id)
    }
}

impl Serialize for PairKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-satellite row of a report.
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteEntry {
    pub id: u32,
    pub lat: f64,
    pub lon: f64,
    /// Altitude above the sub-point in km.
    pub alt: f64,
    /// Ground angle to the visible horizon in degrees.
    pub horizon: f64,
}

/// Per-vessel row of a report.
#[derive(Debug, Clone, Serialize)]
pub struct VesselEntry {
    pub id: u32,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub method: ReconcileMethod,
    /// Timestamps of the bracketing reports (preceding, following).
    pub nearest_ais: (Option<DateTime<Utc>>, Option<DateTime<Utc>>),
    /// Signed hours between the target time and the reference report.
    pub delta_t: f64,
    /// Speed over ground in km/h.
    pub sog: f64,
    /// Course over ground in degrees from true north.
    pub cog: f64,
}

/// Azimuth, elevation, and range of one satellite-vessel pair.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityPair {
    pub sat_id: u32,
    pub ves_id: u32,
    pub azimuth: f64,
    pub elevation: f64,
    pub range: f64,
    pub hit: bool,
}

/// One visibility evaluation at a single instant. Reports for different
/// instants are independent of each other.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityReport {
    pub utc: DateTime<Utc>,
    pub satellites: Vec<SatelliteEntry>,
    pub vessels: Vec<VesselEntry>,
    pub pairs: BTreeMap<PairKey, VisibilityPair>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved_satellites: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved_vessels: Vec<u32>,
}
