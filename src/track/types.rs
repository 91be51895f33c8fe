use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::bracket::Timestamped;
use crate::geo::LatLon;

/// Conversion factor from knots to km/h.
pub const KNOTS_TO_KMH: f64 = 1.852;

/// A single AIS position report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPoint {
    pub vessel_id: u32,
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Speed over ground in knots.
    pub sog_knots: f64,
    /// Course over ground in degrees from true north.
    pub cog_deg: f64,
}

impl TrackPoint {
    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude_deg, self.longitude_deg)
    }
}

impl Timestamped for TrackPoint {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// How a vessel estimate was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReconcileMethod {
    /// Both a preceding and a following report existed.
    Interpolated,
    /// Projected from a single report at its own course and speed.
    Extrapolated,
}

/// A vessel state estimate at a target time, derived from the bracketing
/// reports. Ephemeral; recomputed per (vessel, target time).
#[derive(Debug, Clone, Serialize)]
pub struct VesselEstimate {
    pub vessel_id: u32,
    pub position: LatLon,
    /// Course over ground in degrees from true north.
    pub course_deg: f64,
    /// Speed over ground in km/h.
    pub speed_kmh: f64,
    /// Signed hours between the target time and the reference report.
    pub delta_t_hours: f64,
    pub method: ReconcileMethod,
    /// Timestamps of the bracketing reports (preceding, following).
    pub bracket: (Option<DateTime<Utc>>, Option<DateTime<Utc>>),
}
