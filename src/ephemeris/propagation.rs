use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use super::error::EphemerisError;
use super::frames::{ecef_to_enu, ecef_to_geodetic, geodetic_to_ecef, teme_to_ecef};
use super::types::{Aer, Observer, OrbitalElementSet, Subpoint};

/// The propagation capability the visibility engine consumes.
///
/// Implementations must derive the sub-point and the topocentric look
/// angles from the same propagation model and time conversion.
pub trait Ephemeris {
    /// Geodetic point beneath the satellite, and its altitude, at `t`.
    fn subpoint(
        &self,
        elements: &OrbitalElementSet,
        t: DateTime<Utc>,
    ) -> Result<Subpoint, EphemerisError>;

    /// Azimuth, elevation, and slant range of the satellite as seen from
    /// `observer` at `t`.
    fn observe(
        &self,
        elements: &OrbitalElementSet,
        t: DateTime<Utc>,
        observer: &Observer,
    ) -> Result<Aer, EphemerisError>;
}

struct Propagator {
    elements: Elements,
    constants: Constants,
}

type CacheKey = (u32, DateTime<Utc>);

/// SGP4-backed ephemeris.
///
/// Parsed element sets are cached per (satellite, epoch) so repeated
/// report generation over a list of target times amortizes TLE parsing.
#[derive(Default)]
pub struct Sgp4Ephemeris {
    cache: RwLock<HashMap<CacheKey, Arc<Propagator>>>,
}

impl Sgp4Ephemeris {
    pub fn new() -> Self {
        Self::default()
    }

    fn propagator(&self, set: &OrbitalElementSet) -> Result<Arc<Propagator>, EphemerisError> {
        let key = (set.satellite_id, set.epoch);
        if let Some(cached) = self.cache.read().unwrap().get(&key) {
            return Ok(cached.clone());
        }

        let elements = Elements::from_tle(None, set.line1.as_bytes(), set.line2.as_bytes())
            .map_err(|e| EphemerisError::InvalidElements(e.to_string()))?;
        let constants = Constants::from_elements(&elements)
            .map_err(|e| EphemerisError::InvalidElements(e.to_string()))?;
        let propagator = Arc::new(Propagator {
            elements,
            constants,
        });
        self.cache
            .write()
            .unwrap()
            .insert(key, propagator.clone());
        Ok(propagator)
    }

    fn position_ecef(
        &self,
        set: &OrbitalElementSet,
        t: DateTime<Utc>,
    ) -> Result<[f64; 3], EphemerisError> {
        let propagator = self.propagator(set)?;
        let minutes = propagator
            .elements
            .datetime_to_minutes_since_epoch(&t.naive_utc())
            .map_err(|e| EphemerisError::Propagation(e.to_string()))?;
        let prediction = propagator
            .constants
            .propagate(minutes)
            .map_err(|e| EphemerisError::Propagation(e.to_string()))?;

        let gmst =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&t.naive_utc()));
        Ok(teme_to_ecef(prediction.position, gmst))
    }
}

impl Ephemeris for Sgp4Ephemeris {
    fn subpoint(
        &self,
        elements: &OrbitalElementSet,
        t: DateTime<Utc>,
    ) -> Result<Subpoint, EphemerisError> {
        let ecef = self.position_ecef(elements, t)?;
        let (lat_rad, lon_rad, altitude_km) = ecef_to_geodetic(ecef);
        Ok(Subpoint {
            latitude_deg: lat_rad.to_degrees(),
            longitude_deg: lon_rad.to_degrees(),
            altitude_km,
        })
    }

    fn observe(
        &self,
        elements: &OrbitalElementSet,
        t: DateTime<Utc>,
        observer: &Observer,
    ) -> Result<Aer, EphemerisError> {
        let sat = self.position_ecef(elements, t)?;
        let obs = geodetic_to_ecef(
            observer.lat_rad(),
            observer.lon_rad(),
            observer.altitude_m / 1000.0,
        );

        let dr = [sat[0] - obs[0], sat[1] - obs[1], sat[2] - obs[2]];
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

        let (east, north, up) = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
        let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
        let elevation_deg = if range_km > 0.0 {
            (up / range_km).asin().to_degrees()
        } else {
            0.0
        };

        Ok(Aer {
            azimuth_deg,
            elevation_deg,
            range_km,
        })
    }
}
