use chrono::{DateTime, Utc};
use rayon::prelude::*;

use super::params::Params;
use super::source::{ElementSource, SourceError, TrackSource};
use crate::ephemeris::{OrbitalElementSet, Sgp4Ephemeris};
use crate::track::TrackPoint;
use crate::visibility::{find_hits, HitOptions, VisibilityError, VisibilityReport};

/// A visibility session: resolved parameters plus cached input tables.
///
/// Tables are loaded once and shared read-only by every report the
/// session produces; reloading replaces a table wholesale. The SGP4
/// context is cached alongside, so evaluating a list of times amortizes
/// both table loading and TLE parsing. Loading requires `&mut self` while
/// report generation takes `&self`, so a reload cannot race an in-flight
/// report.
pub struct Session {
    params: Params,
    ephemeris: Sgp4Ephemeris,
    tracks: Vec<TrackPoint>,
    elements: Vec<OrbitalElementSet>,
}

impl Session {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ephemeris: Sgp4Ephemeris::new(),
            tracks: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Load (or replace) the cached track table from `source`. Returns
    /// the number of records loaded.
    pub fn load_tracks(&mut self, source: &dyn TrackSource) -> Result<usize, SourceError> {
        let window = self.params.window();
        let ids = match &self.params.vessel_ids {
            Some(ids) => ids.clone(),
            None => source.vessel_ids(&window, self.params.vessel_limit)?,
        };
        log::debug!("fetching track data for {} vessels", ids.len());
        let points = source.fetch(&ids, &window)?;
        if points.is_empty() {
            return Err(SourceError::NoData);
        }
        let count = points.len();
        self.tracks = points;
        Ok(count)
    }

    /// Load (or replace) the cached element table from `source`. Returns
    /// the number of records loaded.
    pub fn load_elements(&mut self, source: &dyn ElementSource) -> Result<usize, SourceError> {
        let window = self.params.window();
        let ids = match &self.params.satellite_ids {
            Some(ids) => ids.clone(),
            None => source.satellite_ids(&window, self.params.satellite_limit)?,
        };
        log::debug!("fetching element sets for {} satellites", ids.len());
        let sets = source.fetch(&ids, &window)?;
        if sets.is_empty() {
            return Err(SourceError::NoData);
        }
        let count = sets.len();
        self.elements = sets;
        Ok(count)
    }

    /// One report at `target` from the cached tables.
    pub fn report_at(&self, target: DateTime<Utc>) -> Result<VisibilityReport, VisibilityError> {
        find_hits(
            target,
            &self.elements,
            &self.tracks,
            &self.ephemeris,
            &self.options(),
        )
    }

    /// Reports for every time in the session parameters, in request
    /// order. Target times are independent and evaluated in parallel.
    pub fn reports(&self) -> Result<Vec<VisibilityReport>, VisibilityError> {
        self.params
            .times
            .par_iter()
            .map(|&t| self.report_at(t))
            .collect()
    }

    fn options(&self) -> HitOptions {
        HitOptions {
            min_elevation_deg: self.params.minimum_elevation_degrees,
            satellite_ids: self.params.satellite_ids.clone(),
            vessel_ids: self.params.vessel_ids.clone(),
        }
    }
}
