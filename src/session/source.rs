use thiserror::Error;

use super::params::TimeWindow;
use crate::ephemeris::OrbitalElementSet;
use crate::track::TrackPoint;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The provider holds nothing at all for the requested scope.
    #[error("no data in the requested window")]
    NoData,
    #[error("provider error: {0}")]
    Backend(String),
}

/// Supplies AIS track records.
///
/// `fetch` returns only records overlapping `window`; deduplication is not
/// guaranteed. A provider with nothing at all for the scope returns
/// [`SourceError::NoData`]; a successful fetch that merely filters to
/// empty returns an empty vector.
pub trait TrackSource {
    /// Distinct vessel ids with records in `window`, at most `limit`.
    fn vessel_ids(&self, window: &TimeWindow, limit: usize) -> Result<Vec<u32>, SourceError>;

    fn fetch(&self, ids: &[u32], window: &TimeWindow) -> Result<Vec<TrackPoint>, SourceError>;
}

/// Supplies orbital element set records, under the same contract as
/// [`TrackSource`].
pub trait ElementSource {
    /// Distinct satellite ids with element sets in `window`, at most
    /// `limit`.
    fn satellite_ids(&self, window: &TimeWindow, limit: usize) -> Result<Vec<u32>, SourceError>;

    fn fetch(&self, ids: &[u32], window: &TimeWindow)
        -> Result<Vec<OrbitalElementSet>, SourceError>;
}
