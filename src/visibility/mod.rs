mod engine;
mod error;
mod types;

pub use engine::{find_hits, HitOptions, DEFAULT_MIN_ELEVATION_DEG};
pub use error::VisibilityError;
pub use types::{PairKey, SatelliteEntry, VesselEntry, VisibilityPair, VisibilityReport};
