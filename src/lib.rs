//! Satellite-to-vessel visibility computation.
//!
//! Reconstructs vessel positions from sparse AIS reports at arbitrary
//! target times, selects nearest-epoch orbital element sets, and computes
//! azimuth/elevation/range with hit classification for every
//! satellite-vessel pair. Table loading and report delivery belong to
//! external collaborators; this crate owns the geometry and the
//! per-instant report.

pub mod ephemeris;
pub mod geo;
pub mod session;
pub mod track;
pub mod visibility;

pub use ephemeris::{Ephemeris, OrbitalElementSet, Sgp4Ephemeris};
pub use session::{Params, ParamsBuilder, Session};
pub use track::TrackPoint;
pub use visibility::{find_hits, HitOptions, VisibilityReport};
