mod error;
mod frames;
mod propagation;
mod select;
mod tle;
mod types;

pub use error::EphemerisError;
pub use propagation::{Ephemeris, Sgp4Ephemeris};
pub use select::nearest;
pub use tle::parse_tle_table;
pub use types::{Aer, Observer, OrbitalElementSet, Subpoint};
