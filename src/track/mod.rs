mod bracket;
mod error;
mod reconcile;
mod types;

pub use bracket::{bracket, Timestamped};
pub use error::ReconcileError;
pub use reconcile::reconcile;
pub use types::{ReconcileMethod, TrackPoint, VesselEstimate, KNOTS_TO_KMH};
