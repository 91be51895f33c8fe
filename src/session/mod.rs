mod params;
mod session;
mod source;

pub use params::{Params, ParamsBuilder, ParamsError, TimeWindow};
pub use session::Session;
pub use source::{ElementSource, SourceError, TrackSource};
