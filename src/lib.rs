#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate lazy_static;

pub mod error;
pub mod estimator;
pub mod export_format;
pub mod geo;
pub mod geometry;
pub mod import_data;
pub mod logs;
pub mod segment;
pub mod segment_index;
pub mod settings;
pub mod timeline;
pub mod timestamps;

pub use error::{Error, ParseError, Result};
pub use estimator::{EstimateSource, LocationEstimate, LocationEstimator, SegmentMatch};
pub use geo::{LatLng, LocationPoint};
pub use timeline::{Timeline, TimelineStore};
