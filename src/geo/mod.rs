mod crs;
mod error;
mod polygon;
mod primatives;

pub use crs::Crs;
pub use error::ProjectionError;
pub use polygon::Polygon;
pub use primatives::{Interval, Region};
