//! Image decoding and the fixed-resolution luminance grid that drives
//! displacement and shading lookups.

mod error;
mod grid;
mod raster;

pub use error::RasterError;
pub use grid::{LuminanceGrid, WORKING_EDGE};
pub use raster::{MAX_UPLOAD_BYTES, RasterImage};
