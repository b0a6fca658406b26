//! # Droughtrisk Core
//!
//! Core types and I/O for the drought-risk prediction pipeline.
//!
//! This crate provides:
//! - `Scene<T>`: multi-band georeferenced raster (one satellite acquisition)
//! - `Raster<T>`: single-band raster grid (prediction output)
//! - `GeoTransform`: affine transformation for georeferencing
//! - Native GeoTIFF reading/writing via the `tiff` crate

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::Crs;
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement, Scene};

/// Minimum number of bands a Venµs scene must carry to be accepted.
///
/// Band 1 is a calibration band and is discarded before classification,
/// leaving `MIN_BAND_COUNT - 1` spectral features.
pub const MIN_BAND_COUNT: usize = 11;

/// 1-based band numbers used for the RGB display composite (red, green, blue).
pub const RGB_COMPOSITE_BANDS: [usize; 3] = [7, 4, 3];

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement, Scene};
    pub use crate::{MIN_BAND_COUNT, RGB_COMPOSITE_BANDS};
}
