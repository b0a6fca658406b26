//! Raster data structures

mod element;
mod geotransform;
mod grid;
mod scene;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics};
pub use scene::Scene;
