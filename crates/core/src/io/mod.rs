//! I/O operations for reading and writing geospatial data
//!
//! Native GeoTIFF support via the `tiff` crate; no GDAL dependency.

mod native;

pub use native::{
    read_raster, read_raster_from_buffer, read_scene, read_scene_from_buffer, write_geotiff,
    write_geotiff_to_buffer, GeoTiffOptions,
};
