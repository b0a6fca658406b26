//! Multi-band scene type

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use ndarray::{Array3, ArrayView2};

/// A georeferenced multi-band raster, one satellite acquisition.
///
/// Data is indexed by (band, row, col). Bands are numbered from 1 in the
/// public accessors, matching the satellite product convention used
/// throughout the pipeline (band 1 is the calibration band that the
/// classifier never sees).
#[derive(Debug, Clone)]
pub struct Scene<T: RasterElement> {
    /// Band-sequential data, shape (bands, rows, cols)
    data: Array3<T>,
    /// Affine transformation
    transform: GeoTransform,
    /// Coordinate reference system
    crs: Option<Crs>,
    /// No-data value shared by all bands
    nodata: Option<T>,
}

impl<T: RasterElement> Scene<T> {
    /// Create a scene from band-sequential data
    pub fn from_array(data: Array3<T>) -> Self {
        Self {
            data,
            transform: GeoTransform::default(),
            crs: None,
            nodata: None,
        }
    }

    /// Create a scene from a flat band-sequential vector
    pub fn from_vec(data: Vec<T>, bands: usize, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != bands * rows * cols {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        let array = Array3::from_shape_vec((bands, rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self::from_array(array))
    }

    // Dimensions

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.data.dim().0
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.dim().1
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.dim().2
    }

    /// Spatial dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Number of pixels per band
    pub fn pixel_count(&self) -> usize {
        self.rows() * self.cols()
    }

    // Data access

    /// View of one band by 1-based band number
    pub fn band(&self, number: usize) -> Result<ArrayView2<'_, T>> {
        if number == 0 || number > self.band_count() {
            return Err(Error::BandOutOfRange {
                band: number,
                bands: self.band_count(),
            });
        }
        Ok(self.data.index_axis(ndarray::Axis(0), number - 1))
    }

    /// Value of one pixel in one band (1-based band number)
    pub fn get(&self, band: usize, row: usize, col: usize) -> Result<T> {
        if band == 0 || band > self.band_count() {
            return Err(Error::BandOutOfRange {
                band,
                bands: self.band_count(),
            });
        }
        self.data
            .get((band - 1, row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Reference to the underlying band-sequential array
    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    // Metadata

    /// Get the geotransform
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Set the geotransform
    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    /// Get the CRS
    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Set the CRS
    pub fn set_crs(&mut self, crs: Option<Crs>) {
        self.crs = crs;
    }

    /// Get the no-data value
    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// Set the no-data value
    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Check if a value is no-data
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    /// Create an empty single-band raster with this scene's spatial extent
    /// and georeferencing, filled with `fill`.
    pub fn raster_like<U: RasterElement>(&self, fill: U) -> Raster<U> {
        let mut out = Raster::filled(self.rows(), self.cols(), fill);
        out.set_transform(self.transform);
        out.set_crs(self.crs.clone());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_scene() -> Scene<f32> {
        // 3 bands, 2x2, band b filled with b as f32
        let data: Vec<f32> = (1..=3)
            .flat_map(|b| std::iter::repeat(b as f32).take(4))
            .collect();
        Scene::from_vec(data, 3, 2, 2).unwrap()
    }

    #[test]
    fn band_numbering_is_one_based() {
        let scene = test_scene();
        assert_eq!(scene.get(1, 0, 0).unwrap(), 1.0);
        assert_eq!(scene.get(3, 1, 1).unwrap(), 3.0);
        assert!(scene.get(0, 0, 0).is_err());
        assert!(scene.get(4, 0, 0).is_err());
    }

    #[test]
    fn band_view_shape() {
        let scene = test_scene();
        let band = scene.band(2).unwrap();
        assert_eq!(band.dim(), (2, 2));
        assert_eq!(band[(0, 0)], 2.0);
    }

    #[test]
    fn raster_like_inherits_georeferencing() {
        let mut scene = test_scene();
        scene.set_transform(GeoTransform::new(500.0, 3000.0, 5.0, -5.0));
        scene.set_crs(Some(Crs::from_epsg(32636)));

        let out = scene.raster_like::<f32>(0.0);
        assert_eq!(out.shape(), scene.shape());
        assert_eq!(out.transform(), scene.transform());
        assert_eq!(out.crs().unwrap().epsg(), Some(32636));
    }

    #[test]
    fn from_vec_rejects_bad_length() {
        assert!(Scene::<f32>::from_vec(vec![0.0; 5], 3, 2, 2).is_err());
    }
}
