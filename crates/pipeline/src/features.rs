//! Per-pixel feature extraction
//!
//! Band 1 of a Venµs scene is a calibration band with no spectral
//! information; the classifier is trained on bands 2..N in their original
//! order. Extraction is pure and deterministic.

use crate::window::Window;
use droughtrisk_core::Scene;

/// Feature vectors for one spatial window, in row-major pixel order.
#[derive(Debug, Clone)]
pub struct WindowFeatures {
    /// Flattened features, `pixel_count * feature_len` values; pixel `i`
    /// occupies `features[i * feature_len .. (i + 1) * feature_len]`.
    features: Vec<f64>,
    /// Per-pixel validity: false when any band value is no-data or
    /// non-finite.
    valid: Vec<bool>,
    feature_len: usize,
}

impl WindowFeatures {
    /// Number of pixels in the window
    pub fn pixel_count(&self) -> usize {
        self.valid.len()
    }

    /// Features per pixel (band count minus one)
    pub fn feature_len(&self) -> usize {
        self.feature_len
    }

    /// Feature vector for pixel `i` (row-major within the window), or
    /// `None` when the pixel is masked.
    pub fn pixel(&self, i: usize) -> Option<&[f64]> {
        if !self.valid[i] {
            return None;
        }
        let start = i * self.feature_len;
        Some(&self.features[start..start + self.feature_len])
    }

    /// Iterate over pixels as `Option<&[f64]>`, masked pixels yielding `None`.
    pub fn iter(&self) -> impl Iterator<Item = Option<&[f64]>> {
        (0..self.pixel_count()).map(move |i| self.pixel(i))
    }
}

/// Extract per-pixel feature vectors for one spatial window.
///
/// Drops band 1 and stacks bands 2..N per pixel. A pixel is masked when any
/// of its band values (including band 1) is the scene's no-data value or is
/// not finite.
pub fn window_features(scene: &Scene<f32>, window: &Window) -> WindowFeatures {
    let bands = scene.band_count();
    let feature_len = bands - 1;
    let pixels = window.len();

    let mut features = vec![0.0f64; pixels * feature_len];
    let mut valid = vec![true; pixels];

    let data = scene.data();
    for band in 0..bands {
        let plane = data.index_axis(ndarray::Axis(0), band);
        for local_row in 0..window.rows {
            for local_col in 0..window.cols {
                let (row, col) = window.to_source_coords(local_row, local_col);
                let value = plane[(row, col)];
                let i = local_row * window.cols + local_col;

                if !value.is_finite() || scene.is_nodata(value) {
                    valid[i] = false;
                }
                // Band 1 (index 0) only contributes to the mask
                if band > 0 {
                    features[i * feature_len + (band - 1)] = value as f64;
                }
            }
        }
    }

    WindowFeatures {
        features,
        valid,
        feature_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use droughtrisk_core::Scene;

    /// 11-band 2x2 scene; band b is filled with b * 10 except where noted.
    fn scene_with(values: impl Fn(usize, usize, usize) -> f32) -> Scene<f32> {
        let mut data = Vec::with_capacity(11 * 4);
        for band in 1..=11 {
            for row in 0..2 {
                for col in 0..2 {
                    data.push(values(band, row, col));
                }
            }
        }
        Scene::from_vec(data, 11, 2, 2).unwrap()
    }

    #[test]
    fn feature_length_is_band_count_minus_one() {
        let scene = scene_with(|band, _, _| band as f32 * 10.0);
        let window = Window::new(0, 0, 2, 2);
        let feats = window_features(&scene, &window);

        assert_eq!(feats.pixel_count(), 4);
        assert_eq!(feats.feature_len(), 10);
    }

    #[test]
    fn band_one_never_appears() {
        // Band 1 carries a sentinel value no other band uses
        let scene = scene_with(|band, _, _| if band == 1 { 777.0 } else { band as f32 });
        let feats = window_features(&scene, &Window::new(0, 0, 2, 2));

        for i in 0..feats.pixel_count() {
            let pixel = feats.pixel(i).unwrap();
            assert_eq!(pixel.len(), 10);
            assert!(pixel.iter().all(|&v| v != 777.0));
            // Bands 2..=11 in original order
            let expected: Vec<f64> = (2..=11).map(|b| b as f64).collect();
            assert_eq!(pixel, expected.as_slice());
        }
    }

    #[test]
    fn nan_in_any_band_masks_the_pixel() {
        let scene = scene_with(|band, row, col| {
            if band == 5 && row == 1 && col == 0 {
                f32::NAN
            } else {
                1.0
            }
        });
        let feats = window_features(&scene, &Window::new(0, 0, 2, 2));

        assert!(feats.pixel(0).is_some());
        assert!(feats.pixel(2).is_none()); // pixel (1,0) row-major
        assert_eq!(feats.iter().filter(|p| p.is_none()).count(), 1);
    }

    #[test]
    fn nodata_in_calibration_band_masks_the_pixel() {
        let mut scene = scene_with(|band, row, col| {
            if band == 1 && row == 0 && col == 1 {
                -9999.0
            } else {
                1.0
            }
        });
        scene.set_nodata(Some(-9999.0));
        let feats = window_features(&scene, &Window::new(0, 0, 2, 2));

        assert!(feats.pixel(1).is_none());
        assert!(feats.pixel(0).is_some());
    }

    #[test]
    fn window_offsets_select_the_right_pixels() {
        let scene = scene_with(|band, row, col| band as f32 + (row * 2 + col) as f32 * 100.0);
        let feats = window_features(&scene, &Window::new(1, 1, 1, 1));

        assert_eq!(feats.pixel_count(), 1);
        let pixel = feats.pixel(0).unwrap();
        // Pixel (1,1) has row*2+col = 3
        assert_eq!(pixel[0], 2.0 + 300.0);
        assert_eq!(pixel[9], 11.0 + 300.0);
    }
}
