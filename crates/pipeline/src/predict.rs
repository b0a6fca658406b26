//! Chunked model evaluation
//!
//! Evaluation is embarrassingly parallel across pixels but deliberately
//! runs single-threaded: windows exist only to bound memory, and the
//! window visit order has no effect on the result.

use crate::features::window_features;
use crate::window::WindowIterator;
use droughtrisk_core::{Error, Raster, Result, Scene};
use droughtrisk_model::Classifier;

/// Parameters controlling chunked evaluation
#[derive(Debug, Clone)]
pub struct PredictParams {
    /// Side length of the square spatial windows, in pixels
    pub chunk_size: usize,
}

impl Default for PredictParams {
    fn default() -> Self {
        Self { chunk_size: 256 }
    }
}

/// Apply the classifier to every pixel of a scene.
///
/// Returns a probability raster with the scene's spatial dimensions and
/// georeferencing. Masked pixels (no-data or non-finite in any band)
/// become NaN.
pub fn predict_scene<C: Classifier>(
    scene: &Scene<f32>,
    model: &C,
    params: &PredictParams,
) -> Result<Raster<f32>> {
    predict_scene_with_progress(scene, model, params, |_, _| {})
}

/// Same as [`predict_scene`], invoking `progress(done, total)` after each
/// completed window.
pub fn predict_scene_with_progress<C, F>(
    scene: &Scene<f32>,
    model: &C,
    params: &PredictParams,
    mut progress: F,
) -> Result<Raster<f32>>
where
    C: Classifier,
    F: FnMut(usize, usize),
{
    if params.chunk_size == 0 {
        return Err(Error::InvalidParameter {
            name: "chunk_size",
            value: "0".into(),
            reason: "must be at least 1".into(),
        });
    }

    let expected = scene.band_count() - 1;
    if model.feature_len() != expected {
        return Err(Error::FeatureLength {
            expected: model.feature_len(),
            found: expected,
        });
    }

    let (rows, cols) = scene.shape();
    let mut prediction = scene.raster_like::<f32>(f32::NAN);
    prediction.set_nodata(Some(f32::NAN));

    let windows = WindowIterator::new(rows, cols, params.chunk_size);
    let total = windows.count_windows();
    let mut done = 0;

    for window in WindowIterator::new(rows, cols, params.chunk_size) {
        let feats = window_features(scene, &window);

        for local_row in 0..window.rows {
            for local_col in 0..window.cols {
                let i = local_row * window.cols + local_col;
                if let Some(pixel) = feats.pixel(i) {
                    let p = model.predict_proba(pixel) as f32;
                    let (row, col) = window.to_source_coords(local_row, local_col);
                    prediction.set(row, col, p)?;
                }
            }
        }

        done += 1;
        progress(done, total);
    }

    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use droughtrisk_core::Scene;
    use droughtrisk_model::Classifier;

    /// Stub classifier: mean of the features.
    struct MeanClassifier {
        features: usize,
    }

    impl Classifier for MeanClassifier {
        fn feature_len(&self) -> usize {
            self.features
        }

        fn predict_proba(&self, features: &[f64]) -> f64 {
            features.iter().sum::<f64>() / features.len() as f64
        }
    }

    fn constant_scene(bands: usize, rows: usize, cols: usize, value: f32) -> Scene<f32> {
        Scene::from_vec(vec![value; bands * rows * cols], bands, rows, cols).unwrap()
    }

    #[test]
    fn prediction_has_scene_dimensions() {
        let scene = constant_scene(11, 5, 7, 0.5);
        let model = MeanClassifier { features: 10 };
        let out = predict_scene(&scene, &model, &PredictParams::default()).unwrap();
        assert_eq!(out.shape(), (5, 7));
    }

    #[test]
    fn feature_length_mismatch_is_rejected() {
        let scene = constant_scene(11, 2, 2, 0.5);
        let model = MeanClassifier { features: 4 };
        let err = predict_scene(&scene, &model, &PredictParams::default()).unwrap_err();
        assert!(matches!(err, Error::FeatureLength { .. }));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let scene = constant_scene(11, 2, 2, 0.5);
        let model = MeanClassifier { features: 10 };
        let err = predict_scene(&scene, &model, &PredictParams { chunk_size: 0 }).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn masked_pixels_become_nan() {
        let mut data = vec![0.5f32; 11 * 2 * 2];
        data[3] = f32::NAN; // band 1, pixel (1,1)
        let scene = Scene::from_vec(data, 11, 2, 2).unwrap();
        let model = MeanClassifier { features: 10 };

        let out = predict_scene(&scene, &model, &PredictParams::default()).unwrap();
        assert!(out.get(1, 1).unwrap().is_nan());
        assert_eq!(out.get(0, 0).unwrap(), 0.5);
        assert_eq!(out.statistics().valid_count, 3);
    }

    #[test]
    fn progress_reports_every_window() {
        let scene = constant_scene(11, 4, 4, 0.5);
        let model = MeanClassifier { features: 10 };
        let mut calls = Vec::new();
        predict_scene_with_progress(&scene, &model, &PredictParams { chunk_size: 2 }, |d, t| {
            calls.push((d, t))
        })
        .unwrap();
        assert_eq!(calls, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }
}
