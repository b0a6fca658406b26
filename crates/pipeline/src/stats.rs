//! Summary statistics over a prediction raster

use droughtrisk_core::Raster;

/// Number of histogram bins over [0, 1]
pub const HISTOGRAM_BINS: usize = 10;

/// Summary of a prediction raster at a given risk threshold.
#[derive(Debug, Clone)]
pub struct PredictionSummary {
    /// Pixels with a probability value
    pub valid_count: usize,
    /// Masked (no-data) pixels
    pub masked_count: usize,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub mean: Option<f64>,
    /// Threshold the high/low split was computed at
    pub threshold: f32,
    /// Valid pixels with probability >= threshold
    pub high_risk_count: usize,
    /// Histogram of valid probabilities over [0, 1]
    pub histogram: [usize; HISTOGRAM_BINS],
}

impl PredictionSummary {
    /// Fraction of valid pixels at or above the threshold, in [0, 1].
    pub fn high_risk_fraction(&self) -> f64 {
        if self.valid_count == 0 {
            return 0.0;
        }
        self.high_risk_count as f64 / self.valid_count as f64
    }
}

/// Summarize a prediction raster at a risk threshold.
pub fn summarize(prediction: &Raster<f32>, threshold: f32) -> PredictionSummary {
    let stats = prediction.statistics();

    let mut high_risk_count = 0;
    let mut histogram = [0usize; HISTOGRAM_BINS];

    for &p in prediction.data().iter() {
        if prediction.is_nodata(p) {
            continue;
        }
        if p >= threshold {
            high_risk_count += 1;
        }
        let bin = ((p as f64 * HISTOGRAM_BINS as f64) as usize).min(HISTOGRAM_BINS - 1);
        histogram[bin] += 1;
    }

    PredictionSummary {
        valid_count: stats.valid_count,
        masked_count: stats.nodata_count,
        min: stats.min,
        max: stats.max,
        mean: stats.mean,
        threshold,
        high_risk_count,
        histogram,
    }
}
