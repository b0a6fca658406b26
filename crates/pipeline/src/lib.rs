//! # Droughtrisk Pipeline
//!
//! The raster-to-prediction pipeline: band extraction, chunked model
//! evaluation, display rendering and export.
//!
//! Control flow is strictly linear. A [`Scene`](droughtrisk_core::Scene) is
//! loaded and validated by `droughtrisk-core`, band 1 is discarded and the
//! remaining bands become per-pixel feature vectors, a pre-loaded
//! [`Classifier`](droughtrisk_model::Classifier) maps every feature vector
//! to a probability, and the resulting raster is rendered and exported.
//! Large scenes are evaluated over sequential spatial windows to bound
//! memory; window boundaries never change per-pixel results.

pub mod composite;
pub mod export;
pub mod features;
pub mod predict;
pub mod stats;
pub mod window;

pub use composite::{probability_map, rgb_composite, risk_overlay};
pub use export::{write_prediction_geotiff, write_probability_csv, write_probability_csv_file};
pub use features::{window_features, WindowFeatures};
pub use predict::{predict_scene, predict_scene_with_progress, PredictParams};
pub use stats::{summarize, PredictionSummary};
pub use window::{Window, WindowIterator};
