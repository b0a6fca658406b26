//! Error types for the drought-risk pipeline

use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input raster: {0}")]
    InputFormat(String),

    #[error("Image has {found} bands, but at least {required} are required")]
    BandCount { found: usize, required: usize },

    #[error("Failed to load classifier artifact: {0}")]
    ModelLoad(String),

    #[error("Classifier expects {expected} features, got {found}")]
    FeatureLength { expected: usize, found: usize },

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Invalid raster dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Band {band} out of range (scene has {bands} bands)")]
    BandOutOfRange { band: usize, bands: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
