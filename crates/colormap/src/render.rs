//! Raster-to-RGBA rendering using color schemes.

use crate::scheme::{evaluate, ColorScheme, Rgb};
use droughtrisk_core::raster::{Raster, RasterElement};

/// Parameters for colormap rendering.
#[derive(Debug, Clone)]
pub struct ColormapParams {
    /// Color scheme to use.
    pub scheme: ColorScheme,
    /// Minimum value for normalization. Values below this are clamped.
    pub min: f64,
    /// Maximum value for normalization. Values above this are clamped.
    pub max: f64,
    /// Color for nodata pixels (RGBA). Default: fully transparent.
    pub nodata_color: [u8; 4],
}

impl ColormapParams {
    /// Create params over the unit interval, the natural range for
    /// probability rasters.
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            scheme,
            min: 0.0,
            max: 1.0,
            nodata_color: [0, 0, 0, 0],
        }
    }

    /// Create params with an explicit min/max range.
    pub fn with_range(scheme: ColorScheme, min: f64, max: f64) -> Self {
        Self {
            scheme,
            min,
            max,
            nodata_color: [0, 0, 0, 0],
        }
    }
}

/// Convert a raster to an RGBA pixel buffer.
///
/// Returns a `Vec<u8>` of length `rows * cols * 4` in row-major order.
/// Nodata pixels are rendered with `params.nodata_color`.
pub fn raster_to_rgba<T: RasterElement>(raster: &Raster<T>, params: &ColormapParams) -> Vec<u8> {
    let rows = raster.rows();
    let cols = raster.cols();
    let nodata = raster.nodata();
    let range = params.max - params.min;
    let inv_range = if range.abs() > f64::EPSILON {
        1.0 / range
    } else {
        1.0
    };

    let mut rgba = vec![0u8; rows * cols * 4];

    for (i, val) in raster.data().iter().enumerate() {
        let offset = i * 4;

        if val.is_nodata(nodata) {
            rgba[offset..offset + 4].copy_from_slice(&params.nodata_color);
            continue;
        }

        match val.to_f64() {
            Some(v) if v.is_finite() => {
                let t = (v - params.min) * inv_range;
                let Rgb { r, g, b } = evaluate(params.scheme, t);
                rgba[offset] = r;
                rgba[offset + 1] = g;
                rgba[offset + 2] = b;
                rgba[offset + 3] = 255;
            }
            _ => {
                rgba[offset..offset + 4].copy_from_slice(&params.nodata_color);
            }
        }
    }

    rgba
}
