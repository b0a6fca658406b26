//! Display rendering: RGB composite, probability map, risk overlay

use droughtrisk_colormap::{raster_to_rgba, ColorScheme, ColormapParams};
use droughtrisk_core::{Raster, Result, Scene, RGB_COMPOSITE_BANDS};
use image::{Rgb, RgbImage, RgbaImage};

/// Build the natural-color display composite from bands 7-4-3.
///
/// The three bands are normalized jointly to [0, 1] by min-max over all
/// finite values; a scene with no variation renders black. Non-finite
/// values render black as well.
pub fn rgb_composite(scene: &Scene<f32>) -> Result<RgbImage> {
    let [red_band, green_band, blue_band] = RGB_COMPOSITE_BANDS;
    let red = scene.band(red_band)?;
    let green = scene.band(green_band)?;
    let blue = scene.band(blue_band)?;

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for plane in [&red, &green, &blue] {
        for &v in plane.iter() {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
    }

    let (rows, cols) = scene.shape();
    let mut image = RgbImage::new(cols as u32, rows as u32);

    // Fallback if no variation in pixel values
    let scale = if max > min { 1.0 / (max - min) } else { 0.0 };

    for row in 0..rows {
        for col in 0..cols {
            let channel = |v: f32| -> u8 {
                if !v.is_finite() {
                    return 0;
                }
                (((v - min) * scale).clamp(0.0, 1.0) * 255.0).round() as u8
            };
            let pixel = Rgb([
                channel(red[(row, col)]),
                channel(green[(row, col)]),
                channel(blue[(row, col)]),
            ]);
            image.put_pixel(col as u32, row as u32, pixel);
        }
    }

    Ok(image)
}

/// Render a probability raster through a color scheme over the fixed
/// [0, 1] range. Masked pixels come out fully transparent.
pub fn probability_map(prediction: &Raster<f32>, scheme: ColorScheme) -> RgbaImage {
    let rgba = raster_to_rgba(prediction, &ColormapParams::new(scheme));
    // Buffer length is rows * cols * 4 by construction
    RgbaImage::from_raw(prediction.cols() as u32, prediction.rows() as u32, rgba)
        .unwrap_or_else(|| RgbaImage::new(0, 0))
}

/// Overlay high-risk areas on the RGB composite.
///
/// Pixels with probability >= `threshold` are blended with pure red at the
/// given `alpha` in [0, 1].
pub fn risk_overlay(
    scene: &Scene<f32>,
    prediction: &Raster<f32>,
    threshold: f32,
    alpha: f32,
) -> Result<RgbImage> {
    let mut image = rgb_composite(scene)?;
    let alpha = alpha.clamp(0.0, 1.0);

    for ((row, col), &p) in prediction.data().indexed_iter() {
        if prediction.is_nodata(p) || p < threshold {
            continue;
        }
        let pixel = image.get_pixel_mut(col as u32, row as u32);
        let blend = |c: u8, target: f32| -> u8 {
            ((1.0 - alpha) * c as f32 + alpha * target).round() as u8
        };
        *pixel = Rgb([blend(pixel[0], 255.0), blend(pixel[1], 0.0), blend(pixel[2], 0.0)]);
    }

    Ok(image)
}
