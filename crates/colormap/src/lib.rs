//! # Droughtrisk Colormap
//!
//! Color mapping and raster-to-RGBA rendering for probability maps.
//!
//! Provides the drought ramp used by the original study plus a couple of
//! generic schemes, and a multi-stop interpolation engine. The main entry
//! point is [`raster_to_rgba`] which converts a `Raster<T>` into an RGBA
//! pixel buffer.
//!
//! ## Usage
//!
//! ```ignore
//! use droughtrisk_colormap::{ColorScheme, ColormapParams, raster_to_rgba};
//!
//! let params = ColormapParams::new(ColorScheme::Drought);
//! let rgba = raster_to_rgba(&prediction, &params);
//! ```

mod render;
mod scheme;

pub use render::{raster_to_rgba, ColormapParams};
pub use scheme::{evaluate, ColorScheme, ColorStop, Rgb};
