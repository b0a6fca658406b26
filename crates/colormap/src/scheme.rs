//! Color schemes and multi-stop interpolation engine.

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Available color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Blue -> Pale Yellow -> Dark Red, the 11-stop ramp used for drought
    /// risk probability maps.
    Drought,
    /// Black -> White
    Grayscale,
    /// Blue -> White -> Red (divergent data)
    BlueWhiteRed,
}

impl ColorScheme {
    /// All available schemes, useful for UI combo boxes.
    pub const ALL: &[ColorScheme] = &[Self::Drought, Self::Grayscale, Self::BlueWhiteRed];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drought => "Drought",
            Self::Grayscale => "Grayscale",
            Self::BlueWhiteRed => "Blue-White-Red",
        }
    }

    /// Parse a scheme from its CLI name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "drought" => Some(Self::Drought),
            "grayscale" | "gray" => Some(Self::Grayscale),
            "bluewhitered" | "blue-white-red" | "bwr" => Some(Self::BlueWhiteRed),
            _ => None,
        }
    }
}

// ─── Color stop definitions ────────────────────────────────────────────

/// Drought ramp: RdYlBu reversed, low risk in blue, high risk in dark red.
const DROUGHT_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, 49, 54, 149),
    ColorStop::new(0.1, 69, 117, 180),
    ColorStop::new(0.2, 116, 173, 209),
    ColorStop::new(0.3, 171, 217, 233),
    ColorStop::new(0.4, 224, 243, 248),
    ColorStop::new(0.5, 255, 255, 191),
    ColorStop::new(0.6, 254, 224, 144),
    ColorStop::new(0.7, 253, 174, 97),
    ColorStop::new(0.8, 244, 109, 67),
    ColorStop::new(0.9, 215, 48, 39),
    ColorStop::new(1.0, 165, 0, 38),
];

const BLUE_WHITE_RED_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 33, 102, 172),
    ColorStop::new(0.25, 103, 169, 207),
    ColorStop::new(0.50, 247, 247, 247),
    ColorStop::new(0.75, 239, 138, 98),
    ColorStop::new(1.00, 178, 24, 43),
];

// ─── Interpolation engine ──────────────────────────────────────────────

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp(c1.r as f64, c2.r as f64, t).round() as u8,
        lerp(c1.g as f64, c2.g as f64, t).round() as u8,
        lerp(c1.b as f64, c2.b as f64, t).round() as u8,
    )
}

fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    if t <= 0.0 {
        return stops[0].color;
    }
    if t >= 1.0 {
        return stops[stops.len() - 1].color;
    }
    for i in 1..stops.len() {
        if t <= stops[i].t {
            let ratio = (t - stops[i - 1].t) / (stops[i].t - stops[i - 1].t);
            return lerp_color(stops[i - 1].color, stops[i].color, ratio);
        }
    }
    stops[stops.len() - 1].color
}

/// Evaluate a color scheme at normalized position `t` ∈ [0, 1].
///
/// Out-of-range positions are clamped to the endpoint colors.
pub fn evaluate(scheme: ColorScheme, t: f64) -> Rgb {
    match scheme {
        ColorScheme::Drought => multi_stop(DROUGHT_STOPS, t),
        ColorScheme::Grayscale => {
            let v = (t.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgb::new(v, v, v)
        }
        ColorScheme::BlueWhiteRed => multi_stop(BLUE_WHITE_RED_STOPS, t),
    }
}
