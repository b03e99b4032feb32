//! FILENAME: core/pivot-engine/src/heatmap.rs
//! Heatmap Mapper - display values to gradient colors, plus text contrast.
//!
//! Each scheme is a 3-stop gradient (low, mid, high). A value is normalized
//! into [0, 1] against the observed range and interpolated piecewise: the
//! lower half between low and mid, the upper half between mid and high.

use serde::{Deserialize, Serialize};
use model::Color;

use crate::definition::ShowValuesAs;

// ============================================================================
// SCHEMES
// ============================================================================

/// Named 3-stop gradients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorScheme {
    Blue,
    Green,
    Red,
    Purple,
}

/// The low, mid and high stops of a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientStops {
    pub low: Color,
    pub mid: Color,
    pub high: Color,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 4] = [
        ColorScheme::Blue,
        ColorScheme::Green,
        ColorScheme::Red,
        ColorScheme::Purple,
    ];

    pub const fn stops(self) -> GradientStops {
        match self {
            ColorScheme::Blue => GradientStops {
                low: Color::new(247, 251, 255),
                mid: Color::new(107, 174, 214),
                high: Color::new(8, 48, 107),
            },
            ColorScheme::Green => GradientStops {
                low: Color::new(247, 252, 245),
                mid: Color::new(116, 196, 118),
                high: Color::new(0, 68, 27),
            },
            ColorScheme::Red => GradientStops {
                low: Color::new(255, 245, 240),
                mid: Color::new(251, 106, 74),
                high: Color::new(103, 0, 13),
            },
            ColorScheme::Purple => GradientStops {
                low: Color::new(252, 251, 253),
                mid: Color::new(158, 154, 200),
                high: Color::new(63, 0, 125),
            },
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Blue
    }
}

// ============================================================================
// RANGE
// ============================================================================

/// The value range a heatmap normalizes against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapRange {
    pub min: f64,
    pub max: f64,
}

impl HeatmapRange {
    /// Fixed range used for every percentage display.
    pub const PERCENT: HeatmapRange = HeatmapRange { min: 0.0, max: 100.0 };

    /// Observed extremes of the finite values; None when there are none.
    pub fn observe<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some(HeatmapRange { min: v, max: v }),
                Some(r) => Some(HeatmapRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }

    /// Range for the values currently shown under `mode`.
    /// Percent modes always use [0, 100] instead of the observed extremes.
    pub fn for_display<I>(values: I, mode: ShowValuesAs) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if mode.is_percentage() {
            Some(HeatmapRange::PERCENT)
        } else {
            HeatmapRange::observe(values)
        }
    }
}

// ============================================================================
// COLOR MAPPING
// ============================================================================

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    let v = a as f64 + (b as f64 - a as f64) * t;
    v.round().clamp(0.0, 255.0) as u8
}

fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    Color::new(
        lerp_channel(a.r, b.r, t),
        lerp_channel(a.g, b.g, t),
        lerp_channel(a.b, b.b, t),
    )
}

/// Gradient color for `value` within [min, max].
/// Returns `Color::transparent()` ("no color") when the range is degenerate
/// or any input is not finite.
pub fn color_for(value: f64, min: f64, max: f64, scheme: ColorScheme) -> Color {
    if !(value.is_finite() && min.is_finite() && max.is_finite()) || min == max {
        return Color::transparent();
    }

    let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
    let stops = scheme.stops();
    if t < 0.5 {
        lerp_color(stops.low, stops.mid, t * 2.0)
    } else {
        lerp_color(stops.mid, stops.high, (t - 0.5) * 2.0)
    }
}

// ============================================================================
// TEXT CONTRAST
// ============================================================================

/// Brightness thresholds above which text switches to the dark color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContrastPreset {
    /// Threshold 150, used against gradient cell backgrounds.
    Standard,
    /// Threshold 128, used against hex backgrounds.
    Hex,
}

impl ContrastPreset {
    pub fn threshold(self) -> f64 {
        match self {
            ContrastPreset::Standard => 150.0,
            ContrastPreset::Hex => 128.0,
        }
    }
}

impl Default for ContrastPreset {
    fn default() -> Self {
        ContrastPreset::Standard
    }
}

pub const DARK_TEXT: Color = Color::black();
pub const LIGHT_TEXT: Color = Color::white();

/// Readable text color on `background`.
pub fn contrast_text_color(background: Color, preset: ContrastPreset) -> Color {
    if background.brightness() > preset.threshold() {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

/// Hex background variant; None when `hex` does not parse.
pub fn contrast_text_color_hex(hex: &str) -> Option<Color> {
    Color::from_hex(hex).map(|bg| contrast_text_color(bg, ContrastPreset::Hex))
}

// ============================================================================
// CELL PAINT
// ============================================================================

/// Presentation settings passed explicitly to the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeatmapOptions {
    #[serde(default)]
    pub scheme: ColorScheme,
    #[serde(default)]
    pub contrast: ContrastPreset,
}

/// Background and text color of one heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPaint {
    pub background: Color,
    pub text: Color,
}

impl HeatmapOptions {
    /// Colors for one display value; None for null values, a missing range,
    /// or the "no color" sentinel.
    pub fn paint(&self, value: Option<f64>, range: Option<HeatmapRange>) -> Option<CellPaint> {
        let value = value?;
        let range = range?;
        let background = color_for(value, range.min, range.max, self.scheme);
        if background.is_transparent() {
            return None;
        }
        Some(CellPaint {
            background,
            text: contrast_text_color(background, self.contrast),
        })
    }
}
