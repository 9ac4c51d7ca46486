//! Text measurement for tick labels.

use crate::error::{AxisError, Result};
use regex::Regex;
use std::sync::LazyLock;

static FONT_PX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)px").expect("static font-size pattern")
});

/// Parsed subset of a CSS font shorthand such as `"normal 16px sans-serif"`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub size_px: f64,
    pub family: String,
}

impl FontSpec {
    /// Returns `None` when no pixel size is present.
    pub fn parse(font: &str) -> Option<Self> {
        let caps = FONT_PX.captures(font)?;
        let m = caps.get(1)?;
        let size_px = m.as_str().parse::<f64>().ok()?;
        let family = font[caps.get(0)?.end()..].trim().to_string();
        Some(Self { size_px, family })
    }

    pub fn css(&self) -> String {
        format!("normal {}px {}", self.size_px, self.family)
    }
}

/// Measures the rendered width of a label in pixels.
///
/// Implementations must be deterministic for a given `(text, font)` pair.
pub trait TextMeasure {
    fn measure_text_width(&self, text: &str, font: &str) -> Result<f64>;
}

/// Heuristic: average glyph advance of 0.6 em. Good enough when no real font
/// backend is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasure;

impl TextMeasure for HeuristicMeasure {
    fn measure_text_width(&self, text: &str, font: &str) -> Result<f64> {
        let spec = FontSpec::parse(font).ok_or_else(|| AxisError::Measurement {
            text: text.to_string(),
            font: font.to_string(),
        })?;
        Ok(estimate_text_width_px(text, spec.size_px))
    }
}

impl<F> TextMeasure for F
where
    F: Fn(&str, &str) -> Option<f64>,
{
    fn measure_text_width(&self, text: &str, font: &str) -> Result<f64> {
        self(text, font).ok_or_else(|| AxisError::Measurement {
            text: text.to_string(),
            font: font.to_string(),
        })
    }
}

pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    ((text.chars().count() as f64) * font_px * 0.60).ceil()
}

/// Width of `text`, or zero when the backend cannot measure it.
pub fn width_or_zero(measure: &dyn TextMeasure, text: &str, font: &str) -> f64 {
    match measure.measure_text_width(text, font) {
        Ok(w) if w.is_finite() && w >= 0.0 => w,
        Ok(w) => {
            log::warn!("ignoring unusable width {w} for label {text:?}");
            0.0
        }
        Err(e) => {
            log::warn!("{e}; assuming zero width");
            0.0
        }
    }
}
