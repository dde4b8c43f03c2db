use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{ScreenPoint, ScreenRect, Size};
use crate::error::{PlotError, PlotResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    /// Fully transparent (or invalid) colors draw nothing.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.alpha.is_finite() && self.alpha > 0.0
    }

    pub fn validate(self) -> PlotResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PlotError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlignment {
    /// `-1` for left, `0` for center, `1` for right.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Left => -1,
            Self::Center => 0,
            Self::Right => 1,
        }
    }

    #[must_use]
    pub const fn from_sign(sign: i8) -> Self {
        match sign {
            i8::MIN..=-1 => Self::Left,
            0 => Self::Center,
            _ => Self::Right,
        }
    }

    /// Offset of the box's left edge from the anchor, for a box `width` wide.
    #[must_use]
    pub fn offset(self, width: f64) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => -width / 2.0,
            Self::Right => -width,
        }
    }
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlignment {
    /// `-1` for top, `0` for middle, `1` for bottom.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Top => -1,
            Self::Middle => 0,
            Self::Bottom => 1,
        }
    }

    #[must_use]
    pub const fn from_sign(sign: i8) -> Self {
        match sign {
            i8::MIN..=-1 => Self::Top,
            0 => Self::Middle,
            _ => Self::Bottom,
        }
    }

    /// Offset of the box's top edge from the anchor, for a box `height` tall.
    #[must_use]
    pub fn offset(self, height: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Middle => -height / 2.0,
            Self::Bottom => -height,
        }
    }
}

pub const DEFAULT_FONT_SIZE: f64 = 12.0;
pub const NORMAL_FONT_WEIGHT: f64 = 400.0;
pub const BOLD_FONT_WEIGHT: f64 = 700.0;

/// Toolkit-neutral font request; the surface resolves it to a real face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// `None` selects the surface default family.
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default = "default_font_size")]
    pub size: f64,
    #[serde(default = "default_font_weight")]
    pub weight: f64,
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_weight() -> f64 {
    NORMAL_FONT_WEIGHT
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: None,
            size: DEFAULT_FONT_SIZE,
            weight: NORMAL_FONT_WEIGHT,
        }
    }
}

impl FontSpec {
    #[must_use]
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: Some(family.into()),
            size,
            weight: NORMAL_FONT_WEIGHT,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.size.is_finite()
            && self.size > 0.0
            && self.weight.is_finite()
            && self.weight > 0.0
            && self.family.as_deref().is_none_or(|family| !family.trim().is_empty())
    }

    /// Replaces unusable attributes with the surface defaults.
    #[must_use]
    pub fn resolved(&self, default: &FontSpec) -> FontSpec {
        FontSpec {
            family: match self.family.as_deref() {
                Some(family) if !family.trim().is_empty() => Some(family.to_owned()),
                _ => default.family.clone(),
            },
            size: if self.size.is_finite() && self.size > 0.0 {
                self.size
            } else {
                default.size
            },
            weight: if self.weight.is_finite() && self.weight > 0.0 {
                self.weight
            } else {
                default.weight
            },
        }
    }

    /// Same face scaled by `scale` (used for sub/superscripts).
    #[must_use]
    pub fn scaled(&self, scale: f64) -> FontSpec {
        FontSpec {
            family: self.family.clone(),
            size: self.size * scale,
            weight: self.weight,
        }
    }
}

/// Draw command for one text run in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub anchor: ScreenPoint,
    pub color: Color,
    pub font: FontSpec,
    /// Rotation in degrees around `anchor`, clockwise on screen.
    pub rotation: f64,
    pub h_align: HorizontalAlignment,
    pub v_align: VerticalAlignment,
    /// Optional clipping size for the text box.
    pub max_size: Option<Size>,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(text: impl Into<String>, anchor: ScreenPoint, color: Color, font: FontSpec) -> Self {
        Self {
            text: text.into(),
            anchor,
            color,
            font,
            rotation: 0.0,
            h_align: HorizontalAlignment::Left,
            v_align: VerticalAlignment::Top,
            max_size: None,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, h_align: HorizontalAlignment, v_align: VerticalAlignment) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: Option<Size>) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if self.text.is_empty() {
            return Err(PlotError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.anchor.is_finite() || !self.rotation.is_finite() {
            return Err(PlotError::InvalidData(
                "text anchor and rotation must be finite".to_owned(),
            ));
        }
        if !self.font.size.is_finite() || self.font.size <= 0.0 {
            return Err(PlotError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Decoded RGBA8 bitmap handed to [`crate::render::RenderContext::draw_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl PlotImage {
    pub fn new(width: u32, height: u32, rgba: impl Into<Arc<[u8]>>) -> PlotResult<Self> {
        let image = Self {
            width,
            height,
            rgba: rgba.into(),
        };
        image.validate()?;
        Ok(image)
    }

    pub fn validate(&self) -> PlotResult<()> {
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(4));
        if expected != Some(self.rgba.len()) {
            return Err(PlotError::InvalidData(format!(
                "image buffer of {} bytes does not match {}x{} rgba",
                self.rgba.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn bounds(&self) -> ScreenRect {
        ScreenRect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_signs_round_trip() {
        for align in [
            HorizontalAlignment::Left,
            HorizontalAlignment::Center,
            HorizontalAlignment::Right,
        ] {
            assert_eq!(HorizontalAlignment::from_sign(align.sign()), align);
        }
        assert_eq!(VerticalAlignment::from_sign(-3), VerticalAlignment::Top);
    }

    #[test]
    fn invalid_font_falls_back_to_default() {
        let broken = FontSpec {
            family: Some("  ".to_owned()),
            size: f64::NAN,
            weight: NORMAL_FONT_WEIGHT,
        };
        let default = FontSpec::new("Sans", 11.0);
        assert!(!broken.is_valid());
        let resolved = broken.resolved(&default);
        assert_eq!(resolved.family.as_deref(), Some("Sans"));
        assert_eq!(resolved.size, 11.0);
    }

    #[test]
    fn image_buffer_must_match_dimensions() {
        assert!(PlotImage::new(2, 2, vec![0u8; 16]).is_ok());
        assert!(PlotImage::new(2, 2, vec![0u8; 15]).is_err());
    }
}
