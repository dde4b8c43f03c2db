use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{PlotError, PlotResult};
use crate::render::Color;

/// Dash pattern storage; every built-in style fits inline.
pub type DashArray = SmallVec<[f64; 6]>;

/// Named stroke patterns. Dash arrays are in units of stroke thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDashDot,
    DashDotDot,
    LongDash,
    LongDashDot,
    LongDashDotDot,
    /// Nothing is stroked.
    None,
}

impl LineStyle {
    /// Dash/gap lengths, `None` for a continuous stroke.
    #[must_use]
    pub fn dash_array(self) -> Option<DashArray> {
        let pattern: &[f64] = match self {
            Self::Solid | Self::None => return None,
            Self::Dash => &[4.0, 4.0],
            Self::Dot => &[1.0, 1.0],
            Self::DashDot => &[4.0, 1.0, 1.0, 1.0],
            Self::DashDashDot => &[4.0, 1.0, 4.0, 1.0, 1.0, 1.0],
            Self::DashDotDot => &[4.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            Self::LongDash => &[10.0, 4.0],
            Self::LongDashDot => &[10.0, 4.0, 1.0, 4.0],
            Self::LongDashDotDot => &[10.0, 4.0, 1.0, 4.0, 1.0, 4.0],
        };
        Some(SmallVec::from_slice(pattern))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Stroke description handed to the render context.
///
/// Pens are built per render call from style attributes; equality is plain
/// value equality.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub thickness: f64,
    pub dash_array: Option<DashArray>,
    pub line_join: LineJoin,
}

impl Pen {
    #[must_use]
    pub fn solid(color: Color, thickness: f64) -> Self {
        Self {
            color,
            thickness,
            dash_array: None,
            line_join: LineJoin::Miter,
        }
    }

    /// Builds a pen from style attributes, or `None` when nothing would be
    /// visible (transparent color, non-positive thickness, `LineStyle::None`).
    #[must_use]
    pub fn from_appearance(
        color: Color,
        thickness: f64,
        style: LineStyle,
        line_join: LineJoin,
    ) -> Option<Self> {
        if !color.is_visible()
            || !thickness.is_finite()
            || thickness <= 0.0
            || style == LineStyle::None
        {
            return None;
        }
        Some(Self {
            color,
            thickness,
            dash_array: style.dash_array(),
            line_join,
        })
    }

    #[must_use]
    pub fn with_line_join(mut self, line_join: LineJoin) -> Self {
        self.line_join = line_join;
        self
    }

    /// Dash array scaled to the stroke thickness, in pixels.
    #[must_use]
    pub fn scaled_dash_array(&self) -> Option<DashArray> {
        self.dash_array
            .as_ref()
            .map(|dashes| dashes.iter().map(|dash| dash * self.thickness).collect())
    }

    /// Hashable value key for surface-side resource caches.
    #[must_use]
    pub fn cache_key(&self) -> PenKey {
        PenKey {
            color: [
                OrderedFloat(self.color.red),
                OrderedFloat(self.color.green),
                OrderedFloat(self.color.blue),
                OrderedFloat(self.color.alpha),
            ],
            thickness: OrderedFloat(self.thickness),
            dash_array: self
                .dash_array
                .as_ref()
                .map(|dashes| dashes.iter().copied().map(OrderedFloat).collect()),
            line_join: self.line_join,
        }
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.thickness.is_finite() || self.thickness <= 0.0 {
            return Err(PlotError::InvalidData(
                "pen thickness must be finite and > 0".to_owned(),
            ));
        }
        if let Some(dashes) = &self.dash_array {
            if dashes.iter().any(|dash| !dash.is_finite() || *dash < 0.0) {
                return Err(PlotError::InvalidData(
                    "dash lengths must be finite and >= 0".to_owned(),
                ));
            }
        }
        self.color.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PenKey {
    color: [OrderedFloat<f64>; 4],
    thickness: OrderedFloat<f64>,
    dash_array: Option<SmallVec<[OrderedFloat<f64>; 6]>>,
    line_join: LineJoin,
}
