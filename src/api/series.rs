use serde::{Deserialize, Serialize};

use crate::core::DataPoint;
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, LineJoin, LineStyle, MarkerType, Pen};

/// Lower edge of an area series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AreaBaseline {
    /// Horizontal line at a constant Y value.
    Constant(f64),
    /// A second point list, drawn as its own line.
    Points(Vec<DataPoint>),
}

impl Default for AreaBaseline {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesKind {
    #[default]
    Line,
    Area {
        #[serde(default)]
        baseline: AreaBaseline,
    },
    /// Markers only.
    Scatter,
}

fn default_series_color() -> Color {
    Color::rgb(0.30, 0.45, 0.69)
}

fn default_series_thickness() -> f64 {
    2.0
}

fn default_marker_size() -> f64 {
    3.0
}

fn default_minimum_segment_length() -> f64 {
    2.0
}

fn default_fill_alpha() -> f64 {
    0.5
}

/// Stroke, fill and marker attributes of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    #[serde(default = "default_series_color")]
    pub color: Color,
    #[serde(default = "default_series_thickness")]
    pub thickness: f64,
    #[serde(default)]
    pub line_style: LineStyle,
    #[serde(default)]
    pub line_join: LineJoin,
    /// Area fill; `None` derives it from `color` at `fill_alpha`.
    #[serde(default)]
    pub fill: Option<Color>,
    #[serde(default = "default_fill_alpha")]
    pub fill_alpha: f64,
    #[serde(default)]
    pub marker: MarkerType,
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
    /// Marker fill; `None` uses `color`.
    #[serde(default)]
    pub marker_fill: Option<Color>,
    #[serde(default)]
    pub marker_stroke: Option<Color>,
    #[serde(default)]
    pub marker_stroke_thickness: f64,
    /// Canonical spline smoothing of the reduced screen points.
    #[serde(default)]
    pub smooth: bool,
    /// Consecutive screen points closer than this (pixels) are merged.
    #[serde(default = "default_minimum_segment_length")]
    pub minimum_segment_length: f64,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            color: default_series_color(),
            thickness: default_series_thickness(),
            line_style: LineStyle::Solid,
            line_join: LineJoin::Miter,
            fill: None,
            fill_alpha: default_fill_alpha(),
            marker: MarkerType::None,
            marker_size: default_marker_size(),
            marker_fill: None,
            marker_stroke: None,
            marker_stroke_thickness: 0.0,
            smooth: false,
            minimum_segment_length: default_minimum_segment_length(),
        }
    }
}

impl SeriesStyle {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: MarkerType, size: f64) -> Self {
        self.marker = marker;
        self.marker_size = size;
        self
    }

    #[must_use]
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    #[must_use]
    pub fn with_minimum_segment_length(mut self, length: f64) -> Self {
        self.minimum_segment_length = length;
        self
    }

    #[must_use]
    pub fn line_pen(&self) -> Option<Pen> {
        Pen::from_appearance(self.color, self.thickness, self.line_style, self.line_join)
    }

    #[must_use]
    pub fn fill_color(&self) -> Color {
        self.fill.unwrap_or_else(|| self.color.with_alpha(self.color.alpha * self.fill_alpha))
    }

    #[must_use]
    pub fn marker_fill_color(&self) -> Color {
        self.marker_fill.unwrap_or(self.color)
    }

    #[must_use]
    pub fn marker_pen(&self) -> Option<Pen> {
        self.marker_stroke.and_then(|color| {
            Pen::from_appearance(
                color,
                self.marker_stroke_thickness,
                LineStyle::Solid,
                LineJoin::Miter,
            )
        })
    }

    pub fn validate(&self) -> PlotResult<()> {
        self.color.validate()?;
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        for (field, value) in [
            ("thickness", self.thickness),
            ("marker size", self.marker_size),
            ("marker stroke thickness", self.marker_stroke_thickness),
            ("minimum segment length", self.minimum_segment_length),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlotError::InvalidConfig(format!(
                    "series {field} must be finite and >= 0"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.fill_alpha) {
            return Err(PlotError::InvalidConfig(
                "fill alpha must be in [0, 1]".to_owned(),
            ));
        }
        Ok(())
    }
}

/// One data series. Non-finite points break lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Series {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub kind: SeriesKind,
    pub points: Vec<DataPoint>,
    #[serde(default)]
    pub style: SeriesStyle,
}

impl Series {
    #[must_use]
    pub fn line(points: Vec<DataPoint>) -> Self {
        Self {
            title: None,
            kind: SeriesKind::Line,
            points,
            style: SeriesStyle::default(),
        }
    }

    #[must_use]
    pub fn area(points: Vec<DataPoint>, baseline: AreaBaseline) -> Self {
        Self {
            kind: SeriesKind::Area { baseline },
            ..Self::line(points)
        }
    }

    #[must_use]
    pub fn scatter(points: Vec<DataPoint>) -> Self {
        Self {
            kind: SeriesKind::Scatter,
            style: SeriesStyle::default().with_marker(MarkerType::Circle, default_marker_size()),
            ..Self::line(points)
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    /// Builds the point list from `(x, y)` pairs.
    #[must_use]
    pub fn points_from_pairs(pairs: &[(f64, f64)]) -> Vec<DataPoint> {
        pairs.iter().map(|&(x, y)| DataPoint::new(x, y)).collect()
    }

    #[must_use]
    pub fn has_legend_entry(&self) -> bool {
        self.title.as_deref().is_some_and(|title| !title.is_empty())
    }
}
