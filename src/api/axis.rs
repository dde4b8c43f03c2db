use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{
    AxisKind, AxisTransform, ScreenRect, TickRequest, TickSet, compute_ticks,
    ticks::DEFAULT_MAX_TICKS,
};
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, FontSpec, LineJoin, LineStyle, Pen};

use super::label_format::{ValueFormatterFn, default_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxisPosition {
    /// Not drawn; the axis still transforms values.
    None,
    Left,
    Right,
    Top,
    #[default]
    Bottom,
}

impl AxisPosition {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// `-1` for positions whose outside faces negative screen coordinates.
    #[must_use]
    pub fn outward_sign(self) -> f64 {
        match self {
            Self::Top | Self::Left => -1.0,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TickStyle {
    None,
    Inside,
    #[default]
    Outside,
    Crossing,
}

/// Color, dash style and thickness of one stroked element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineAppearance {
    pub color: Color,
    #[serde(default)]
    pub style: LineStyle,
    #[serde(default = "default_thickness")]
    pub thickness: f64,
}

fn default_thickness() -> f64 {
    1.0
}

impl LineAppearance {
    #[must_use]
    pub const fn new(color: Color, style: LineStyle, thickness: f64) -> Self {
        Self {
            color,
            style,
            thickness,
        }
    }

    #[must_use]
    pub const fn solid(color: Color, thickness: f64) -> Self {
        Self::new(color, LineStyle::Solid, thickness)
    }

    #[must_use]
    pub const fn hidden() -> Self {
        Self::new(Color::BLACK, LineStyle::None, 1.0)
    }

    /// Pen for this appearance, `None` when it draws nothing.
    #[must_use]
    pub fn pen(&self) -> Option<Pen> {
        Pen::from_appearance(self.color, self.thickness, self.style, LineJoin::Miter)
    }

    pub fn validate(&self, field: &str) -> PlotResult<()> {
        if !self.thickness.is_finite() || self.thickness < 0.0 {
            return Err(PlotError::InvalidConfig(format!(
                "{field} thickness must be finite and >= 0"
            )));
        }
        self.color.validate()
    }
}

fn default_major_gridlines() -> LineAppearance {
    LineAppearance::hidden()
}

fn default_minor_gridlines() -> LineAppearance {
    LineAppearance::hidden()
}

fn default_extra_gridline_appearance() -> LineAppearance {
    LineAppearance::solid(Color::BLACK, 1.0)
}

fn default_zero_line() -> LineAppearance {
    LineAppearance::solid(Color::BLACK, 1.0)
}

fn default_axis_line() -> LineAppearance {
    LineAppearance::solid(Color::BLACK, 1.0)
}

fn default_ticks_color() -> Color {
    Color::BLACK
}

fn default_tick_thickness() -> f64 {
    1.0
}

fn default_major_tick_size() -> f64 {
    7.0
}

fn default_minor_tick_size() -> f64 {
    4.0
}

fn default_title_position() -> f64 {
    0.5
}

fn default_title_clipping_length() -> f64 {
    0.9
}

fn default_tick_to_label_distance() -> f64 {
    4.0
}

fn default_title_distance() -> f64 {
    4.0
}

/// Visual attributes of an axis. Serializable so hosts can persist themes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisStyle {
    #[serde(default = "default_major_gridlines")]
    pub major_gridlines: LineAppearance,
    #[serde(default = "default_minor_gridlines")]
    pub minor_gridlines: LineAppearance,
    #[serde(default = "default_extra_gridline_appearance")]
    pub extra_gridline_appearance: LineAppearance,
    #[serde(default = "default_zero_line")]
    pub zero_line: LineAppearance,
    #[serde(default = "default_axis_line")]
    pub axis_line: LineAppearance,
    #[serde(default = "default_ticks_color")]
    pub ticks_color: Color,
    #[serde(default = "default_tick_thickness")]
    pub tick_thickness: f64,
    #[serde(default = "default_major_tick_size")]
    pub major_tick_size: f64,
    #[serde(default = "default_minor_tick_size")]
    pub minor_tick_size: f64,
    #[serde(default)]
    pub label_font: FontSpec,
    #[serde(default = "default_ticks_color")]
    pub label_color: Color,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_font: FontSpec,
    #[serde(default = "default_ticks_color")]
    pub title_color: Color,
    /// Fraction along the axis where the title is centered.
    #[serde(default = "default_title_position")]
    pub title_position: f64,
    /// Fraction of the axis length the title may occupy.
    #[serde(default = "default_title_clipping_length")]
    pub title_clipping_length: f64,
    #[serde(default = "default_tick_to_label_distance")]
    pub axis_tick_to_label_distance: f64,
    #[serde(default = "default_title_distance")]
    pub axis_title_distance: f64,
    #[serde(default)]
    pub extra_gridlines: Vec<f64>,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            major_gridlines: default_major_gridlines(),
            minor_gridlines: default_minor_gridlines(),
            extra_gridline_appearance: default_extra_gridline_appearance(),
            zero_line: default_zero_line(),
            axis_line: default_axis_line(),
            ticks_color: default_ticks_color(),
            tick_thickness: default_tick_thickness(),
            major_tick_size: default_major_tick_size(),
            minor_tick_size: default_minor_tick_size(),
            label_font: FontSpec::default(),
            label_color: default_ticks_color(),
            title: None,
            title_font: FontSpec::default(),
            title_color: default_ticks_color(),
            title_position: default_title_position(),
            title_clipping_length: default_title_clipping_length(),
            axis_tick_to_label_distance: default_tick_to_label_distance(),
            axis_title_distance: default_title_distance(),
            extra_gridlines: Vec::new(),
        }
    }
}

impl AxisStyle {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_major_gridlines(mut self, appearance: LineAppearance) -> Self {
        self.major_gridlines = appearance;
        self
    }

    #[must_use]
    pub fn with_minor_gridlines(mut self, appearance: LineAppearance) -> Self {
        self.minor_gridlines = appearance;
        self
    }

    #[must_use]
    pub fn with_extra_gridlines(mut self, values: Vec<f64>) -> Self {
        self.extra_gridlines = values;
        self
    }

    #[must_use]
    pub fn with_label_font(mut self, font: FontSpec) -> Self {
        self.label_font = font;
        self
    }

    #[must_use]
    pub fn tick_pen(&self) -> Option<Pen> {
        Pen::from_appearance(
            self.ticks_color,
            self.tick_thickness,
            LineStyle::Solid,
            LineJoin::Miter,
        )
    }

    pub fn validate(&self) -> PlotResult<()> {
        self.major_gridlines.validate("major gridline")?;
        self.minor_gridlines.validate("minor gridline")?;
        self.extra_gridline_appearance.validate("extra gridline")?;
        self.zero_line.validate("zero line")?;
        self.axis_line.validate("axis line")?;
        self.ticks_color.validate()?;
        self.label_color.validate()?;
        self.title_color.validate()?;
        for (field, value) in [
            ("tick thickness", self.tick_thickness),
            ("major tick size", self.major_tick_size),
            ("minor tick size", self.minor_tick_size),
            ("tick to label distance", self.axis_tick_to_label_distance),
            ("title distance", self.axis_title_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlotError::InvalidConfig(format!(
                    "{field} must be finite and >= 0"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.title_position) {
            return Err(PlotError::InvalidConfig(
                "title position must be in [0, 1]".to_owned(),
            ));
        }
        if !self.title_clipping_length.is_finite() || self.title_clipping_length <= 0.0 {
            return Err(PlotError::InvalidConfig(
                "title clipping length must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_interval_length() -> f64 {
    60.0
}

/// Axis record shared by every axis kind.
///
/// The external plot model resolves the actual range and steps, then calls
/// [`Axis::update_transform`] with the plot area before each render pass.
/// Renderers only read it.
#[derive(Clone)]
pub struct Axis {
    pub kind: AxisKind,
    pub actual_minimum: f64,
    pub actual_maximum: f64,
    pub major_step: Option<f64>,
    pub minor_step: Option<f64>,
    pub position: AxisPosition,
    pub position_at_zero_crossing: bool,
    pub is_reversed: bool,
    /// Label rotation in degrees, within [-180, 180].
    pub angle: f64,
    pub tick_style: TickStyle,
    /// Desired pixel distance between major ticks.
    pub interval_length: f64,
    pub max_ticks: usize,
    pub style: AxisStyle,
    formatter: Option<ValueFormatterFn>,
    screen_min: f64,
    screen_max: f64,
}

impl fmt::Debug for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axis")
            .field("kind", &self.kind)
            .field("actual_minimum", &self.actual_minimum)
            .field("actual_maximum", &self.actual_maximum)
            .field("major_step", &self.major_step)
            .field("minor_step", &self.minor_step)
            .field("position", &self.position)
            .field("is_reversed", &self.is_reversed)
            .field("screen_min", &self.screen_min)
            .field("screen_max", &self.screen_max)
            .field("has_formatter", &self.formatter.is_some())
            .finish_non_exhaustive()
    }
}

impl Axis {
    #[must_use]
    pub fn new(kind: AxisKind, position: AxisPosition) -> Self {
        Self {
            kind,
            actual_minimum: 0.0,
            actual_maximum: 100.0,
            major_step: None,
            minor_step: None,
            position,
            position_at_zero_crossing: false,
            is_reversed: false,
            angle: 0.0,
            tick_style: TickStyle::Outside,
            interval_length: default_interval_length(),
            max_ticks: DEFAULT_MAX_TICKS,
            style: AxisStyle::default(),
            formatter: None,
            screen_min: 0.0,
            screen_max: 1.0,
        }
    }

    #[must_use]
    pub fn linear(position: AxisPosition) -> Self {
        Self::new(AxisKind::Linear, position)
    }

    #[must_use]
    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.actual_minimum = minimum;
        self.actual_maximum = maximum;
        self
    }

    #[must_use]
    pub fn with_steps(mut self, major_step: Option<f64>, minor_step: Option<f64>) -> Self {
        self.major_step = major_step;
        self.minor_step = minor_step;
        self
    }

    #[must_use]
    pub fn with_reversed(mut self, is_reversed: bool) -> Self {
        self.is_reversed = is_reversed;
        self
    }

    #[must_use]
    pub fn with_zero_crossing(mut self, position_at_zero_crossing: bool) -> Self {
        self.position_at_zero_crossing = position_at_zero_crossing;
        self
    }

    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    #[must_use]
    pub fn with_tick_style(mut self, tick_style: TickStyle) -> Self {
        self.tick_style = tick_style;
        self
    }

    #[must_use]
    pub fn with_interval_length(mut self, interval_length: f64) -> Self {
        self.interval_length = interval_length;
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: ValueFormatterFn) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Explicit screen span, for axes not bound to a plot rectangle.
    #[must_use]
    pub fn with_screen_range(mut self, screen_min: f64, screen_max: f64) -> Self {
        self.screen_min = screen_min;
        self.screen_max = screen_max;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.actual_minimum.is_finite() || !self.actual_maximum.is_finite() {
            return Err(PlotError::InvalidData(
                "axis range must be finite".to_owned(),
            ));
        }
        if self.actual_minimum > self.actual_maximum {
            return Err(PlotError::InvalidData(format!(
                "axis minimum {} exceeds maximum {}",
                self.actual_minimum, self.actual_maximum
            )));
        }
        for (field, step) in [("major", self.major_step), ("minor", self.minor_step)] {
            if step.is_some_and(|step| !step.is_finite() || step <= 0.0) {
                return Err(PlotError::InvalidData(format!(
                    "{field} step must be finite and > 0"
                )));
            }
        }
        if !self.angle.is_finite() || !(-180.0..=180.0).contains(&self.angle) {
            return Err(PlotError::InvalidConfig(
                "label angle must be in [-180, 180]".to_owned(),
            ));
        }
        self.style.validate()
    }

    /// Binds the axis to `plot_area`.
    ///
    /// Horizontal axes span left to right, vertical axes bottom to top. A
    /// magnitude axis spans from the center to the inscribed circle; an angle
    /// axis maps onto its configured degree range.
    pub fn update_transform(&mut self, plot_area: ScreenRect) {
        match (&self.kind, self.position) {
            (AxisKind::Magnitude, _) => {
                self.screen_min = 0.0;
                self.screen_max = plot_area.width.min(plot_area.height) / 2.0;
            }
            (
                AxisKind::Angle {
                    start_angle,
                    end_angle,
                },
                _,
            ) => {
                self.screen_min = *start_angle;
                self.screen_max = *end_angle;
            }
            (_, AxisPosition::Left | AxisPosition::Right) => {
                self.screen_min = plot_area.bottom();
                self.screen_max = plot_area.top;
            }
            _ => {
                self.screen_min = plot_area.left;
                self.screen_max = plot_area.right();
            }
        }
    }

    #[must_use]
    pub fn formatter(&self) -> Option<&ValueFormatterFn> {
        self.formatter.as_ref()
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.position.is_horizontal()
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.position.is_vertical()
    }

    /// `(screen_min, screen_max)` as set by the last transform update.
    #[must_use]
    pub fn screen_range(&self) -> (f64, f64) {
        (self.screen_min, self.screen_max)
    }

    /// Affine map in projected space (log axes work on exponents).
    #[must_use]
    pub fn axis_transform(&self) -> AxisTransform {
        AxisTransform::new(
            self.kind.project(self.actual_minimum),
            self.kind.project(self.actual_maximum),
            self.screen_min,
            self.screen_max,
            self.is_reversed,
        )
    }

    #[must_use]
    pub fn transform(&self, value: f64) -> f64 {
        self.axis_transform().transform(self.kind.project(value))
    }

    #[must_use]
    pub fn inverse_transform(&self, screen: f64) -> f64 {
        self.kind
            .unproject(self.axis_transform().inverse_transform(screen))
    }

    /// True when the range collapses to a single value.
    #[must_use]
    pub fn has_zero_length_range(&self) -> bool {
        self.actual_minimum == self.actual_maximum
    }

    #[must_use]
    pub fn is_value_within(&self, value: f64, epsilon: f64) -> bool {
        value >= self.actual_minimum - epsilon && value <= self.actual_maximum + epsilon
    }

    #[must_use]
    pub fn tick_request(&self) -> TickRequest {
        let span = (self.screen_max - self.screen_min).abs();
        let request = TickRequest::new(self.actual_minimum, self.actual_maximum)
            .with_major_step(self.major_step)
            .with_minor_step(self.minor_step)
            .with_max_ticks(self.max_ticks);
        if matches!(self.kind, AxisKind::Angle { .. }) {
            // Degrees are not pixels; aim for the classic 8 spokes.
            return request.with_max_intervals(8.0);
        }
        request.with_pixel_budget(span, self.interval_length)
    }

    #[must_use]
    pub fn compute_ticks(&self) -> TickSet {
        compute_ticks(&self.tick_request(), &self.kind)
    }

    /// Label text for `value`: the custom formatter when set, otherwise the
    /// kind's default format.
    #[must_use]
    pub fn format_value(&self, value: f64, ticks: &TickSet) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => default_label(&self.kind, value, ticks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn vertical_axis_grows_upwards() {
        let mut axis = Axis::linear(AxisPosition::Left).with_range(0.0, 10.0);
        axis.update_transform(ScreenRect::new(0.0, 0.0, 100.0, 200.0));
        assert_eq!(axis.transform(0.0), 200.0);
        assert_eq!(axis.transform(10.0), 0.0);
    }

    #[test]
    fn log_axis_transforms_in_exponent_space() {
        let mut axis = Axis::new(AxisKind::logarithmic(10.0), AxisPosition::Bottom).with_range(1.0, 1000.0);
        axis.update_transform(ScreenRect::new(0.0, 0.0, 300.0, 100.0));
        assert!((axis.transform(10.0) - 100.0).abs() < 1e-9);
        assert!((axis.inverse_transform(200.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn custom_formatter_overrides_default() {
        let axis = Axis::linear(AxisPosition::Bottom)
            .with_formatter(Arc::new(|value| format!("{value:.1} m")));
        assert_eq!(axis.format_value(2.0, &TickSet::single(2.0)), "2.0 m");
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let axis = Axis::linear(AxisPosition::Bottom).with_range(5.0, 1.0);
        assert!(axis.validate().is_err());
    }
}
