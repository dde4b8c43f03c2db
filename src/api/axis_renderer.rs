//! Cartesian axis rendering: gridlines, ticks, labels, zero line, extra
//! gridlines, axis line and title, drawn in that order.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{ScreenPoint, ScreenRect, Size, TickSet};
use crate::error::{PlotError, PlotResult};
use crate::render::math_text::{draw_math_text, measure_math_text};
use crate::render::{
    HorizontalAlignment, Pen, RenderContext, TextPrimitive, VerticalAlignment,
};

use super::axis::{Axis, AxisPosition, TickStyle};

/// Crossing ticks extend this fraction of the tick size to each side.
pub const CROSSING_TICK_SCALE: f64 = 0.75;

fn default_minor_tick_epsilon_factor() -> f64 {
    1e-3
}

fn default_snap_tolerance_px() -> f64 {
    1.0
}

/// Tunables of [`AxisRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRenderOptions {
    /// Multiplier of the minor step giving the "same tick" tolerance.
    #[serde(default = "default_minor_tick_epsilon_factor")]
    pub minor_tick_epsilon_factor: f64,
    /// Coordinates closer than this to a plot edge are moved onto it.
    #[serde(default = "default_snap_tolerance_px")]
    pub snap_tolerance_px: f64,
}

impl Default for AxisRenderOptions {
    fn default() -> Self {
        Self {
            minor_tick_epsilon_factor: default_minor_tick_epsilon_factor(),
            snap_tolerance_px: default_snap_tolerance_px(),
        }
    }
}

impl AxisRenderOptions {
    #[must_use]
    pub fn with_minor_tick_epsilon_factor(mut self, factor: f64) -> Self {
        self.minor_tick_epsilon_factor = factor;
        self
    }

    pub fn validate(self) -> PlotResult<()> {
        if !self.minor_tick_epsilon_factor.is_finite() || self.minor_tick_epsilon_factor < 0.0 {
            return Err(PlotError::InvalidConfig(
                "minor tick epsilon factor must be finite and >= 0".to_owned(),
            ));
        }
        if !self.snap_tolerance_px.is_finite() || self.snap_tolerance_px < 0.0 {
            return Err(PlotError::InvalidConfig(
                "snap tolerance must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Start/end offsets of a tick mark, perpendicular to the axis line.
///
/// Positive values point away from the plot for bottom/right axes; the sign
/// flips for top/left axes.
#[must_use]
pub fn tick_offsets(style: TickStyle, position: AxisPosition, size: f64) -> (f64, f64) {
    let sign = position.outward_sign();
    match style {
        TickStyle::Crossing => (
            -size * sign * CROSSING_TICK_SCALE,
            size * sign * CROSSING_TICK_SCALE,
        ),
        TickStyle::Inside => (-size * sign, 0.0),
        TickStyle::Outside => (0.0, size * sign),
        TickStyle::None => (0.0, 0.0),
    }
}

/// Label alignment for a label rotated by `angle` degrees.
///
/// Using signs (left/top = -1, center/middle = 0, right/bottom = 1): beyond
/// +/-135 both signs flip; above 45 the horizontal sign takes the vertical one
/// and the vertical sign the negated horizontal one; below -45 the horizontal
/// sign takes the negated vertical one and the vertical sign the horizontal
/// one. Angles within [-45, 45] keep the given alignment.
#[must_use]
pub fn rotated_alignments(
    angle: f64,
    h_align: HorizontalAlignment,
    v_align: VerticalAlignment,
) -> (HorizontalAlignment, VerticalAlignment) {
    let h = h_align.sign();
    let v = v_align.sign();
    if angle > 135.0 || angle < -135.0 {
        (
            HorizontalAlignment::from_sign(-h),
            VerticalAlignment::from_sign(-v),
        )
    } else if angle > 45.0 {
        (
            HorizontalAlignment::from_sign(v),
            VerticalAlignment::from_sign(-h),
        )
    } else if angle < -45.0 {
        (
            HorizontalAlignment::from_sign(-v),
            VerticalAlignment::from_sign(h),
        )
    } else {
        (h_align, v_align)
    }
}

/// Unrotated label alignment for each axis position.
#[must_use]
pub fn default_label_alignment(
    position: AxisPosition,
) -> (HorizontalAlignment, VerticalAlignment) {
    match position {
        AxisPosition::Left => (HorizontalAlignment::Right, VerticalAlignment::Middle),
        AxisPosition::Right => (HorizontalAlignment::Left, VerticalAlignment::Middle),
        AxisPosition::Top => (HorizontalAlignment::Center, VerticalAlignment::Bottom),
        AxisPosition::Bottom | AxisPosition::None => {
            (HorizontalAlignment::Center, VerticalAlignment::Top)
        }
    }
}

/// Tick counts of one [`AxisRenderer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisRenderStats {
    pub major_ticks: usize,
    pub minor_ticks: usize,
}

/// Segment batches of one render call, one per pen category.
#[derive(Debug, Default)]
struct SegmentBatches {
    minor_grid: Vec<ScreenPoint>,
    major_grid: Vec<ScreenPoint>,
    minor_ticks: Vec<ScreenPoint>,
    major_ticks: Vec<ScreenPoint>,
}

/// Geometry shared by the phases of one axis render.
struct AxisFrame<'a> {
    axis: &'a Axis,
    plot_area: ScreenRect,
    axis_position: f64,
    snap_tolerance: f64,
}

impl AxisFrame<'_> {
    fn horizontal(&self) -> bool {
        self.axis.is_horizontal()
    }

    /// Screen coordinate of `value` along the axis, snapped to the plot edges.
    ///
    /// A zero-length range puts every value at the middle of the screen span.
    fn along(&self, value: f64) -> f64 {
        let t = if self.axis.has_zero_length_range() {
            let (screen_min, screen_max) = self.axis.screen_range();
            lerp(screen_min, screen_max, 0.5)
        } else {
            self.axis.transform(value)
        };
        let (low, high) = if self.horizontal() {
            (self.plot_area.left, self.plot_area.right())
        } else {
            (self.plot_area.top, self.plot_area.bottom())
        };
        if (t - low).abs() < self.snap_tolerance {
            low
        } else if (t - high).abs() < self.snap_tolerance {
            high
        } else {
            t
        }
    }

    /// Point at `along` on the axis, offset perpendicular by `across`.
    fn point(&self, along: f64, across: f64) -> ScreenPoint {
        if self.horizontal() {
            ScreenPoint::new(along, self.axis_position + across)
        } else {
            ScreenPoint::new(self.axis_position + across, along)
        }
    }

    fn gridline(&self, along: f64, out: &mut Vec<ScreenPoint>) {
        if self.horizontal() {
            out.push(ScreenPoint::new(along, self.plot_area.top));
            out.push(ScreenPoint::new(along, self.plot_area.bottom()));
        } else {
            out.push(ScreenPoint::new(self.plot_area.left, along));
            out.push(ScreenPoint::new(self.plot_area.right(), along));
        }
    }

    fn tick(&self, along: f64, offsets: (f64, f64), out: &mut Vec<ScreenPoint>) {
        out.push(self.point(along, offsets.0));
        out.push(self.point(along, offsets.1));
    }
}

/// Renders cartesian axes (left, right, top, bottom).
#[derive(Debug, Clone, Default)]
pub struct AxisRenderer {
    options: AxisRenderOptions,
}

impl AxisRenderer {
    #[must_use]
    pub fn new(options: AxisRenderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> AxisRenderOptions {
        self.options
    }

    /// Screen coordinate of the axis line, perpendicular to the axis.
    ///
    /// With zero-crossing placement the line sits at the perpendicular axis'
    /// zero, clamped to the plot area.
    #[must_use]
    pub fn axis_position(axis: &Axis, perpendicular: Option<&Axis>, plot_area: ScreenRect) -> f64 {
        let (low, high) = if axis.is_horizontal() {
            (plot_area.top, plot_area.bottom())
        } else {
            (plot_area.left, plot_area.right())
        };
        if axis.position_at_zero_crossing {
            if let Some(perpendicular) = perpendicular {
                let zero = perpendicular.transform(0.0);
                if zero.is_finite() {
                    return zero.clamp(low, high);
                }
            }
        }
        match axis.position {
            AxisPosition::Top | AxisPosition::Left => low,
            _ => high,
        }
    }

    /// Draws `axis` into `plot_area`.
    ///
    /// `perpendicular` is only consulted for zero-crossing placement. Axes
    /// positioned `None` draw nothing and report no ticks.
    pub fn render<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        axis: &Axis,
        perpendicular: Option<&Axis>,
        plot_area: ScreenRect,
    ) -> PlotResult<AxisRenderStats> {
        self.options.validate()?;
        if axis.position == AxisPosition::None {
            trace!("axis without position, nothing to draw");
            return Ok(AxisRenderStats::default());
        }

        let ticks = axis.compute_ticks();
        let epsilon = ticks.epsilon(self.options.minor_tick_epsilon_factor);
        let frame = AxisFrame {
            axis,
            plot_area,
            axis_position: Self::axis_position(axis, perpendicular, plot_area),
            snap_tolerance: self.options.snap_tolerance_px,
        };
        let style = &axis.style;
        let major_offsets = tick_offsets(axis.tick_style, axis.position, style.major_tick_size);
        let minor_offsets = tick_offsets(axis.tick_style, axis.position, style.minor_tick_size);
        let tick_pen = style.tick_pen().filter(|_| axis.tick_style != TickStyle::None);
        let major_grid_pen = style.major_gridlines.pen();
        let minor_grid_pen = style.minor_gridlines.pen();

        let mut batches = SegmentBatches::default();
        let skips_zero = |value: f64| axis.position_at_zero_crossing && value.abs() <= epsilon;

        for value in ticks.visible_minor(epsilon) {
            if !axis.is_value_within(value, epsilon) || skips_zero(value) {
                continue;
            }
            let along = frame.along(value);
            if minor_grid_pen.is_some() {
                frame.gridline(along, &mut batches.minor_grid);
            }
            if tick_pen.is_some() && style.minor_tick_size > 0.0 {
                frame.tick(along, minor_offsets, &mut batches.minor_ticks);
            }
        }
        flush(ctx, &mut batches.minor_grid, minor_grid_pen.as_ref());
        flush(ctx, &mut batches.minor_ticks, tick_pen.as_ref());

        for &value in &ticks.major {
            if !axis.is_value_within(value, epsilon) || skips_zero(value) {
                continue;
            }
            let along = frame.along(value);
            if major_grid_pen.is_some() {
                frame.gridline(along, &mut batches.major_grid);
            }
            if tick_pen.is_some() && style.major_tick_size > 0.0 {
                frame.tick(along, major_offsets, &mut batches.major_ticks);
            }
        }
        flush(ctx, &mut batches.major_grid, major_grid_pen.as_ref());
        flush(ctx, &mut batches.major_ticks, tick_pen.as_ref());

        let label_extent = self.render_labels(ctx, &frame, &ticks, major_offsets.1, epsilon);

        if axis.position_at_zero_crossing && axis.is_value_within(0.0, 0.0) {
            if let Some(pen) = style.zero_line.pen() {
                let mut line = Vec::with_capacity(2);
                frame.gridline(frame.along(0.0), &mut line);
                ctx.draw_line(&line, &pen);
            }
        }

        if let Some(pen) = style.extra_gridline_appearance.pen() {
            let mut extra = Vec::new();
            for &value in &style.extra_gridlines {
                if axis.is_value_within(value, 0.0) {
                    frame.gridline(frame.along(value), &mut extra);
                }
            }
            flush(ctx, &mut extra, Some(&pen));
        }

        if let Some(pen) = style.axis_line.pen() {
            let (screen_min, screen_max) = if axis.has_zero_length_range() {
                axis.screen_range()
            } else {
                (axis.transform(axis.actual_minimum), axis.transform(axis.actual_maximum))
            };
            let start = frame.point(screen_min, 0.0);
            let end = frame.point(screen_max, 0.0);
            if start.is_finite() && end.is_finite() {
                ctx.draw_line(&[start, end], &pen);
            }
        }

        let band = tick_margin(major_offsets, axis.position)
            + style.axis_tick_to_label_distance
            + label_extent;
        self.render_title(ctx, &frame, band);

        debug!(
            position = ?axis.position,
            kind = axis.kind.name(),
            major = ticks.major.len(),
            minor = ticks.minor.len(),
            "axis rendered"
        );
        Ok(AxisRenderStats {
            major_ticks: ticks.major.len(),
            minor_ticks: ticks.minor.len(),
        })
    }

    /// Draws the major labels; returns the largest extent perpendicular to
    /// the axis.
    fn render_labels<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        frame: &AxisFrame<'_>,
        ticks: &TickSet,
        tick_end: f64,
        epsilon: f64,
    ) -> f64 {
        let axis = frame.axis;
        let style = &axis.style;
        let sign = axis.position.outward_sign();
        let (h_align, v_align) = default_label_alignment(axis.position);
        let (h_align, v_align) = rotated_alignments(axis.angle, h_align, v_align);
        let across = tick_end + sign * style.axis_tick_to_label_distance;

        let mut extent = 0.0_f64;
        for &value in &ticks.labels {
            if !axis.is_value_within(value, epsilon)
                || (axis.position_at_zero_crossing && value.abs() <= epsilon)
            {
                continue;
            }
            let text = axis.format_value(value, ticks);
            if text.is_empty() {
                continue;
            }
            let anchor = frame.point(frame.along(value), across);
            let label = TextPrimitive::new(text, anchor, style.label_color, style.label_font.clone())
                .with_rotation(axis.angle)
                .with_alignment(h_align, v_align);
            let size = draw_math_text(ctx, &label).rotated_bounds(axis.angle);
            extent = extent.max(if axis.is_horizontal() {
                size.height
            } else {
                size.width
            });
        }
        extent
    }

    fn render_title<C: RenderContext + ?Sized>(&self, ctx: &mut C, frame: &AxisFrame<'_>, band: f64) {
        let axis = frame.axis;
        let style = &axis.style;
        let Some(title) = style.title.as_deref().filter(|title| !title.is_empty()) else {
            return;
        };
        let title_height = measure_math_text(ctx, title, &style.title_font, None).height;
        let offset = axis.position.outward_sign() * (band + style.axis_title_distance + title_height);

        let (screen_min, screen_max) = axis.screen_range();
        let middle = lerp(screen_min, screen_max, style.title_position);
        let (angle, h_align, v_align) = match axis.position {
            AxisPosition::Left => (-90.0, HorizontalAlignment::Center, VerticalAlignment::Top),
            AxisPosition::Right => (-90.0, HorizontalAlignment::Center, VerticalAlignment::Bottom),
            AxisPosition::Top => (0.0, HorizontalAlignment::Center, VerticalAlignment::Top),
            _ => (0.0, HorizontalAlignment::Center, VerticalAlignment::Bottom),
        };
        let length = (screen_max - screen_min).abs() * style.title_clipping_length;
        let anchor = frame.point(middle, offset);
        let text = TextPrimitive::new(title, anchor, style.title_color, style.title_font.clone())
            .with_rotation(angle)
            .with_alignment(h_align, v_align)
            .with_max_size(Some(Size::new(length, title_height)));
        draw_math_text(ctx, &text);
    }

    /// Size of the band the axis occupies outside the plot area: tick
    /// margin, label distance, the largest rotated label, title distance and
    /// title height. For horizontal axes the band is the height, for vertical
    /// axes the width; the other dimension is the widest label extent along
    /// the axis.
    pub fn measure<C: RenderContext + ?Sized>(&self, ctx: &mut C, axis: &Axis) -> Size {
        if axis.position == AxisPosition::None {
            return Size::EMPTY;
        }
        let style = &axis.style;
        let ticks = axis.compute_ticks();
        let epsilon = ticks.epsilon(self.options.minor_tick_epsilon_factor);

        let mut labels = Size::EMPTY;
        for &value in &ticks.labels {
            if !axis.is_value_within(value, epsilon) {
                continue;
            }
            let text = axis.format_value(value, &ticks);
            if text.is_empty() {
                continue;
            }
            labels = labels.include(measure_math_text(
                ctx,
                &text,
                &style.label_font,
                Some(axis.angle),
            ));
        }

        let offsets = tick_offsets(axis.tick_style, axis.position, style.major_tick_size);
        let (label_across, label_along) = if axis.is_horizontal() {
            (labels.height, labels.width)
        } else {
            (labels.width, labels.height)
        };
        let mut band = tick_margin(offsets, axis.position)
            + style.axis_tick_to_label_distance
            + label_across;
        if let Some(title) = style.title.as_deref().filter(|title| !title.is_empty()) {
            band += style.axis_title_distance
                + measure_math_text(ctx, title, &style.title_font, None).height;
        }

        if axis.is_horizontal() {
            Size::new(label_along, band)
        } else {
            Size::new(band, label_along)
        }
    }
}

/// Outward extent of the ticks.
fn tick_margin(offsets: (f64, f64), position: AxisPosition) -> f64 {
    let sign = position.outward_sign();
    (offsets.0 * sign).max(offsets.1 * sign).max(0.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn flush<C: RenderContext + ?Sized>(ctx: &mut C, segments: &mut Vec<ScreenPoint>, pen: Option<&Pen>) {
    if let Some(pen) = pen {
        if !segments.is_empty() {
            ctx.draw_line_segments(segments, pen);
        }
    }
    segments.clear();
}
