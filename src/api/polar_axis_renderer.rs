//! Magnitude (radial) and angle axes of polar plots.

use tracing::debug;

use crate::core::{AxisKind, PolarTransform, ScreenPoint, ScreenRect};
use crate::error::{PlotError, PlotResult};
use crate::render::math_text::draw_math_text;
use crate::render::{
    Color, HorizontalAlignment, Pen, RenderContext, TextPrimitive, VerticalAlignment,
};

use super::axis::Axis;
use super::axis_renderer::AxisRenderOptions;

/// Polar transform for a magnitude/angle axis pair centered in `plot_area`.
///
/// Both axes must have been bound with [`Axis::update_transform`].
#[must_use]
pub fn polar_transform(magnitude: &Axis, angle: &Axis, plot_area: ScreenRect) -> PolarTransform {
    PolarTransform {
        midpoint: plot_area.center(),
        magnitude: magnitude.axis_transform(),
        angle: angle.axis_transform(),
    }
}

fn require_kind(axis: &Axis, is_expected: bool, expected: &str) -> PlotResult<()> {
    if is_expected {
        Ok(())
    } else {
        Err(PlotError::InvalidConfig(format!(
            "expected a {expected} axis, got {}",
            axis.kind.name()
        )))
    }
}

fn require_pair(magnitude: &Axis, angle: &Axis) -> PlotResult<()> {
    require_kind(
        magnitude,
        matches!(magnitude.kind, AxisKind::Magnitude),
        "magnitude",
    )?;
    require_kind(angle, matches!(angle.kind, AxisKind::Angle { .. }), "angle")
}

/// Unit direction of `degrees` on screen (0 = east, counter-clockwise).
fn direction(degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (cos, -sin)
}

/// Draws circular gridlines, the radial axis line and labels along the
/// start angle.
#[derive(Debug, Clone, Default)]
pub struct MagnitudeAxisRenderer {
    options: AxisRenderOptions,
}

impl MagnitudeAxisRenderer {
    #[must_use]
    pub fn new(options: AxisRenderOptions) -> Self {
        Self { options }
    }

    pub fn render<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        magnitude: &Axis,
        angle: &Axis,
        plot_area: ScreenRect,
    ) -> PlotResult<()> {
        self.options.validate()?;
        require_pair(magnitude, angle)?;

        let polar = polar_transform(magnitude, angle, plot_area);
        let ticks = magnitude.compute_ticks();
        let epsilon = ticks.epsilon(self.options.minor_tick_epsilon_factor);
        let style = &magnitude.style;
        let center = polar.midpoint;

        let circle = |value: f64| {
            let radius = magnitude.transform(value).abs();
            ScreenRect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
        };

        if let Some(pen) = style.minor_gridlines.pen() {
            let rects: Vec<ScreenRect> = ticks
                .visible_minor(epsilon)
                .into_iter()
                .filter(|value| magnitude.is_value_within(*value, epsilon))
                .map(circle)
                .collect();
            if !rects.is_empty() {
                ctx.draw_ellipses(&rects, Color::TRANSPARENT, Some(&pen));
            }
        }
        if let Some(pen) = style.major_gridlines.pen() {
            let rects: Vec<ScreenRect> = ticks
                .major
                .iter()
                .copied()
                .filter(|value| magnitude.is_value_within(*value, epsilon))
                .map(circle)
                .collect();
            if !rects.is_empty() {
                ctx.draw_ellipses(&rects, Color::TRANSPARENT, Some(&pen));
            }
        }

        let start_angle = angle.actual_minimum;
        if let Some(pen) = style.axis_line.pen() {
            let start = polar.transform(magnitude.actual_minimum, start_angle);
            let end = polar.transform(magnitude.actual_maximum, start_angle);
            ctx.draw_line(&[start, end], &pen);
        }

        if let Some(pen) = style.tick_pen() {
            let (dx, dy) = direction(angle.transform(start_angle));
            // Ticks stand perpendicular to the radial line.
            let (nx, ny) = (-dy, dx);
            let half = style.major_tick_size / 2.0;
            let mut segments = Vec::new();
            for &value in &ticks.major {
                if !magnitude.is_value_within(value, epsilon) {
                    continue;
                }
                let p = polar.transform(value, start_angle);
                segments.push(ScreenPoint::new(p.x - nx * half, p.y - ny * half));
                segments.push(ScreenPoint::new(p.x + nx * half, p.y + ny * half));
            }
            if !segments.is_empty() {
                ctx.draw_line_segments(&segments, &pen);
            }
        }

        for &value in &ticks.labels {
            if !magnitude.is_value_within(value, epsilon) {
                continue;
            }
            let text = magnitude.format_value(value, &ticks);
            if text.is_empty() {
                continue;
            }
            let p = polar.transform(value, start_angle);
            let anchor = ScreenPoint::new(p.x, p.y + style.axis_tick_to_label_distance);
            let label = TextPrimitive::new(text, anchor, style.label_color, style.label_font.clone())
                .with_alignment(HorizontalAlignment::Center, VerticalAlignment::Top);
            draw_math_text(ctx, &label);
        }

        if let Some(title) = style.title.as_deref().filter(|title| !title.is_empty()) {
            let middle = magnitude.actual_minimum
                + (magnitude.actual_maximum - magnitude.actual_minimum) * style.title_position;
            let p = polar.transform(middle, start_angle);
            let anchor = ScreenPoint::new(p.x, p.y - style.axis_title_distance);
            let text = TextPrimitive::new(title, anchor, style.title_color, style.title_font.clone())
                .with_alignment(HorizontalAlignment::Center, VerticalAlignment::Bottom);
            draw_math_text(ctx, &text);
        }

        debug!(major = ticks.major.len(), "magnitude axis rendered");
        Ok(())
    }
}

/// Draws radial spokes and labels outside the outer circle.
#[derive(Debug, Clone, Default)]
pub struct AngleAxisRenderer {
    options: AxisRenderOptions,
}

impl AngleAxisRenderer {
    #[must_use]
    pub fn new(options: AxisRenderOptions) -> Self {
        Self { options }
    }

    pub fn render<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        angle: &Axis,
        magnitude: &Axis,
        plot_area: ScreenRect,
    ) -> PlotResult<()> {
        self.options.validate()?;
        require_pair(magnitude, angle)?;

        let polar = polar_transform(magnitude, angle, plot_area);
        let ticks = angle.compute_ticks();
        let epsilon = ticks.epsilon(self.options.minor_tick_epsilon_factor);
        let style = &angle.style;
        let inner = magnitude.actual_minimum;
        let outer = magnitude.actual_maximum;

        let spokes = |values: Vec<f64>| -> Vec<ScreenPoint> {
            values
                .into_iter()
                .filter(|value| angle.is_value_within(*value, epsilon))
                .flat_map(|value| [polar.transform(inner, value), polar.transform(outer, value)])
                .collect()
        };
        if let Some(pen) = style.minor_gridlines.pen() {
            draw_segments(ctx, &spokes(ticks.visible_minor(epsilon)), &pen);
        }
        if let Some(pen) = style.major_gridlines.pen() {
            draw_segments(ctx, &spokes(ticks.major.clone()), &pen);
        }

        if let Some(pen) = style.axis_line.pen() {
            let radius = magnitude.transform(outer).abs();
            let center = polar.midpoint;
            let rect = ScreenRect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0);
            ctx.draw_ellipse(rect, Color::TRANSPARENT, Some(&pen));
        }

        let full_turn = (angle.transform(angle.actual_maximum)
            - angle.transform(angle.actual_minimum))
        .abs()
            >= 360.0 - 1e-9;
        let radius = magnitude.transform(outer).abs() + style.axis_tick_to_label_distance;
        for &value in &ticks.labels {
            if !angle.is_value_within(value, epsilon) {
                continue;
            }
            // 0 and 360 share a spoke; keep the first label only.
            if full_turn && (value - angle.actual_maximum).abs() <= epsilon {
                continue;
            }
            let text = angle.format_value(value, &ticks);
            if text.is_empty() {
                continue;
            }
            let (dx, dy) = direction(angle.transform(value));
            let anchor = ScreenPoint::new(polar.midpoint.x + dx * radius, polar.midpoint.y + dy * radius);
            let label = TextPrimitive::new(text, anchor, style.label_color, style.label_font.clone())
                .with_alignment(h_align_for(dx), v_align_for(dy));
            draw_math_text(ctx, &label);
        }

        debug!(major = ticks.major.len(), "angle axis rendered");
        Ok(())
    }
}

fn draw_segments<C: RenderContext + ?Sized>(ctx: &mut C, segments: &[ScreenPoint], pen: &Pen) {
    if !segments.is_empty() {
        ctx.draw_line_segments(segments, pen);
    }
}

fn h_align_for(dx: f64) -> HorizontalAlignment {
    if dx > 0.1 {
        HorizontalAlignment::Left
    } else if dx < -0.1 {
        HorizontalAlignment::Right
    } else {
        HorizontalAlignment::Center
    }
}

fn v_align_for(dy: f64) -> VerticalAlignment {
    if dy > 0.1 {
        VerticalAlignment::Top
    } else if dy < -0.1 {
        VerticalAlignment::Bottom
    } else {
        VerticalAlignment::Middle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_alignment_points_away_from_center() {
        let (dx, dy) = direction(0.0);
        assert_eq!(h_align_for(dx), HorizontalAlignment::Left);
        assert_eq!(v_align_for(dy), VerticalAlignment::Middle);
        let (dx, dy) = direction(90.0);
        assert_eq!(h_align_for(dx), HorizontalAlignment::Center);
        assert_eq!(v_align_for(dy), VerticalAlignment::Bottom);
    }
}
