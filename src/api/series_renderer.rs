//! Clipping, reduction and drawing of line, area and scatter series.

use tracing::{debug, trace};

use crate::core::{
    ClipWindow, DEFAULT_SPLINE_TENSION, DEFAULT_SPLINE_TOLERANCE, DataPoint, ScreenPoint,
    ScreenRect, canonical_spline, reduce_points,
};
use crate::error::PlotResult;
use crate::render::markers::render_markers;
use crate::render::{Pen, RenderContext};

use super::axis::Axis;
use super::series::{AreaBaseline, Series, SeriesKind, SeriesStyle};

/// Draws series against a bound pair of axes.
///
/// Both axes must have been bound with [`Axis::update_transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRenderer {
    pub spline_tension: f64,
    pub spline_tolerance: f64,
}

impl Default for SeriesRenderer {
    fn default() -> Self {
        Self {
            spline_tension: DEFAULT_SPLINE_TENSION,
            spline_tolerance: DEFAULT_SPLINE_TOLERANCE,
        }
    }
}

/// Maps data points to screen space, swapping coordinates when the X axis
/// is vertical.
#[derive(Clone, Copy)]
struct SeriesProjection<'a> {
    x_axis: &'a Axis,
    y_axis: &'a Axis,
}

impl SeriesProjection<'_> {
    fn point(self, p: DataPoint) -> ScreenPoint {
        let sx = self.x_axis.transform(p.x);
        let sy = self.y_axis.transform(p.y);
        if self.x_axis.is_vertical() {
            ScreenPoint::new(sy, sx)
        } else {
            ScreenPoint::new(sx, sy)
        }
    }

    fn window(self) -> ClipWindow {
        ClipWindow::new(
            self.x_axis.actual_minimum,
            self.x_axis.actual_maximum,
            self.y_axis.actual_minimum,
            self.y_axis.actual_maximum,
        )
    }

    fn plot_rect(self) -> ScreenRect {
        let (x0, x1) = self.x_axis.screen_range();
        let (y0, y1) = self.y_axis.screen_range();
        if self.x_axis.is_vertical() {
            ScreenRect::from_corners(ScreenPoint::new(y0, x0), ScreenPoint::new(y1, x1))
        } else {
            ScreenRect::from_corners(ScreenPoint::new(x0, y0), ScreenPoint::new(x1, y1))
        }
    }
}

/// Splits `points` into continuous runs clipped to `window`.
///
/// Undefined points end a run. A segment re-entering the window after
/// leaving it starts a new run.
pub fn clipped_runs(points: &[DataPoint], window: ClipWindow) -> Vec<Vec<DataPoint>> {
    let mut runs = Vec::new();
    let mut current: Vec<DataPoint> = Vec::new();
    let mut previous: Option<DataPoint> = None;

    let mut flush = |current: &mut Vec<DataPoint>| {
        if !current.is_empty() {
            runs.push(std::mem::take(current));
        }
    };

    for &point in points {
        if !point.is_defined() {
            flush(&mut current);
            previous = None;
            continue;
        }
        match previous {
            None => {
                if window.contains_data(point) {
                    current.push(point);
                }
            }
            Some(start) => match window.clip_data_segment(start, point) {
                Some((a, b)) => {
                    if current.last() != Some(&a) {
                        flush(&mut current);
                        current.push(a);
                    }
                    current.push(b);
                    if b != point {
                        flush(&mut current);
                    }
                }
                None => flush(&mut current),
            },
        }
        previous = Some(point);
    }
    flush(&mut current);
    runs
}

/// Splits `points` at undefined entries without clipping.
fn defined_runs(points: &[DataPoint]) -> Vec<&[DataPoint]> {
    points
        .split(|point| !point.is_defined())
        .filter(|run| !run.is_empty())
        .collect()
}

fn threshold_squared(style: &SeriesStyle) -> f64 {
    let length = style.minimum_segment_length;
    if length.is_finite() && length > 0.0 {
        length * length
    } else {
        0.0
    }
}

impl SeriesRenderer {
    #[must_use]
    pub fn new(spline_tension: f64, spline_tolerance: f64) -> Self {
        Self {
            spline_tension,
            spline_tolerance,
        }
    }

    pub fn render<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        series: &Series,
        x_axis: &Axis,
        y_axis: &Axis,
    ) -> PlotResult<()> {
        series.style.validate()?;
        let projection = SeriesProjection { x_axis, y_axis };
        let window = projection.window();

        let mut drawn_runs = 0usize;
        match &series.kind {
            SeriesKind::Line => {
                if let Some(pen) = series.style.line_pen() {
                    for run in clipped_runs(&series.points, window) {
                        let screen = self.screen_line(&run, projection, &series.style);
                        if screen.len() >= 2 {
                            ctx.draw_line(&screen, &pen);
                            drawn_runs += 1;
                        }
                    }
                }
            }
            SeriesKind::Area { baseline } => {
                drawn_runs = self.render_area(ctx, series, baseline, projection)?;
            }
            SeriesKind::Scatter => {}
        }

        let markers = self.render_series_markers(ctx, series, projection, window);
        debug!(
            title = series.title.as_deref().unwrap_or(""),
            kind = series.kind_name(),
            points = series.points.len(),
            runs = drawn_runs,
            markers,
            "series rendered"
        );
        Ok(())
    }

    /// Transforms, reduces and optionally smooths one run.
    fn screen_line(
        &self,
        run: &[DataPoint],
        projection: SeriesProjection<'_>,
        style: &SeriesStyle,
    ) -> Vec<ScreenPoint> {
        let screen: Vec<ScreenPoint> = run.iter().map(|p| projection.point(*p)).collect();
        let mut reduced = Vec::with_capacity(screen.len());
        reduce_points(&screen, threshold_squared(style), &mut reduced);
        if style.smooth && reduced.len() > 2 {
            canonical_spline(&reduced, self.spline_tension, self.spline_tolerance)
        } else {
            reduced
        }
    }

    fn render_area<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        series: &Series,
        baseline: &AreaBaseline,
        projection: SeriesProjection<'_>,
    ) -> PlotResult<usize> {
        let style = &series.style;
        let fill = style.fill_color();
        let pen = style.line_pen();

        // The fill uses unclipped runs so that the surface clip cuts it at the
        // plot edges instead of breaking it where the line leaves the window.
        let upper: Vec<Vec<ScreenPoint>> = defined_runs(&series.points)
            .into_iter()
            .map(|run| self.screen_line(run, projection, style))
            .filter(|run| !run.is_empty())
            .collect();

        ctx.push_clip(projection.plot_rect());
        let mut drawn = 0usize;
        match baseline {
            AreaBaseline::Constant(value) => {
                let base = projection.point(DataPoint::new(0.0, *value));
                let base_y = if base.y.is_finite() {
                    base.y
                } else {
                    projection.y_axis.screen_range().0
                };
                let base_x = if base.x.is_finite() {
                    base.x
                } else {
                    projection.x_axis.screen_range().0
                };
                let polygons: Vec<Vec<ScreenPoint>> = upper
                    .iter()
                    .filter(|run| run.len() >= 2)
                    .filter_map(|run| {
                        let (first, last) = (run.first()?, run.last()?);
                        let mut polygon = run.clone();
                        if projection.x_axis.is_vertical() {
                            polygon.push(ScreenPoint::new(base_x, last.y));
                            polygon.push(ScreenPoint::new(base_x, first.y));
                        } else {
                            polygon.push(ScreenPoint::new(last.x, base_y));
                            polygon.push(ScreenPoint::new(first.x, base_y));
                        }
                        Some(polygon)
                    })
                    .collect();
                if fill.is_visible() && !polygons.is_empty() {
                    ctx.draw_polygons(&polygons, fill, None);
                }
                drawn += polygons.len();
            }
            AreaBaseline::Points(points) => {
                let lower: Vec<Vec<ScreenPoint>> = defined_runs(points)
                    .into_iter()
                    .map(|run| self.screen_line(run, projection, style))
                    .filter(|run| !run.is_empty())
                    .collect();
                let mut polygon: Vec<ScreenPoint> = upper.iter().flatten().copied().collect();
                polygon.extend(lower.iter().flatten().rev().copied());
                if fill.is_visible() && polygon.len() >= 3 {
                    ctx.draw_polygon(&polygon, fill, None);
                    drawn += 1;
                }
                if let Some(pen) = &pen {
                    stroke_runs(ctx, &lower, pen);
                }
            }
        }
        if let Some(pen) = &pen {
            stroke_runs(ctx, &upper, pen);
        }
        ctx.pop_clip()?;
        trace!(runs = upper.len(), polygons = drawn, "area filled");
        Ok(drawn)
    }

    fn render_series_markers<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        series: &Series,
        projection: SeriesProjection<'_>,
        window: ClipWindow,
    ) -> usize {
        let style = &series.style;
        if !style.marker.is_visible() {
            return 0;
        }
        let screen: Vec<ScreenPoint> = series
            .points
            .iter()
            .filter(|p| p.is_defined() && window.contains_data(**p))
            .map(|p| projection.point(*p))
            .collect();
        let mut reduced = Vec::with_capacity(screen.len());
        reduce_points(&screen, threshold_squared(style), &mut reduced);
        let pen = style.marker_pen();
        render_markers(
            ctx,
            &reduced,
            &style.marker,
            style.marker_size,
            style.marker_fill_color(),
            pen.as_ref(),
        );
        reduced.len()
    }

    /// Draws the legend swatch of `series` inside `rect`.
    pub fn render_legend_symbol<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        series: &Series,
        rect: ScreenRect,
    ) {
        let style = &series.style;
        let center = rect.center();
        let line = [
            ScreenPoint::new(rect.left, center.y),
            ScreenPoint::new(rect.right(), center.y),
        ];

        if let SeriesKind::Area { .. } = series.kind {
            let fill = style.fill_color();
            if fill.is_visible() {
                let polygon = [
                    line[0],
                    line[1],
                    ScreenPoint::new(rect.right(), rect.bottom()),
                    ScreenPoint::new(rect.left, rect.bottom()),
                ];
                ctx.draw_polygon(&polygon, fill, None);
            }
        }
        if !matches!(series.kind, SeriesKind::Scatter) {
            if let Some(pen) = style.line_pen() {
                ctx.draw_line(&line, &pen);
            }
        }
        if style.marker.is_visible() {
            let size = style.marker_size.min(rect.height / 2.0);
            let pen = style.marker_pen();
            render_markers(
                ctx,
                &[center],
                &style.marker,
                size,
                style.marker_fill_color(),
                pen.as_ref(),
            );
        }
    }
}

fn stroke_runs<C: RenderContext + ?Sized>(ctx: &mut C, runs: &[Vec<ScreenPoint>], pen: &Pen) {
    for run in runs.iter().filter(|run| run.len() >= 2) {
        ctx.draw_line(run, pen);
    }
}

impl Series {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self.kind {
            SeriesKind::Line => "line",
            SeriesKind::Area { .. } => "area",
            SeriesKind::Scatter => "scatter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> ClipWindow {
        ClipWindow::new(0.0, 10.0, 0.0, 10.0)
    }

    #[test]
    fn undefined_point_breaks_run() {
        let points = [
            DataPoint::new(1.0, 1.0),
            DataPoint::new(2.0, 2.0),
            DataPoint::new(f64::NAN, 3.0),
            DataPoint::new(4.0, 4.0),
            DataPoint::new(5.0, 5.0),
        ];
        let runs = clipped_runs(&points, window());
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![points[0], points[1]]);
        assert_eq!(runs[1], vec![points[3], points[4]]);
    }

    #[test]
    fn leaving_and_reentering_splits_run() {
        let points = [
            DataPoint::new(1.0, 5.0),
            DataPoint::new(3.0, 15.0),
            DataPoint::new(5.0, 5.0),
        ];
        let runs = clipped_runs(&points, window());
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0][0], points[0]);
        assert!((runs[0][1].y - 10.0).abs() < 1e-12);
        assert!((runs[1][0].y - 10.0).abs() < 1e-12);
        assert_eq!(runs[1][1], points[2]);
    }

    #[test]
    fn segment_crossing_window_is_kept() {
        let points = [DataPoint::new(-5.0, 5.0), DataPoint::new(15.0, 5.0)];
        let runs = clipped_runs(&points, window());
        assert_eq!(runs, vec![vec![DataPoint::new(0.0, 5.0), DataPoint::new(10.0, 5.0)]]);
    }
}
