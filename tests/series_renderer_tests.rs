use approx::assert_relative_eq;
use plot_rs::api::{
    AreaBaseline, Axis, AxisPosition, Series, SeriesKind, SeriesRenderer, SeriesStyle,
};
use plot_rs::core::{ClipWindow, DataPoint, ScreenPoint, ScreenRect};
use plot_rs::render::{DrawCommand, MarkerType, RecordingRenderContext};

fn axes(x: (f64, f64), y: (f64, f64), area: ScreenRect) -> (Axis, Axis) {
    let mut x_axis = Axis::linear(AxisPosition::Bottom).with_range(x.0, x.1);
    let mut y_axis = Axis::linear(AxisPosition::Left).with_range(y.0, y.1);
    x_axis.update_transform(area);
    y_axis.update_transform(area);
    (x_axis, y_axis)
}

fn square() -> ScreenRect {
    ScreenRect::new(0.0, 0.0, 100.0, 100.0)
}

#[test]
fn near_duplicate_points_collapse_before_drawing() {
    let (x_axis, y_axis) = axes((0.0, 1_000.0), (0.0, 10.0), square());
    let series = Series::line(Series::points_from_pairs(&[
        (0.0, 0.0),
        (1.0, 0.0001),
        (2.0, 5.0),
    ]))
    .with_style(SeriesStyle::default().with_minimum_segment_length(2.0));

    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default()
        .render(&mut ctx, &series, &x_axis, &y_axis)
        .expect("render");

    let lines: Vec<_> = ctx.frame().lines().collect();
    assert_eq!(lines.len(), 1);
    let (points, _) = lines[0];
    assert_eq!(points.len(), 2);
    assert_relative_eq!(points[0].x, 0.0);
    assert_relative_eq!(points[0].y, 100.0);
    assert_relative_eq!(points[1].x, 0.2, epsilon = 1e-12);
    assert_relative_eq!(points[1].y, 50.0, epsilon = 1e-12);
}

#[test]
fn zero_threshold_keeps_every_point() {
    let (x_axis, y_axis) = axes((0.0, 1_000.0), (0.0, 10.0), square());
    let series = Series::line(Series::points_from_pairs(&[
        (0.0, 0.0),
        (1.0, 0.0001),
        (2.0, 5.0),
    ]))
    .with_style(SeriesStyle::default().with_minimum_segment_length(0.0));

    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default()
        .render(&mut ctx, &series, &x_axis, &y_axis)
        .expect("render");
    let (points, _) = ctx.frame().lines().next().expect("one line");
    assert_eq!(points.len(), 3);
}

#[test]
fn diagonal_is_clipped_at_window_corner() {
    let window = ClipWindow::new(0.0, 10.0, 0.0, 10.0);
    let (start, end) = window
        .clip_data_segment(DataPoint::new(-5.0, -5.0), DataPoint::new(5.0, 5.0))
        .expect("segment crosses the window");
    assert_eq!(start, DataPoint::new(0.0, 0.0));
    assert_eq!(end, DataPoint::new(5.0, 5.0));

    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 10.0), square());
    let series = Series::line(Series::points_from_pairs(&[(-5.0, -5.0), (5.0, 5.0)]));
    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default()
        .render(&mut ctx, &series, &x_axis, &y_axis)
        .expect("render");
    let (points, _) = ctx.frame().lines().next().expect("clipped line");
    assert_eq!(points[0], ScreenPoint::new(0.0, 100.0));
    assert_eq!(points[1], ScreenPoint::new(50.0, 50.0));
}

#[test]
fn undefined_points_split_the_polyline() {
    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 10.0), square());
    let series = Series::line(Series::points_from_pairs(&[
        (1.0, 1.0),
        (2.0, 2.0),
        (3.0, f64::NAN),
        (4.0, 4.0),
        (5.0, 5.0),
    ]));
    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default()
        .render(&mut ctx, &series, &x_axis, &y_axis)
        .expect("render");
    assert_eq!(ctx.frame().lines().count(), 2);
}

#[test]
fn line_outside_window_draws_nothing() {
    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 10.0), square());
    let series = Series::line(Series::points_from_pairs(&[(20.0, 20.0), (30.0, 25.0)]));
    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default()
        .render(&mut ctx, &series, &x_axis, &y_axis)
        .expect("render");
    assert!(ctx.frame().is_empty());
}

#[test]
fn smoothing_adds_interpolated_points() {
    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 10.0), square());
    let series = Series::line(Series::points_from_pairs(&[
        (0.0, 0.0),
        (3.0, 8.0),
        (6.0, 2.0),
        (9.0, 9.0),
    ]))
    .with_style(SeriesStyle::default().with_smooth(true));
    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default()
        .render(&mut ctx, &series, &x_axis, &y_axis)
        .expect("render");
    let (points, _) = ctx.frame().lines().next().expect("smoothed line");
    assert!(points.len() > 4);
    assert_eq!(points.first().copied(), Some(ScreenPoint::new(0.0, 100.0)));
    assert_eq!(points.last().copied(), Some(ScreenPoint::new(90.0, 10.0)));
}

#[test]
fn area_fill_is_clipped_and_closed_on_the_baseline() {
    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 10.0), square());
    let series = Series::area(
        Series::points_from_pairs(&[(0.0, 5.0), (5.0, 8.0), (10.0, 5.0)]),
        AreaBaseline::Constant(0.0),
    );
    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default()
        .render(&mut ctx, &series, &x_axis, &y_axis)
        .expect("render");

    let frame = ctx.frame();
    assert!(matches!(frame.commands.first(), Some(DrawCommand::PushClip(rect)) if *rect == square()));
    assert!(matches!(frame.commands.last(), Some(DrawCommand::PopClip)));
    frame.validate().expect("balanced clip");

    let polygon = frame.polygons().next().expect("fill polygon");
    assert_eq!(polygon.len(), 5);
    assert_eq!(polygon[3], ScreenPoint::new(100.0, 100.0));
    assert_eq!(polygon[4], ScreenPoint::new(0.0, 100.0));
    assert_eq!(frame.lines().count(), 1);
}

#[test]
fn area_with_second_list_strokes_both_edges() {
    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 10.0), square());
    let series = Series::area(
        Series::points_from_pairs(&[(0.0, 8.0), (10.0, 8.0)]),
        AreaBaseline::Points(Series::points_from_pairs(&[(0.0, 2.0), (10.0, 3.0)])),
    );
    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default()
        .render(&mut ctx, &series, &x_axis, &y_axis)
        .expect("render");

    let frame = ctx.frame();
    let polygon = frame.polygons().next().expect("fill polygon");
    assert_eq!(
        polygon,
        &[
            ScreenPoint::new(0.0, 20.0),
            ScreenPoint::new(100.0, 20.0),
            ScreenPoint::new(100.0, 70.0),
            ScreenPoint::new(0.0, 80.0),
        ]
    );
    assert_eq!(frame.lines().count(), 2);
}

#[test]
fn scatter_draws_markers_only_inside_window() {
    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 10.0), square());
    let series = Series::scatter(Series::points_from_pairs(&[
        (1.0, 1.0),
        (5.0, 5.0),
        (9.0, 9.0),
        (15.0, 5.0),
        (f64::NAN, 2.0),
    ]));
    assert!(matches!(series.kind, SeriesKind::Scatter));

    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default()
        .render(&mut ctx, &series, &x_axis, &y_axis)
        .expect("render");
    let ellipses: Vec<ScreenRect> = ctx.frame().ellipses().collect();
    assert_eq!(ellipses.len(), 3);
    assert_eq!(ellipses[1].center(), ScreenPoint::new(50.0, 50.0));
    assert_eq!(ctx.frame().lines().count(), 0);
}

#[test]
fn unusable_custom_marker_is_skipped() {
    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 10.0), square());
    let series = Series::scatter(Series::points_from_pairs(&[(1.0, 1.0), (5.0, 5.0)])).with_style(
        SeriesStyle::default().with_marker(MarkerType::Custom(vec![ScreenPoint::new(0.0, 1.0)]), 4.0),
    );
    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default()
        .render(&mut ctx, &series, &x_axis, &y_axis)
        .expect("render");
    assert!(ctx.frame().is_empty());
}

#[test]
fn invalid_style_is_rejected() {
    let (x_axis, y_axis) = axes((0.0, 10.0), (0.0, 10.0), square());
    let series = Series::line(Series::points_from_pairs(&[(1.0, 1.0), (5.0, 5.0)])).with_style(
        SeriesStyle {
            thickness: f64::NAN,
            ..SeriesStyle::default()
        },
    );
    let mut ctx = RecordingRenderContext::new();
    let result = SeriesRenderer::default().render(&mut ctx, &series, &x_axis, &y_axis);
    assert!(result.is_err());
}

#[test]
fn legend_symbol_draws_line_and_marker() {
    let series = Series::line(Vec::new())
        .with_style(SeriesStyle::default().with_marker(MarkerType::Square, 3.0));
    let mut ctx = RecordingRenderContext::new();
    SeriesRenderer::default().render_legend_symbol(
        &mut ctx,
        &series,
        ScreenRect::new(10.0, 10.0, 16.0, 12.0),
    );
    let (points, _) = ctx.frame().lines().next().expect("swatch line");
    assert_eq!(points, &[ScreenPoint::new(10.0, 16.0), ScreenPoint::new(26.0, 16.0)]);
    assert_eq!(ctx.frame().polygons().count(), 1);
}

#[test]
fn decimal_inputs_convert_to_data_points() {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    let point = DataPoint::from_decimal(Decimal::new(125, 2), Decimal::new(-3, 0)).expect("finite");
    assert_eq!(point, DataPoint::new(1.25, -3.0));

    let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid date");
    let dated = DataPoint::from_decimal_time(time, Decimal::new(42, 1)).expect("finite");
    assert_eq!(dated.x, 1_704_067_200.0);
    assert_relative_eq!(dated.y, 4.2);
}
