use criterion::{Criterion, criterion_group, criterion_main};
use plot_rs::api::{AxisRenderer, Series, SeriesRenderer, clipped_runs};
use plot_rs::core::{
    AxisKind, AxisTransform, ClipWindow, DataPoint, ScreenPoint, ScreenRect, TickRequest,
    compute_ticks, reduce_points,
};
use plot_rs::render::RecordingRenderContext;
use plot_rs::{Axis, AxisPosition};
use std::hint::black_box;

fn bound_axes(area: ScreenRect, x: (f64, f64), y: (f64, f64)) -> (Axis, Axis) {
    let mut x_axis = Axis::linear(AxisPosition::Bottom).with_range(x.0, x.1);
    let mut y_axis = Axis::linear(AxisPosition::Left).with_range(y.0, y.1);
    x_axis.update_transform(area);
    y_axis.update_transform(area);
    (x_axis, y_axis)
}

fn bench_axis_transform_round_trip(c: &mut Criterion) {
    let transform = AxisTransform::new(0.0, 10_000.0, 1080.0, 0.0, false);

    c.bench_function("axis_transform_round_trip", |b| {
        b.iter(|| {
            let px = transform.transform(black_box(4_321.123));
            let _ = transform.inverse_transform(px);
        })
    });
}

fn bench_tick_generation(c: &mut Criterion) {
    let linear = TickRequest::new(-1_234.5, 98_765.4).with_pixel_budget(1920.0, 60.0);
    let log = TickRequest::new(1e-3, 1e12).with_pixel_budget(1080.0, 60.0);
    let log_kind = AxisKind::logarithmic(10.0);
    let date = TickRequest::new(1_700_000_000.0, 1_731_536_000.0).with_pixel_budget(1920.0, 60.0);
    let date_kind = AxisKind::date_time();

    c.bench_function("ticks_linear", |b| {
        b.iter(|| compute_ticks(black_box(&linear), &AxisKind::Linear))
    });
    c.bench_function("ticks_logarithmic", |b| {
        b.iter(|| compute_ticks(black_box(&log), &log_kind))
    });
    c.bench_function("ticks_date_time", |b| {
        b.iter(|| compute_ticks(black_box(&date), &date_kind))
    });
}

fn bench_reduce_100k(c: &mut Criterion) {
    let points: Vec<ScreenPoint> = (0..100_000)
        .map(|i| {
            let t = i as f64 * 0.01;
            ScreenPoint::new(t, 500.0 + (t * 3.0).sin() * 200.0)
        })
        .collect();
    let mut out = Vec::with_capacity(points.len());

    c.bench_function("reduce_points_100k", |b| {
        b.iter(|| reduce_points(black_box(&points), 4.0, &mut out))
    });
}

fn bench_clip_10k(c: &mut Criterion) {
    let window = ClipWindow::new(0.0, 100.0, -1.0, 1.0);
    let points: Vec<DataPoint> = (0..10_000)
        .map(|i| {
            let x = i as f64 * 0.02 - 50.0;
            DataPoint::new(x, (x * 0.7).sin() * 1.5)
        })
        .collect();

    c.bench_function("clipped_runs_10k", |b| {
        b.iter(|| clipped_runs(black_box(&points), window))
    });
}

fn bench_render_line_series_10k(c: &mut Criterion) {
    let area = ScreenRect::new(60.0, 20.0, 1600.0, 900.0);
    let (x_axis, y_axis) = bound_axes(area, (0.0, 10_000.0), (-2.0, 2.0));
    let pairs: Vec<(f64, f64)> = (0..10_000)
        .map(|i| {
            let x = i as f64;
            (x, (x * 0.01).sin() * 1.5)
        })
        .collect();
    let series = Series::line(Series::points_from_pairs(&pairs)).with_title("sine");
    let renderer = SeriesRenderer::default();

    c.bench_function("render_line_series_10k", |b| {
        b.iter(|| {
            let mut ctx = RecordingRenderContext::new();
            renderer
                .render(&mut ctx, black_box(&series), &x_axis, &y_axis)
                .expect("series render should succeed");
            ctx.take_frame()
        })
    });

    let axis_renderer = AxisRenderer::default();
    c.bench_function("render_axes", |b| {
        b.iter(|| {
            let mut ctx = RecordingRenderContext::new();
            axis_renderer
                .render(&mut ctx, &x_axis, Some(&y_axis), area)
                .expect("axis render should succeed");
            axis_renderer
                .render(&mut ctx, &y_axis, Some(&x_axis), area)
                .expect("axis render should succeed");
            ctx.take_frame()
        })
    });
}

criterion_group!(
    benches,
    bench_axis_transform_round_trip,
    bench_tick_generation,
    bench_reduce_100k,
    bench_clip_10k,
    bench_render_line_series_10k
);
criterion_main!(benches);
