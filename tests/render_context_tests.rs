use plot_rs::PlotError;
use plot_rs::core::{ScreenPoint, ScreenRect, Size};
use plot_rs::render::{
    ClipStack, ClippingRenderContext, Color, DrawCommand, FontSpec, LineStyle, Pen, PlotImage,
    RecordingRenderContext, RenderContext, RenderFrame, ResourceCache, TextPrimitive,
};

/// Minimal surface implementing only the required methods.
#[derive(Default)]
struct CountingContext {
    lines: usize,
    polygons: usize,
    ellipses: usize,
    texts: usize,
    clips: ClipStack,
}

impl RenderContext for CountingContext {
    fn draw_line(&mut self, _points: &[ScreenPoint], _pen: &Pen) {
        self.lines += 1;
    }

    fn draw_polygon(&mut self, _points: &[ScreenPoint], _fill: Color, _stroke: Option<&Pen>) {
        self.polygons += 1;
    }

    fn draw_ellipse(&mut self, _rect: ScreenRect, _fill: Color, _stroke: Option<&Pen>) {
        self.ellipses += 1;
    }

    fn draw_text(&mut self, _text: &TextPrimitive) {
        self.texts += 1;
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Size {
        Size::new(text.len() as f64 * font.size, font.size)
    }

    fn push_clip(&mut self, rect: ScreenRect) {
        self.clips.push(rect);
    }

    fn pop_clip(&mut self) -> plot_rs::PlotResult<()> {
        self.clips.pop().map(|_| ())
    }
}

fn pen() -> Pen {
    Pen::solid(Color::BLACK, 1.0)
}

#[test]
fn default_composites_fall_back_to_required_primitives() {
    let mut ctx = CountingContext::default();
    let points = [
        ScreenPoint::new(0.0, 0.0),
        ScreenPoint::new(1.0, 0.0),
        ScreenPoint::new(2.0, 0.0),
        ScreenPoint::new(3.0, 0.0),
        ScreenPoint::new(4.0, 0.0),
    ];
    ctx.draw_line_segments(&points, &pen());
    assert_eq!(ctx.lines, 2, "trailing odd point is ignored");

    let rects = [
        ScreenRect::new(0.0, 0.0, 1.0, 1.0),
        ScreenRect::new(2.0, 2.0, 1.0, 1.0),
    ];
    ctx.draw_rectangles(&rects, Color::WHITE, None);
    ctx.draw_polygons(&[points.to_vec()], Color::WHITE, Some(&pen()));
    assert_eq!(ctx.polygons, 3);

    ctx.draw_ellipses(&rects, Color::WHITE, None);
    assert_eq!(ctx.ellipses, 2);

    let image = PlotImage::new(1, 1, vec![0_u8, 0, 0, 255]).expect("image");
    ctx.draw_image(&image, image.bounds(), rects[0], 1.0);
    ctx.set_tool_tip(Some("ignored"));
    ctx.clean_up();
    assert_eq!(ctx.lines + ctx.polygons + ctx.ellipses + ctx.texts, 7);
}

#[test]
fn nested_clips_restore_previous_region() {
    let mut ctx = RecordingRenderContext::new();
    ctx.push_clip(ScreenRect::new(0.0, 0.0, 100.0, 100.0));
    ctx.push_clip(ScreenRect::new(50.0, -10.0, 100.0, 40.0));
    assert_eq!(
        ctx.clip_stack().current(),
        Some(ScreenRect::new(50.0, 0.0, 50.0, 30.0))
    );
    ctx.pop_clip().expect("balanced");
    assert_eq!(
        ctx.clip_stack().current(),
        Some(ScreenRect::new(0.0, 0.0, 100.0, 100.0))
    );
    ctx.pop_clip().expect("balanced");
    assert_eq!(ctx.clip_stack().current(), None);

    let error = ctx.pop_clip().expect_err("nothing pushed");
    assert!(matches!(error, PlotError::UnbalancedClip { .. }));
    ctx.frame().validate().expect("recorded pushes and pops balance");
}

#[test]
fn frame_validation_detects_unbalanced_clip() {
    let frame = RenderFrame::new().with_command(DrawCommand::PushClip(ScreenRect::new(
        0.0, 0.0, 1.0, 1.0,
    )));
    assert!(matches!(
        frame.validate(),
        Err(PlotError::UnbalancedClip { .. })
    ));
    let frame = RenderFrame::new().with_command(DrawCommand::PopClip);
    assert!(frame.validate().is_err());
}

#[test]
fn software_clipping_cuts_segments_and_polygons() {
    let mut ctx = ClippingRenderContext::new(RecordingRenderContext::new());
    ctx.push_clip(ScreenRect::new(0.0, 0.0, 10.0, 10.0));

    ctx.draw_line_segments(
        &[
            ScreenPoint::new(-5.0, 5.0),
            ScreenPoint::new(5.0, 5.0),
            ScreenPoint::new(20.0, 20.0),
            ScreenPoint::new(30.0, 30.0),
        ],
        &pen(),
    );
    ctx.draw_polygon(
        &[
            ScreenPoint::new(-5.0, -5.0),
            ScreenPoint::new(5.0, -5.0),
            ScreenPoint::new(5.0, 5.0),
            ScreenPoint::new(-5.0, 5.0),
        ],
        Color::BLACK,
        None,
    );
    ctx.draw_ellipse(ScreenRect::new(40.0, 40.0, 5.0, 5.0), Color::BLACK, None);
    ctx.draw_text(&TextPrimitive::new(
        "outside",
        ScreenPoint::new(50.0, 50.0),
        Color::BLACK,
        FontSpec::default(),
    ));
    ctx.pop_clip().expect("balanced");

    let frame = ctx.inner().frame();
    let (segments, _) = frame.segment_batches().next().expect("segments");
    assert_eq!(segments, &[ScreenPoint::new(0.0, 5.0), ScreenPoint::new(5.0, 5.0)]);

    let polygon = frame.polygons().next().expect("clipped polygon");
    assert!(polygon
        .iter()
        .all(|p| (0.0..=5.0).contains(&p.x) && (0.0..=5.0).contains(&p.y)));
    assert_eq!(frame.ellipses().count(), 0);
    assert_eq!(frame.texts().count(), 0);
}

#[test]
fn resource_cache_clean_up_is_idempotent() {
    let mut cache: ResourceCache<&str, u32> = ResourceCache::new();
    cache.get_or_insert_with("axis", || 1);
    cache.get_or_insert_with("grid", || 2);
    cache.clean_up();
    assert_eq!(cache.len(), 2);

    cache.get_or_insert_with("axis", || 10);
    cache.clean_up();
    assert!(cache.contains(&"axis"));
    assert!(!cache.contains(&"grid"));

    cache.clean_up();
    cache.clean_up();
    assert!(cache.contains(&"axis"), "no access since last clean-up keeps entries");
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses, stats.evictions), (1, 2, 1));
}

#[test]
fn pens_with_equal_attributes_share_a_cache_key() {
    let a = Pen::from_appearance(Color::BLACK, 1.5, LineStyle::Dash, Default::default())
        .expect("visible");
    let b = Pen::from_appearance(Color::BLACK, 1.5, LineStyle::Dash, Default::default())
        .expect("visible");
    assert_eq!(a, b);
    assert_eq!(a.cache_key(), b.cache_key());
    assert_ne!(a.cache_key(), pen().cache_key());
    assert!(Pen::from_appearance(Color::BLACK, 1.0, LineStyle::None, Default::default()).is_none());
    assert!(Pen::from_appearance(Color::TRANSPARENT, 1.0, LineStyle::Solid, Default::default()).is_none());
}
