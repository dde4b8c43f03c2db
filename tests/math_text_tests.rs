use approx::assert_relative_eq;
use plot_rs::core::ScreenPoint;
use plot_rs::render::math_text::{
    MathTextRunKind, SCRIPT_FONT_SCALE, SUBSCRIPT_OFFSET_SCALE, draw_math_text, layout_math_text,
    measure_math_text, parse_math_text,
};
use plot_rs::render::{
    Color, FontSpec, HorizontalAlignment, RecordingRenderContext, RenderContext, TextPrimitive,
    VerticalAlignment,
};

fn font() -> FontSpec {
    FontSpec::default().with_size(10.0)
}

#[test]
fn water_formula_has_three_runs() {
    let runs = parse_math_text("H_{2}O");
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].text, "H");
    assert_eq!(runs[0].kind, MathTextRunKind::Regular);
    assert_eq!(runs[1].text, "2");
    assert_eq!(runs[1].kind, MathTextRunKind::Subscript);
    assert_relative_eq!(runs[1].font_size_scale, SCRIPT_FONT_SCALE);
    assert_relative_eq!(runs[1].vertical_offset_scale, SUBSCRIPT_OFFSET_SCALE);
    assert_eq!(runs[2].text, "O");
    assert_eq!(runs[2].kind, MathTextRunKind::Regular);
}

#[test]
fn regular_text_resumes_after_subscript_width() {
    let mut ctx = RecordingRenderContext::new();
    let layout = layout_math_text(&mut ctx, "H_{2}O", &font());

    let h = &layout.runs[0];
    let sub = &layout.runs[1];
    let o = &layout.runs[2];
    assert_relative_eq!(h.offset.x, 0.0);
    assert_relative_eq!(sub.offset.x, h.size.width);
    assert_relative_eq!(sub.offset.y, 6.0, epsilon = 1e-12);
    assert_relative_eq!(sub.font.size, 6.2, epsilon = 1e-12);
    assert_relative_eq!(o.offset.x, h.size.width + sub.size.width, epsilon = 1e-12);
    assert_relative_eq!(layout.size.width, o.offset.x + o.size.width, epsilon = 1e-12);
}

#[test]
fn drawing_emits_one_text_per_run() {
    let mut ctx = RecordingRenderContext::new();
    let text = TextPrimitive::new("H_{2}O", ScreenPoint::new(100.0, 50.0), Color::BLACK, font())
        .with_alignment(HorizontalAlignment::Left, VerticalAlignment::Top);
    draw_math_text(&mut ctx, &text);

    let texts: Vec<_> = ctx.frame().texts().collect();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0].anchor, ScreenPoint::new(100.0, 50.0));
    assert_relative_eq!(texts[1].anchor.y, 56.0, epsilon = 1e-12);
    assert!(texts[2].anchor.x > texts[1].anchor.x);
}

#[test]
fn rotated_runs_turn_around_the_anchor() {
    let mut ctx = RecordingRenderContext::new();
    let text = TextPrimitive::new("x^{2}", ScreenPoint::new(0.0, 0.0), Color::BLACK, font())
        .with_rotation(90.0);
    draw_math_text(&mut ctx, &text);

    let texts: Vec<_> = ctx.frame().texts().collect();
    assert_eq!(texts.len(), 2);
    assert!(texts.iter().all(|t| t.rotation == 90.0));
    // The superscript sits 6px right of the anchor before rotation.
    assert_relative_eq!(texts[1].anchor.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(texts[1].anchor.y, 6.0, epsilon = 1e-9);
}

#[test]
fn plain_text_measures_like_the_surface() {
    let mut ctx = RecordingRenderContext::new();
    for text in ["", "value", "two\nlines", "a^b"] {
        let math = measure_math_text(&mut ctx, text, &font(), None);
        let plain = ctx.measure_text(text, &font());
        assert_eq!(math, plain, "{text:?}");
    }
}

#[test]
fn plain_text_is_forwarded_unchanged() {
    let mut ctx = RecordingRenderContext::new();
    let text = TextPrimitive::new("label", ScreenPoint::new(3.0, 4.0), Color::BLACK, font())
        .with_alignment(HorizontalAlignment::Center, VerticalAlignment::Middle);
    draw_math_text(&mut ctx, &text);
    let texts: Vec<_> = ctx.frame().texts().collect();
    assert_eq!(texts, vec![&text]);
}

#[test]
fn rotated_measurement_swaps_extent() {
    let mut ctx = RecordingRenderContext::new();
    let upright = measure_math_text(&mut ctx, "abc", &font(), None);
    let turned = measure_math_text(&mut ctx, "abc", &font(), Some(90.0));
    assert_relative_eq!(turned.width, upright.height, epsilon = 1e-9);
    assert_relative_eq!(turned.height, upright.width, epsilon = 1e-9);
}
