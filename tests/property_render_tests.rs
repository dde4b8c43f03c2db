use plot_rs::core::ScreenRect;
use plot_rs::render::math_text::measure_math_text;
use plot_rs::render::{FontSpec, RecordingRenderContext, RenderContext};
use proptest::prelude::*;

proptest! {
    #[test]
    fn plain_text_measures_like_the_surface(text in "[a-zA-Z0-9 .,:-]{0,24}", size in 4.0..40.0_f64) {
        let mut ctx = RecordingRenderContext::new();
        let font = FontSpec::default().with_size(size);
        let math = measure_math_text(&mut ctx, &text, &font, None);
        let plain = ctx.measure_text(&text, &font);
        prop_assert_eq!(math, plain);
    }

    #[test]
    fn balanced_push_pop_leaves_no_clip(
        rects in prop::collection::vec((0.0..100.0_f64, 0.0..100.0_f64, 0.0..100.0_f64, 0.0..100.0_f64), 1..10),
    ) {
        let mut ctx = RecordingRenderContext::new();
        for &(left, top, width, height) in &rects {
            ctx.push_clip(ScreenRect::new(left, top, width, height));
        }
        prop_assert_eq!(ctx.clip_stack().depth(), rects.len());
        for _ in &rects {
            prop_assert!(ctx.pop_clip().is_ok());
        }
        prop_assert!(ctx.clip_stack().current().is_none());
        prop_assert!(ctx.pop_clip().is_err());
        prop_assert!(ctx.frame().validate().is_ok());
    }

    #[test]
    fn nested_clip_stays_within_its_parent(
        outer in (0.0..50.0_f64, 0.0..50.0_f64, 1.0..100.0_f64, 1.0..100.0_f64),
        inner in (0.0..100.0_f64, 0.0..100.0_f64, 1.0..100.0_f64, 1.0..100.0_f64),
    ) {
        let mut ctx = RecordingRenderContext::new();
        let parent = ScreenRect::new(outer.0, outer.1, outer.2, outer.3);
        ctx.push_clip(parent);
        ctx.push_clip(ScreenRect::new(inner.0, inner.1, inner.2, inner.3));
        let current = ctx.clip_stack().current();
        prop_assert!(current.is_some());
        if let Some(current) = current.filter(|rect| !rect.is_empty()) {
            prop_assert!(current.left >= parent.left - 1e-9);
            prop_assert!(current.top >= parent.top - 1e-9);
            prop_assert!(current.right() <= parent.right() + 1e-9);
            prop_assert!(current.bottom() <= parent.bottom() + 1e-9);
        }
    }
}
