use tracing::debug;

use crate::core::{ScreenPoint, ScreenRect, Size};
use crate::error::PlotResult;
use crate::render::{
    ClipStack, Color, DrawCommand, FontSpec, Pen, PenKey, PlotImage, RenderContext, RenderFrame,
    ResourceCache, ResourceCacheStats, TextPrimitive,
};

/// Average glyph advance relative to the font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Line height relative to the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Headless render context that records every call into a [`RenderFrame`].
///
/// Text is measured with a fixed-advance approximation so layouts are
/// deterministic. Pens are interned in a [`ResourceCache`], mirroring how a
/// real surface keeps native stroke objects between passes.
#[derive(Debug)]
pub struct RecordingRenderContext {
    frame: RenderFrame,
    clips: ClipStack,
    pens: ResourceCache<PenKey, Pen>,
    default_font: FontSpec,
}

impl Default for RecordingRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRenderContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame: RenderFrame::new(),
            clips: ClipStack::new(),
            pens: ResourceCache::new(),
            default_font: FontSpec::default(),
        }
    }

    #[must_use]
    pub fn with_default_font(mut self, font: FontSpec) -> Self {
        self.default_font = font;
        self
    }

    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    /// Hands out the recorded frame and starts a new one.
    pub fn take_frame(&mut self) -> RenderFrame {
        std::mem::take(&mut self.frame)
    }

    #[must_use]
    pub fn clip_stack(&self) -> &ClipStack {
        &self.clips
    }

    #[must_use]
    pub fn pen_cache_stats(&self) -> ResourceCacheStats {
        self.pens.stats()
    }

    fn intern(&mut self, pen: &Pen) -> Pen {
        self.pens
            .get_or_insert_with(pen.cache_key(), || pen.clone())
            .clone()
    }

    fn resolve_font(&self, font: &FontSpec) -> FontSpec {
        if font.is_valid() {
            font.clone()
        } else {
            debug!(size = font.size, "unusable font replaced by surface default");
            font.resolved(&self.default_font)
        }
    }
}

/// Fixed-advance text extent used by [`RecordingRenderContext`].
#[must_use]
pub fn approximate_text_size(text: &str, font_size: f64) -> Size {
    if text.is_empty() {
        return Size::EMPTY;
    }
    let mut lines = 0_usize;
    let mut widest = 0_usize;
    for line in text.split('\n') {
        lines += 1;
        widest = widest.max(line.chars().count());
    }
    Size::new(
        widest as f64 * font_size * CHAR_WIDTH_FACTOR,
        lines as f64 * font_size * LINE_HEIGHT_FACTOR,
    )
}

impl RenderContext for RecordingRenderContext {
    fn draw_line(&mut self, points: &[ScreenPoint], pen: &Pen) {
        if points.len() < 2 {
            return;
        }
        let pen = self.intern(pen);
        self.frame.push(DrawCommand::Line {
            points: points.to_vec(),
            pen,
        });
    }

    fn draw_line_segments(&mut self, points: &[ScreenPoint], pen: &Pen) {
        let even = points.len() - points.len() % 2;
        if even == 0 {
            return;
        }
        let pen = self.intern(pen);
        self.frame.push(DrawCommand::LineSegments {
            points: points[..even].to_vec(),
            pen,
        });
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: Option<&Pen>) {
        if points.len() < 3 {
            return;
        }
        let stroke = stroke.map(|pen| self.intern(pen));
        self.frame.push(DrawCommand::Polygon {
            points: points.to_vec(),
            fill,
            stroke,
        });
    }

    fn draw_ellipse(&mut self, rect: ScreenRect, fill: Color, stroke: Option<&Pen>) {
        let stroke = stroke.map(|pen| self.intern(pen));
        self.frame.push(DrawCommand::Ellipse { rect, fill, stroke });
    }

    fn draw_text(&mut self, text: &TextPrimitive) {
        if text.text.is_empty() {
            return;
        }
        let mut text = text.clone();
        text.font = self.resolve_font(&text.font);
        self.frame.push(DrawCommand::Text(text));
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Size {
        let font = self.resolve_font(font);
        approximate_text_size(text, font.size)
    }

    fn push_clip(&mut self, rect: ScreenRect) {
        self.clips.push(rect);
        self.frame.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) -> PlotResult<()> {
        self.clips.pop()?;
        self.frame.push(DrawCommand::PopClip);
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &PlotImage,
        source: ScreenRect,
        destination: ScreenRect,
        opacity: f64,
    ) {
        self.frame.push(DrawCommand::Image {
            width: image.width,
            height: image.height,
            source,
            destination,
            opacity,
        });
    }

    fn set_tool_tip(&mut self, text: Option<&str>) {
        self.frame.push(DrawCommand::ToolTip(text.map(str::to_owned)));
    }

    fn default_font(&self) -> FontSpec {
        self.default_font.clone()
    }

    fn clean_up(&mut self) {
        self.pens.clean_up();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_uses_fixed_advance() {
        let mut ctx = RecordingRenderContext::new();
        let size = ctx.measure_text("abcd", &FontSpec::default().with_size(10.0));
        assert!((size.width - 24.0).abs() < 1e-9);
        assert!((size.height - 12.0).abs() < 1e-9);
    }

    #[test]
    fn pens_are_interned_between_passes() {
        let mut ctx = RecordingRenderContext::new();
        let pen = Pen::solid(Color::BLACK, 1.0);
        let line = [ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1.0, 1.0)];
        ctx.draw_line(&line, &pen);
        ctx.draw_line(&line, &pen);
        ctx.clean_up();
        let stats = ctx.pen_cache_stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));

        ctx.clean_up();
        ctx.draw_line(&line, &Pen::solid(Color::WHITE, 1.0));
        ctx.clean_up();
        assert_eq!(ctx.pen_cache_stats().size, 1);
    }

    #[test]
    fn unbalanced_pop_fails() {
        let mut ctx = RecordingRenderContext::new();
        assert!(ctx.pop_clip().is_err());
        ctx.push_clip(ScreenRect::new(0.0, 0.0, 1.0, 1.0));
        assert!(ctx.pop_clip().is_ok());
        assert!(ctx.frame().validate().is_ok());
    }
}
