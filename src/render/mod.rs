mod cache;
mod clipping_context;
mod frame;
pub mod markers;
pub mod math_text;
mod pen;
mod primitives;
mod recording;

pub use cache::{ResourceCache, ResourceCacheStats};
pub use clipping_context::{ClipStack, ClippingRenderContext};
pub use frame::{DrawCommand, RenderFrame};
pub use markers::MarkerType;
pub use pen::{DashArray, LineJoin, LineStyle, Pen, PenKey};
pub use primitives::{
    BOLD_FONT_WEIGHT, Color, DEFAULT_FONT_SIZE, FontSpec, HorizontalAlignment, NORMAL_FONT_WEIGHT,
    PlotImage, TextPrimitive, VerticalAlignment,
};
pub use recording::RecordingRenderContext;

use crate::core::{ScreenPoint, ScreenRect, Size};
use crate::error::PlotResult;

/// Drawing surface contract implemented by toolkit adapters.
///
/// Implementors provide the primitive subset (`draw_line`, `draw_polygon`,
/// `draw_ellipse`, `draw_text`, `measure_text`, `push_clip`, `pop_clip`);
/// the batched and composite operations default to loops over it. Surfaces
/// with native batching override them.
pub trait RenderContext {
    /// Draws an open polyline.
    fn draw_line(&mut self, points: &[ScreenPoint], pen: &Pen);

    /// Draws a closed polygon; `stroke` is optional.
    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: Option<&Pen>);

    /// Draws the ellipse inscribed in `rect`.
    fn draw_ellipse(&mut self, rect: ScreenRect, fill: Color, stroke: Option<&Pen>);

    fn draw_text(&mut self, text: &TextPrimitive);

    /// Size of `text` rendered unrotated with `font`.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Size;

    /// Intersects the current clip region with `rect`.
    fn push_clip(&mut self, rect: ScreenRect);

    /// Restores the clip region in effect before the matching `push_clip`.
    ///
    /// Fails with [`crate::PlotError::UnbalancedClip`] when nothing is pushed.
    fn pop_clip(&mut self) -> PlotResult<()>;

    /// Draws independent segments given as consecutive point pairs.
    /// A trailing odd point is ignored.
    fn draw_line_segments(&mut self, points: &[ScreenPoint], pen: &Pen) {
        for pair in points.chunks_exact(2) {
            self.draw_line(pair, pen);
        }
    }

    fn draw_polygons(&mut self, polygons: &[Vec<ScreenPoint>], fill: Color, stroke: Option<&Pen>) {
        for polygon in polygons {
            self.draw_polygon(polygon, fill, stroke);
        }
    }

    fn draw_rectangle(&mut self, rect: ScreenRect, fill: Color, stroke: Option<&Pen>) {
        self.draw_polygon(&rect.corners(), fill, stroke);
    }

    fn draw_rectangles(&mut self, rects: &[ScreenRect], fill: Color, stroke: Option<&Pen>) {
        for &rect in rects {
            self.draw_rectangle(rect, fill, stroke);
        }
    }

    fn draw_ellipses(&mut self, rects: &[ScreenRect], fill: Color, stroke: Option<&Pen>) {
        for &rect in rects {
            self.draw_ellipse(rect, fill, stroke);
        }
    }

    /// Draws the `source` region of `image` into `destination`.
    /// Surfaces without bitmap support ignore it.
    fn draw_image(
        &mut self,
        _image: &PlotImage,
        _source: ScreenRect,
        _destination: ScreenRect,
        _opacity: f64,
    ) {
    }

    /// Sets the tooltip for subsequently drawn elements.
    fn set_tool_tip(&mut self, _text: Option<&str>) {}

    /// Font used when a requested font is unusable.
    fn default_font(&self) -> FontSpec {
        FontSpec::default()
    }

    /// Releases surface resources not used since the previous call.
    /// Called once at the end of a render pass; must be idempotent.
    fn clean_up(&mut self) {}
}

impl<T: RenderContext + ?Sized> RenderContext for &mut T {
    fn draw_line(&mut self, points: &[ScreenPoint], pen: &Pen) {
        (**self).draw_line(points, pen);
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: Option<&Pen>) {
        (**self).draw_polygon(points, fill, stroke);
    }

    fn draw_ellipse(&mut self, rect: ScreenRect, fill: Color, stroke: Option<&Pen>) {
        (**self).draw_ellipse(rect, fill, stroke);
    }

    fn draw_text(&mut self, text: &TextPrimitive) {
        (**self).draw_text(text);
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Size {
        (**self).measure_text(text, font)
    }

    fn push_clip(&mut self, rect: ScreenRect) {
        (**self).push_clip(rect);
    }

    fn pop_clip(&mut self) -> PlotResult<()> {
        (**self).pop_clip()
    }

    fn draw_line_segments(&mut self, points: &[ScreenPoint], pen: &Pen) {
        (**self).draw_line_segments(points, pen);
    }

    fn draw_polygons(&mut self, polygons: &[Vec<ScreenPoint>], fill: Color, stroke: Option<&Pen>) {
        (**self).draw_polygons(polygons, fill, stroke);
    }

    fn draw_rectangle(&mut self, rect: ScreenRect, fill: Color, stroke: Option<&Pen>) {
        (**self).draw_rectangle(rect, fill, stroke);
    }

    fn draw_rectangles(&mut self, rects: &[ScreenRect], fill: Color, stroke: Option<&Pen>) {
        (**self).draw_rectangles(rects, fill, stroke);
    }

    fn draw_ellipses(&mut self, rects: &[ScreenRect], fill: Color, stroke: Option<&Pen>) {
        (**self).draw_ellipses(rects, fill, stroke);
    }

    fn draw_image(
        &mut self,
        image: &PlotImage,
        source: ScreenRect,
        destination: ScreenRect,
        opacity: f64,
    ) {
        (**self).draw_image(image, source, destination, opacity);
    }

    fn set_tool_tip(&mut self, text: Option<&str>) {
        (**self).set_tool_tip(text);
    }

    fn default_font(&self) -> FontSpec {
        (**self).default_font()
    }

    fn clean_up(&mut self) {
        (**self).clean_up();
    }
}
