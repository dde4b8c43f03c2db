use tracing::trace;

use crate::core::{ClipWindow, ScreenPoint, ScreenRect, Size};
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, FontSpec, Pen, PlotImage, RenderContext, TextPrimitive};

/// Nested clip regions. The top is always the intersection of every pushed
/// rectangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipStack {
    stack: Vec<ScreenRect>,
}

impl ClipStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `rect` intersected with the current region; returns the new region.
    pub fn push(&mut self, rect: ScreenRect) -> ScreenRect {
        let effective = match self.stack.last() {
            Some(current) => current.intersect(rect),
            None => rect,
        };
        self.stack.push(effective);
        effective
    }

    /// Restores the previous region, which is returned (`None` = unclipped).
    pub fn pop(&mut self) -> PlotResult<Option<ScreenRect>> {
        if self.stack.pop().is_none() {
            return Err(PlotError::UnbalancedClip {
                operation: "pop_clip",
            });
        }
        Ok(self.current())
    }

    #[must_use]
    pub fn current(&self) -> Option<ScreenRect> {
        self.stack.last().copied()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// Render-context decorator clipping every primitive in software against a
/// [`ClipStack`], for surfaces without native clipping.
///
/// Lines and polygons are cut geometrically; rectangles are intersected;
/// ellipses and images are dropped only when entirely outside; text is kept
/// when its anchor lies inside the region.
#[derive(Debug)]
pub struct ClippingRenderContext<C> {
    inner: C,
    clips: ClipStack,
}

impl<C: RenderContext> ClippingRenderContext<C> {
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            clips: ClipStack::new(),
        }
    }

    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> C {
        self.inner
    }

    #[must_use]
    pub fn clip_stack(&self) -> &ClipStack {
        &self.clips
    }

    fn window(&self) -> Option<ClipWindow> {
        self.clips.current().map(ClipWindow::from_rect)
    }

    fn clip_rect(&self, rect: ScreenRect) -> Option<ScreenRect> {
        match self.clips.current() {
            None => Some(rect),
            Some(clip) if clip.intersects(rect) => Some(clip.intersect(rect)),
            Some(_) => None,
        }
    }
}

impl<C: RenderContext> RenderContext for ClippingRenderContext<C> {
    fn draw_line(&mut self, points: &[ScreenPoint], pen: &Pen) {
        let Some(window) = self.window() else {
            self.inner.draw_line(points, pen);
            return;
        };

        let mut run: Vec<ScreenPoint> = Vec::new();
        for pair in points.windows(2) {
            match window.clip_screen_segment(pair[0], pair[1]) {
                Some((start, end)) => {
                    if run.last() != Some(&start) {
                        if run.len() > 1 {
                            self.inner.draw_line(&run, pen);
                        }
                        run.clear();
                        run.push(start);
                    }
                    run.push(end);
                }
                None => {
                    if run.len() > 1 {
                        self.inner.draw_line(&run, pen);
                    }
                    run.clear();
                }
            }
        }
        if run.len() > 1 {
            self.inner.draw_line(&run, pen);
        }
    }

    fn draw_line_segments(&mut self, points: &[ScreenPoint], pen: &Pen) {
        let Some(window) = self.window() else {
            self.inner.draw_line_segments(points, pen);
            return;
        };
        let clipped: Vec<ScreenPoint> = points
            .chunks_exact(2)
            .filter_map(|pair| window.clip_screen_segment(pair[0], pair[1]))
            .flat_map(|(start, end)| [start, end])
            .collect();
        if !clipped.is_empty() {
            self.inner.draw_line_segments(&clipped, pen);
        }
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: Option<&Pen>) {
        let Some(window) = self.window() else {
            self.inner.draw_polygon(points, fill, stroke);
            return;
        };
        let clipped = window.clip_polygon(points);
        if clipped.len() >= 3 {
            self.inner.draw_polygon(&clipped, fill, stroke);
        } else {
            trace!(vertices = points.len(), "polygon clipped away");
        }
    }

    fn draw_rectangle(&mut self, rect: ScreenRect, fill: Color, stroke: Option<&Pen>) {
        if let Some(rect) = self.clip_rect(rect) {
            self.inner.draw_rectangle(rect, fill, stroke);
        }
    }

    fn draw_ellipse(&mut self, rect: ScreenRect, fill: Color, stroke: Option<&Pen>) {
        if self.clip_rect(rect).is_some() {
            self.inner.draw_ellipse(rect, fill, stroke);
        }
    }

    fn draw_ellipses(&mut self, rects: &[ScreenRect], fill: Color, stroke: Option<&Pen>) {
        let visible: Vec<ScreenRect> = rects
            .iter()
            .copied()
            .filter(|rect| self.clip_rect(*rect).is_some())
            .collect();
        if !visible.is_empty() {
            self.inner.draw_ellipses(&visible, fill, stroke);
        }
    }

    fn draw_text(&mut self, text: &TextPrimitive) {
        let visible = self
            .clips
            .current()
            .is_none_or(|clip| clip.contains(text.anchor));
        if visible {
            self.inner.draw_text(text);
        }
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Size {
        self.inner.measure_text(text, font)
    }

    fn draw_image(
        &mut self,
        image: &PlotImage,
        source: ScreenRect,
        destination: ScreenRect,
        opacity: f64,
    ) {
        if self.clip_rect(destination).is_some() {
            self.inner.draw_image(image, source, destination, opacity);
        }
    }

    fn set_tool_tip(&mut self, text: Option<&str>) {
        self.inner.set_tool_tip(text);
    }

    fn push_clip(&mut self, rect: ScreenRect) {
        self.clips.push(rect);
    }

    fn pop_clip(&mut self) -> PlotResult<()> {
        self.clips.pop().map(|_| ())
    }

    fn default_font(&self) -> FontSpec {
        self.inner.default_font()
    }

    fn clean_up(&mut self) {
        self.inner.clean_up();
    }
}
