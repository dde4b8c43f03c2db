use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::core::{ScreenPoint, ScreenRect};
use crate::render::{Color, Pen, RenderContext};

const TAN_30: f64 = 0.577_350_269_189_625_8;
const SIN_45: f64 = std::f64::consts::FRAC_1_SQRT_2;
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Marker glyph drawn at data points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkerType {
    #[default]
    None,
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
    Plus,
    Star,
    /// Closed outline in units of the marker size, relative to the point.
    Custom(Vec<ScreenPoint>),
}

impl MarkerType {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Vertices of one polygon marker.
pub type MarkerOutline = SmallVec<[ScreenPoint; 4]>;

#[must_use]
pub fn diamond(center: ScreenPoint, size: f64) -> MarkerOutline {
    let m = SQRT_2 * size;
    SmallVec::from_buf([
        ScreenPoint::new(center.x, center.y - m),
        ScreenPoint::new(center.x + m, center.y),
        ScreenPoint::new(center.x, center.y + m),
        ScreenPoint::new(center.x - m, center.y),
    ])
}

#[must_use]
pub fn triangle(center: ScreenPoint, size: f64) -> MarkerOutline {
    let base = center.y + TAN_30 * size;
    let apex = center.y - size * (1.0 + TAN_30 * TAN_30).sqrt();
    SmallVec::from_slice(&[
        ScreenPoint::new(center.x - size, base),
        ScreenPoint::new(center.x + size, base),
        ScreenPoint::new(center.x, apex),
    ])
}

fn push_plus(out: &mut Vec<ScreenPoint>, center: ScreenPoint, size: f64) {
    out.extend([
        ScreenPoint::new(center.x - size, center.y),
        ScreenPoint::new(center.x + size, center.y),
        ScreenPoint::new(center.x, center.y - size),
        ScreenPoint::new(center.x, center.y + size),
    ]);
}

fn push_cross(out: &mut Vec<ScreenPoint>, center: ScreenPoint, size: f64) {
    let d = size * SIN_45;
    out.extend([
        ScreenPoint::new(center.x - d, center.y - d),
        ScreenPoint::new(center.x + d, center.y + d),
        ScreenPoint::new(center.x - d, center.y + d),
        ScreenPoint::new(center.x + d, center.y - d),
    ]);
}

fn bounding_square(center: ScreenPoint, size: f64) -> ScreenRect {
    ScreenRect::new(center.x - size, center.y - size, size * 2.0, size * 2.0)
}

/// Draws `marker` at every point, one batched call per primitive kind.
///
/// Line-only markers (plus, cross, star) need a stroke; without one they
/// fall back to a 1px pen in the fill color. Unusable custom outlines are
/// skipped.
pub fn render_markers<C: RenderContext + ?Sized>(
    ctx: &mut C,
    points: &[ScreenPoint],
    marker: &MarkerType,
    size: f64,
    fill: Color,
    stroke: Option<&Pen>,
) {
    if points.is_empty() || !size.is_finite() || size <= 0.0 {
        return;
    }

    match marker {
        MarkerType::None => {}
        MarkerType::Circle => {
            let rects: Vec<ScreenRect> = points.iter().map(|p| bounding_square(*p, size)).collect();
            ctx.draw_ellipses(&rects, fill, stroke);
        }
        MarkerType::Square => {
            let rects: Vec<ScreenRect> = points.iter().map(|p| bounding_square(*p, size)).collect();
            ctx.draw_rectangles(&rects, fill, stroke);
        }
        MarkerType::Diamond => {
            let polygons: Vec<Vec<ScreenPoint>> =
                points.iter().map(|p| diamond(*p, size).to_vec()).collect();
            ctx.draw_polygons(&polygons, fill, stroke);
        }
        MarkerType::Triangle => {
            let polygons: Vec<Vec<ScreenPoint>> =
                points.iter().map(|p| triangle(*p, size).to_vec()).collect();
            ctx.draw_polygons(&polygons, fill, stroke);
        }
        MarkerType::Plus | MarkerType::Cross | MarkerType::Star => {
            let fallback;
            let pen = match stroke {
                Some(pen) => pen,
                None => {
                    fallback = Pen::solid(fill, 1.0);
                    &fallback
                }
            };
            let mut segments = Vec::with_capacity(points.len() * 8);
            for &point in points {
                if matches!(marker, MarkerType::Plus | MarkerType::Star) {
                    push_plus(&mut segments, point, size);
                }
                if matches!(marker, MarkerType::Cross | MarkerType::Star) {
                    push_cross(&mut segments, point, size);
                }
            }
            ctx.draw_line_segments(&segments, pen);
        }
        MarkerType::Custom(outline) => {
            let usable = outline.len() >= 3 && outline.iter().all(|p| p.is_finite());
            if !usable {
                warn!(vertices = outline.len(), "custom marker outline unusable, markers skipped");
                return;
            }
            let polygons: Vec<Vec<ScreenPoint>> = points
                .iter()
                .map(|center| {
                    outline
                        .iter()
                        .map(|o| ScreenPoint::new(center.x + o.x * size, center.y + o.y * size))
                        .collect()
                })
                .collect();
            ctx.draw_polygons(&polygons, fill, stroke);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderContext;

    #[test]
    fn triangle_is_centered_on_point() {
        let outline = triangle(ScreenPoint::new(0.0, 0.0), 3.0);
        let centroid_y: f64 = outline.iter().map(|p| p.y).sum::<f64>() / 3.0;
        assert!(centroid_y.abs() < 1e-9);
    }

    #[test]
    fn star_draws_both_line_pairs_in_one_batch() {
        let mut ctx = RecordingRenderContext::new();
        let points = [ScreenPoint::new(5.0, 5.0), ScreenPoint::new(10.0, 10.0)];
        render_markers(&mut ctx, &points, &MarkerType::Star, 2.0, Color::BLACK, None);
        let batches: Vec<_> = ctx.frame().segment_batches().collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].0.len(), 16);
    }

    #[test]
    fn degenerate_custom_outline_is_skipped() {
        let mut ctx = RecordingRenderContext::new();
        let outline = MarkerType::Custom(vec![ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1.0, 0.0)]);
        render_markers(&mut ctx, &[ScreenPoint::new(1.0, 1.0)], &outline, 3.0, Color::BLACK, None);
        assert!(ctx.frame().is_empty());
    }
}
