//! Cohen-Sutherland line clipping and Sutherland-Hodgman polygon clipping
//! against an axis-aligned window.
//!
//! The window is expressed in raw coordinates so the same code clips data
//! points (against the axes' actual ranges) and screen points (against clip
//! rectangles).

use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, ScreenPoint, ScreenRect};

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

/// Closed rectangular clipping window `[min_x, max_x] x [min_y, max_y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipWindow {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl ClipWindow {
    /// Builds a window, ordering each pair of bounds.
    #[must_use]
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            max_x: x0.max(x1),
            min_y: y0.min(y1),
            max_y: y0.max(y1),
        }
    }

    #[must_use]
    pub fn from_rect(rect: ScreenRect) -> Self {
        Self::new(rect.left, rect.right(), rect.top, rect.bottom())
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        self.outcode(x, y) == INSIDE
    }

    #[must_use]
    pub fn contains_data(self, point: DataPoint) -> bool {
        self.contains(point.x, point.y)
    }

    fn outcode(self, x: f64, y: f64) -> u8 {
        let mut code = INSIDE;
        if x < self.min_x {
            code |= LEFT;
        } else if x > self.max_x {
            code |= RIGHT;
        }
        if y < self.min_y {
            code |= BOTTOM;
        } else if y > self.max_y {
            code |= TOP;
        }
        code
    }

    /// Clips the segment `(x0, y0) - (x1, y1)`.
    ///
    /// Returns `None` when the segment lies entirely outside the window.
    #[must_use]
    pub fn clip_segment(
        self,
        mut x0: f64,
        mut y0: f64,
        mut x1: f64,
        mut y1: f64,
    ) -> Option<(f64, f64, f64, f64)> {
        let mut code0 = self.outcode(x0, y0);
        let mut code1 = self.outcode(x1, y1);

        // Each round moves one endpoint onto a window edge; the bound only
        // guards against rounding ping-pong on the edges.
        for _ in 0..8 {
            if code0 | code1 == INSIDE {
                return Some((x0, y0, x1, y1));
            }
            if code0 & code1 != INSIDE {
                return None;
            }

            let code_out = if code0 != INSIDE { code0 } else { code1 };
            let (x, y) = if code_out & TOP != 0 {
                (x0 + (x1 - x0) * (self.max_y - y0) / (y1 - y0), self.max_y)
            } else if code_out & BOTTOM != 0 {
                (x0 + (x1 - x0) * (self.min_y - y0) / (y1 - y0), self.min_y)
            } else if code_out & RIGHT != 0 {
                (self.max_x, y0 + (y1 - y0) * (self.max_x - x0) / (x1 - x0))
            } else {
                (self.min_x, y0 + (y1 - y0) * (self.min_x - x0) / (x1 - x0))
            };

            if code_out == code0 {
                x0 = x;
                y0 = y;
                code0 = self.outcode(x0, y0);
            } else {
                x1 = x;
                y1 = y;
                code1 = self.outcode(x1, y1);
            }
        }

        if code0 | code1 == INSIDE {
            Some((x0, y0, x1, y1))
        } else {
            None
        }
    }

    #[must_use]
    pub fn clip_data_segment(self, a: DataPoint, b: DataPoint) -> Option<(DataPoint, DataPoint)> {
        self.clip_segment(a.x, a.y, b.x, b.y)
            .map(|(x0, y0, x1, y1)| (DataPoint::new(x0, y0), DataPoint::new(x1, y1)))
    }

    #[must_use]
    pub fn clip_screen_segment(
        self,
        a: ScreenPoint,
        b: ScreenPoint,
    ) -> Option<(ScreenPoint, ScreenPoint)> {
        self.clip_segment(a.x, a.y, b.x, b.y)
            .map(|(x0, y0, x1, y1)| (ScreenPoint::new(x0, y0), ScreenPoint::new(x1, y1)))
    }

    /// Clips a closed polygon (Sutherland-Hodgman). The result may be empty.
    #[must_use]
    pub fn clip_polygon(self, points: &[ScreenPoint]) -> Vec<ScreenPoint> {
        let mut output: Vec<ScreenPoint> = points.to_vec();
        for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
            if output.is_empty() {
                break;
            }
            let input = std::mem::take(&mut output);
            let mut previous = input[input.len() - 1];
            for &current in &input {
                let current_inside = self.inside_edge(edge, current);
                let previous_inside = self.inside_edge(edge, previous);
                if current_inside {
                    if !previous_inside {
                        output.push(self.edge_intersection(edge, previous, current));
                    }
                    output.push(current);
                } else if previous_inside {
                    output.push(self.edge_intersection(edge, previous, current));
                }
                previous = current;
            }
        }
        output
    }

    fn inside_edge(self, edge: Edge, point: ScreenPoint) -> bool {
        match edge {
            Edge::Left => point.x >= self.min_x,
            Edge::Right => point.x <= self.max_x,
            Edge::Top => point.y >= self.min_y,
            Edge::Bottom => point.y <= self.max_y,
        }
    }

    fn edge_intersection(self, edge: Edge, a: ScreenPoint, b: ScreenPoint) -> ScreenPoint {
        match edge {
            Edge::Left => {
                ScreenPoint::new(self.min_x, a.y + (b.y - a.y) * (self.min_x - a.x) / (b.x - a.x))
            }
            Edge::Right => {
                ScreenPoint::new(self.max_x, a.y + (b.y - a.y) * (self.max_x - a.x) / (b.x - a.x))
            }
            Edge::Top => {
                ScreenPoint::new(a.x + (b.x - a.x) * (self.min_y - a.y) / (b.y - a.y), self.min_y)
            }
            Edge::Bottom => {
                ScreenPoint::new(a.x + (b.x - a.x) * (self.max_y - a.y) / (b.y - a.y), self.max_y)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_inside_is_unchanged() {
        let window = ClipWindow::new(0.0, 10.0, 0.0, 10.0);
        assert_eq!(
            window.clip_segment(2.0, 2.0, 8.0, 8.0),
            Some((2.0, 2.0, 8.0, 8.0))
        );
    }

    #[test]
    fn segment_outside_is_rejected() {
        let window = ClipWindow::new(0.0, 10.0, 0.0, 10.0);
        assert_eq!(window.clip_segment(-5.0, -1.0, -1.0, -5.0), None);
        assert_eq!(window.clip_segment(11.0, 0.0, 12.0, 10.0), None);
    }

    #[test]
    fn segment_spanning_window_is_clipped_on_both_ends() {
        let window = ClipWindow::new(0.0, 10.0, 0.0, 10.0);
        let (x0, y0, x1, y1) = window
            .clip_segment(-5.0, 5.0, 15.0, 5.0)
            .expect("crosses the window");
        assert_eq!((x0, y0, x1, y1), (0.0, 5.0, 10.0, 5.0));
    }

    #[test]
    fn polygon_clip_keeps_inner_part() {
        let window = ClipWindow::new(0.0, 10.0, 0.0, 10.0);
        let square = [
            ScreenPoint::new(-5.0, -5.0),
            ScreenPoint::new(5.0, -5.0),
            ScreenPoint::new(5.0, 5.0),
            ScreenPoint::new(-5.0, 5.0),
        ];
        let clipped = window.clip_polygon(&square);
        assert_eq!(clipped.len(), 4);
        for point in clipped {
            assert!(window.contains(point.x, point.y));
        }
    }
}
