use crate::core::ScreenPoint;

/// Tension used for smoothed line and area series.
pub const DEFAULT_SPLINE_TENSION: f64 = 0.5;

/// Maximum distance (in pixels, Manhattan) between interpolated points.
pub const DEFAULT_SPLINE_TOLERANCE: f64 = 0.25;

const MAX_STEPS_PER_SEGMENT: usize = 4096;

/// Interpolates an open canonical (cardinal) spline through `points`.
///
/// The output starts with the first input point and passes through every
/// input point. Each segment is subdivided so that consecutive output points
/// are roughly `tolerance` pixels apart.
#[must_use]
pub fn canonical_spline(points: &[ScreenPoint], tension: f64, tolerance: f64) -> Vec<ScreenPoint> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        DEFAULT_SPLINE_TOLERANCE
    };

    let mut result = Vec::with_capacity(n * 4);
    result.push(points[0]);
    for i in 0..n - 1 {
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 < n { points[i + 2] } else { points[i + 1] };
        segment(&mut result, [p0, p1, p2, p3], tension, tolerance);
    }
    result
}

/// Appends the interpolated points of one segment (excluding `p1`, including `p2`).
fn segment(out: &mut Vec<ScreenPoint>, control: [ScreenPoint; 4], tension: f64, tolerance: f64) {
    let [p0, p1, p2, p3] = control;
    let sx1 = tension * (p2.x - p0.x);
    let sy1 = tension * (p2.y - p0.y);
    let sx2 = tension * (p3.x - p1.x);
    let sy2 = tension * (p3.y - p1.y);

    let ax = sx1 + sx2 + 2.0 * p1.x - 2.0 * p2.x;
    let ay = sy1 + sy2 + 2.0 * p1.y - 2.0 * p2.y;
    let bx = -2.0 * sx1 - sx2 - 3.0 * p1.x + 3.0 * p2.x;
    let by = -2.0 * sy1 - sy2 - 3.0 * p1.y + 3.0 * p2.y;
    let cx = sx1;
    let cy = sy1;
    let dx = p1.x;
    let dy = p1.y;

    let manhattan = (p1.x - p2.x).abs() + (p1.y - p2.y).abs();
    let steps = (manhattan / tolerance).floor();
    let steps = if steps.is_finite() {
        (steps as usize).min(MAX_STEPS_PER_SEGMENT)
    } else {
        0
    };

    for i in 1..steps {
        let t = i as f64 / steps as f64;
        let t2 = t * t;
        let t3 = t2 * t;
        out.push(ScreenPoint::new(
            ax * t3 + bx * t2 + cx * t + dx,
            ay * t3 + by * t2 + cy * t + dy,
        ));
    }
    out.push(p2);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_passes_through_control_points() {
        let points = [
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(10.0, 10.0),
            ScreenPoint::new(20.0, 0.0),
        ];
        let smooth = canonical_spline(&points, DEFAULT_SPLINE_TENSION, DEFAULT_SPLINE_TOLERANCE);
        assert!(smooth.len() > points.len());
        assert_eq!(smooth[0], points[0]);
        assert_eq!(*smooth.last().expect("non-empty"), points[2]);
        assert!(smooth.contains(&points[1]));
    }

    #[test]
    fn short_inputs_are_returned_unchanged() {
        let points = [ScreenPoint::new(0.0, 0.0), ScreenPoint::new(5.0, 5.0)];
        assert_eq!(canonical_spline(&points, 0.5, 0.25), points.to_vec());
    }
}
