use crate::core::ScreenPoint;

/// Drops consecutive screen points closer than `sqrt(min_distance_squared)` to
/// the last kept point.
///
/// The first and the last input point are always kept. The comparison works on
/// squared distances; a threshold of `0.0` never removes anything.
pub fn reduce_points(points: &[ScreenPoint], min_distance_squared: f64, out: &mut Vec<ScreenPoint>) {
    out.clear();
    let Some((&first, rest)) = points.split_first() else {
        return;
    };
    out.push(first);
    let Some((&last, middle)) = rest.split_last() else {
        return;
    };

    let mut last_kept = first;
    for &point in middle {
        if point.distance_squared(last_kept) < min_distance_squared {
            continue;
        }
        out.push(point);
        last_kept = point;
    }
    out.push(last);
}

/// Convenience wrapper around [`reduce_points`] taking a length in pixels.
#[must_use]
pub fn reduced(points: &[ScreenPoint], minimum_segment_length: f64) -> Vec<ScreenPoint> {
    let mut out = Vec::with_capacity(points.len());
    let threshold = if minimum_segment_length.is_finite() && minimum_segment_length > 0.0 {
        minimum_segment_length * minimum_segment_length
    } else {
        0.0
    };
    reduce_points(points, threshold, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, spacing: f64) -> Vec<ScreenPoint> {
        (0..n)
            .map(|i| ScreenPoint::new(i as f64 * spacing, 0.0))
            .collect()
    }

    #[test]
    fn dense_run_collapses_to_endpoints() {
        let points = line(100, 0.01);
        let out = reduced(&points, 2.0);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], points[0]);
        assert_eq!(out[1], points[99]);
    }

    #[test]
    fn spacing_above_threshold_keeps_everything() {
        let points = line(10, 5.0);
        assert_eq!(reduced(&points, 2.0), points);
    }

    #[test]
    fn duplicates_survive_zero_threshold() {
        let points = vec![ScreenPoint::new(1.0, 1.0); 4];
        assert_eq!(reduced(&points, 0.0).len(), 4);
    }

    #[test]
    fn single_point_is_kept() {
        let points = [ScreenPoint::new(3.0, 4.0)];
        assert_eq!(reduced(&points, 10.0), points.to_vec());
    }
}
