//! Tick value generation for all axis kinds.
//!
//! `compute_ticks` is the single entry point; the axis kind tag selects the
//! strategy. Every generator is bounded by `TickRequest::max_ticks`.

use smallvec::SmallVec;
use tracing::trace;

use crate::core::axis_kind::AxisKind;
use crate::core::date_ticks::{self, DateStep};
use crate::core::primitives::remove_noise;

/// Advisory upper bound on the number of values per tick sequence.
pub const DEFAULT_MAX_TICKS: usize = 1000;

/// Default target number of major intervals when no pixel span is known.
pub const DEFAULT_MAX_INTERVALS: f64 = 10.0;

/// Relative tolerance (in units of the step) used when aligning tick values to
/// the range ends.
const RANGE_EPSILON_FACTOR: f64 = 1e-3;

const MAX_NICE_ITERATIONS: usize = 128;

/// Inputs of one tick computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRequest {
    pub actual_minimum: f64,
    pub actual_maximum: f64,
    pub major_step: Option<f64>,
    pub minor_step: Option<f64>,
    /// Desired upper bound on the number of major intervals.
    pub max_intervals: f64,
    pub max_ticks: usize,
}

impl TickRequest {
    #[must_use]
    pub fn new(actual_minimum: f64, actual_maximum: f64) -> Self {
        Self {
            actual_minimum,
            actual_maximum,
            major_step: None,
            minor_step: None,
            max_intervals: DEFAULT_MAX_INTERVALS,
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }

    #[must_use]
    pub fn with_major_step(mut self, step: Option<f64>) -> Self {
        self.major_step = step;
        self
    }

    #[must_use]
    pub fn with_minor_step(mut self, step: Option<f64>) -> Self {
        self.minor_step = step;
        self
    }

    #[must_use]
    pub fn with_max_intervals(mut self, max_intervals: f64) -> Self {
        self.max_intervals = max_intervals;
        self
    }

    /// Derives the interval budget from the pixel span and the desired
    /// distance between major ticks.
    #[must_use]
    pub fn with_pixel_budget(mut self, available_px: f64, interval_length_px: f64) -> Self {
        if available_px.is_finite()
            && interval_length_px.is_finite()
            && available_px > 0.0
            && interval_length_px > 0.0
        {
            self.max_intervals = (available_px / interval_length_px).max(1.0);
        }
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks.max(1);
        self
    }

    fn ordered_range(&self) -> (f64, f64) {
        if self.actual_minimum <= self.actual_maximum {
            (self.actual_minimum, self.actual_maximum)
        } else {
            (self.actual_maximum, self.actual_minimum)
        }
    }

    fn max_intervals(&self) -> f64 {
        if self.max_intervals.is_finite() && self.max_intervals >= 1.0 {
            self.max_intervals
        } else {
            1.0
        }
    }

    fn max_ticks(&self) -> usize {
        self.max_ticks.max(1)
    }
}

/// Tick values of one render pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickSet {
    pub major: Vec<f64>,
    pub minor: Vec<f64>,
    /// Label anchors; equal to `major` except for category axes.
    pub labels: Vec<f64>,
    /// Resolved major step (decades for logarithmic axes).
    pub major_step: f64,
    /// Resolved minor step; drives the coincidence tolerance.
    pub minor_step: f64,
    /// Calendar step of date/time axes, used for label formatting.
    pub date_step: Option<DateStep>,
}

impl TickSet {
    #[must_use]
    pub fn single(value: f64) -> Self {
        Self {
            major: vec![value],
            minor: Vec::new(),
            labels: vec![value],
            major_step: 0.0,
            minor_step: 0.0,
            date_step: None,
        }
    }

    /// Tolerance for "same tick" comparisons.
    #[must_use]
    pub fn epsilon(&self, factor: f64) -> f64 {
        let epsilon = self.minor_step * factor;
        if epsilon.is_finite() && epsilon > 0.0 {
            epsilon
        } else {
            0.0
        }
    }

    /// Minor values that do not coincide with a major value.
    #[must_use]
    pub fn visible_minor(&self, epsilon: f64) -> Vec<f64> {
        filter_minor_ticks(&self.major, &self.minor, epsilon)
    }
}

/// Computes major/minor tick values for the requested range and axis kind.
#[must_use]
pub fn compute_ticks(request: &TickRequest, kind: &AxisKind) -> TickSet {
    let (min, max) = request.ordered_range();
    if !min.is_finite() || !max.is_finite() {
        trace!(min, max, "non-finite axis range, no ticks");
        return TickSet::default();
    }
    if min == max {
        return TickSet::single(min);
    }

    let ticks = match kind {
        AxisKind::Linear | AxisKind::Magnitude | AxisKind::Angle { .. } => {
            linear_ticks(request, min, max)
        }
        AxisKind::Logarithmic { power_padding, .. } => {
            let base = kind.log_base().unwrap_or(10.0);
            logarithmic_ticks(request, min, max, base, *power_padding)
        }
        AxisKind::Category {
            labels,
            is_tick_centered,
        } => category_ticks(request, min, max, labels.len(), *is_tick_centered),
        AxisKind::DateTime(options) => date_ticks::date_time_ticks(request, min, max, options),
    };
    trace!(
        kind = kind.name(),
        major = ticks.major.len(),
        minor = ticks.minor.len(),
        major_step = ticks.major_step,
        "computed ticks"
    );
    ticks
}

fn linear_ticks(request: &TickRequest, min: f64, max: f64) -> TickSet {
    let major_step = positive(request.major_step)
        .unwrap_or_else(|| nice_interval(max - min, request.max_intervals()));
    let minor_step = positive(request.minor_step).unwrap_or(major_step / 5.0);

    let major = create_tick_values(min, max, major_step, request.max_ticks());
    let minor = if (max - min) / minor_step > request.max_ticks() as f64 {
        trace!(minor_step, "minor step too small for range, minor ticks skipped");
        Vec::new()
    } else {
        create_tick_values(min, max, minor_step, request.max_ticks())
    };

    TickSet {
        labels: major.clone(),
        major,
        minor,
        major_step,
        minor_step,
        date_step: None,
    }
}

/// Picks a "nice" interval (1, 2 or 5 times a power of ten) so that `range`
/// is split into at most `max_intervals` intervals.
#[must_use]
pub fn nice_interval(range: f64, max_intervals: f64) -> f64 {
    let range = range.abs();
    if !range.is_finite() || range == 0.0 {
        return 1.0;
    }
    let max_intervals = if max_intervals.is_finite() && max_intervals >= 1.0 {
        max_intervals
    } else {
        1.0
    };

    let exponent = |x: f64| x.log10().ceil();
    let mantissa = |x: f64| x / 10f64.powf(exponent(x) - 1.0);

    let mut interval = remove_noise(10f64.powf(exponent(range)));
    let mut candidate = interval;
    for _ in 0..MAX_NICE_ITERATIONS {
        // 10 -> 5 -> 2 -> 1 -> 0.5 ...
        candidate = if mantissa(candidate).round() as i64 == 5 {
            remove_noise(candidate / 2.5)
        } else {
            remove_noise(candidate / 2.0)
        };
        if !candidate.is_finite() || candidate <= 0.0 || range / candidate > max_intervals {
            break;
        }
        interval = candidate;
    }
    interval
}

/// All multiples of `step` within `[from - eps, to + eps]`, at most `max_ticks`.
#[must_use]
pub fn create_tick_values(from: f64, to: f64, step: f64, max_ticks: usize) -> Vec<f64> {
    if !step.is_finite() || step <= 0.0 {
        return vec![from];
    }
    let (from, to) = if from <= to { (from, to) } else { (to, from) };
    let epsilon = step * RANGE_EPSILON_FACTOR;
    let first = ((from - epsilon) / step).ceil();
    let last = ((to + epsilon) / step).floor();
    if !first.is_finite() || !last.is_finite() || last < first {
        return Vec::new();
    }

    let count = ((last - first) as usize).saturating_add(1).min(max_ticks.max(1));
    (0..count)
        .map(|i| {
            let value = remove_noise((first + i as f64) * step);
            // Avoid "-0" labels.
            if value == 0.0 { 0.0 } else { value }
        })
        .collect()
}

/// Removes minor values lying within `epsilon` of any major value.
///
/// Both inputs are expected in ascending order.
#[must_use]
pub fn filter_minor_ticks(major: &[f64], minor: &[f64], epsilon: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(minor.len());
    let mut cursor = 0;
    for &value in minor {
        while cursor < major.len() && major[cursor] < value - epsilon {
            cursor += 1;
        }
        let coincides = major
            .get(cursor)
            .is_some_and(|&m| (m - value).abs() <= epsilon);
        if !coincides {
            result.push(value);
        }
    }
    result
}

/// Widens `[min, max]` to the nearest enclosing integer powers of `base`.
#[must_use]
pub fn pad_range_to_powers(min: f64, max: f64, base: f64) -> (f64, f64) {
    if !(min > 0.0 && max > 0.0 && base > 1.0) {
        return (min, max);
    }
    let log_base = base.ln();
    let low = (min.ln() / log_base + 1e-9).floor();
    let high = (max.ln() / log_base - 1e-9).ceil();
    (
        remove_noise(base.powf(low)),
        remove_noise(base.powf(high)),
    )
}

fn logarithmic_ticks(
    request: &TickRequest,
    min: f64,
    max: f64,
    base: f64,
    power_padding: bool,
) -> TickSet {
    if max <= 0.0 {
        return TickSet::single(max);
    }
    if min <= 0.0 {
        trace!(min, "non-positive minimum on logarithmic axis");
        return TickSet::single(max);
    }
    let (min, max) = if power_padding {
        pad_range_to_powers(min, max, base)
    } else {
        (min, max)
    };

    let log_base = base.ln();
    let first_exponent = (min.ln() / log_base - 1e-9).ceil();
    let last_exponent = (max.ln() / log_base + 1e-9).floor();
    let low_exponent = (min.ln() / log_base + 1e-9).floor();
    let within = |value: f64| value >= min * (1.0 - 1e-12) && value <= max * (1.0 + 1e-12);
    let max_ticks = request.max_ticks();

    let decades = (last_exponent - first_exponent).max(0.0);
    let decade_step = positive(request.major_step)
        .map(|step| step.round().max(1.0))
        .unwrap_or_else(|| (decades / request.max_intervals()).ceil().max(1.0));

    let mut major = Vec::new();
    let mut minor = Vec::new();
    let multipliers = minor_multipliers(base);

    let mut exponent = first_exponent;
    while exponent <= last_exponent && major.len() + minor.len() < max_ticks {
        let power = remove_noise(base.powf(exponent));
        let is_major = ((exponent - first_exponent) / decade_step).fract() == 0.0;
        if is_major {
            major.push(power);
        } else {
            minor.push(power);
        }
        exponent += 1.0;
    }

    if decade_step == 1.0 {
        minor.clear();
        let mut exponent = low_exponent;
        while exponent <= last_exponent && minor.len() < max_ticks {
            let power = base.powf(exponent);
            for &k in &multipliers {
                let value = remove_noise(k * power);
                if within(value) {
                    minor.push(value);
                }
            }
            exponent += 1.0;
        }
        minor.truncate(max_ticks);
    }

    // Less than one decade visible: promote the in-between multiples.
    if major.len() < 2 && !minor.is_empty() {
        major.append(&mut minor);
        major.sort_by(f64::total_cmp);
        major.dedup();
        major.truncate(max_ticks);
    }

    let minor_step = remove_noise(base.powf(low_exponent));
    TickSet {
        labels: major.clone(),
        major,
        minor,
        major_step: decade_step,
        minor_step,
        date_step: None,
    }
}

fn minor_multipliers(base: f64) -> SmallVec<[f64; 16]> {
    let mut multipliers = SmallVec::new();
    let mut k = 2.0;
    while k < base && multipliers.len() < 64 {
        multipliers.push(k);
        k += 1.0;
    }
    multipliers
}

fn category_ticks(
    request: &TickRequest,
    min: f64,
    max: f64,
    category_count: usize,
    is_tick_centered: bool,
) -> TickSet {
    let step = positive(request.major_step)
        .map(|step| step.round().max(1.0))
        .unwrap_or(1.0);
    let mut first = (min - 1e-9).ceil().max(0.0);
    let mut last = (max + 1e-9).floor();
    if category_count > 0 {
        last = last.min((category_count - 1) as f64);
    }
    if first < 0.0 {
        first = 0.0;
    }

    let mut labels = Vec::new();
    let mut index = first;
    while index <= last && labels.len() < request.max_ticks() {
        labels.push(index);
        index += step;
    }

    let major = if is_tick_centered {
        labels.clone()
    } else {
        let mut boundaries: Vec<f64> = labels.iter().map(|index| index - 0.5).collect();
        if let Some(&last_label) = labels.last() {
            if boundaries.len() < request.max_ticks() {
                boundaries.push(last_label + step - 0.5);
            }
        }
        boundaries
    };

    TickSet {
        major,
        minor: Vec::new(),
        labels,
        major_step: step,
        minor_step: step,
        date_step: None,
    }
}

fn positive(step: Option<f64>) -> Option<f64> {
    step.filter(|step| step.is_finite() && *step > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_interval_for_hundred_over_ten_intervals_is_ten() {
        assert_eq!(nice_interval(100.0, 10.0), 10.0);
        assert_eq!(nice_interval(100.0, 4.0), 50.0);
        assert_eq!(nice_interval(1.0, 10.0), 0.1);
        assert_eq!(nice_interval(7.0, 3.0), 5.0);
    }

    #[test]
    fn create_tick_values_is_bounded() {
        let values = create_tick_values(0.0, 1.0e12, 1.0, 50);
        assert_eq!(values.len(), 50);
    }

    #[test]
    fn create_tick_values_rejects_invalid_step() {
        assert_eq!(create_tick_values(3.0, 9.0, 0.0, 10), vec![3.0]);
        assert_eq!(create_tick_values(3.0, 9.0, f64::NAN, 10), vec![3.0]);
    }

    #[test]
    fn filter_minor_drops_coincident_values() {
        let major = [0.0, 10.0, 20.0];
        let minor = [0.0, 2.0, 4.0, 9.999_999, 12.0, 20.0];
        assert_eq!(
            filter_minor_ticks(&major, &minor, 0.002),
            vec![2.0, 4.0, 12.0]
        );
    }

    #[test]
    fn category_ticks_between_categories_by_default() {
        let kind = AxisKind::category(["a", "b", "c"]);
        let ticks = compute_ticks(&TickRequest::new(-0.5, 2.5), &kind);
        assert_eq!(ticks.labels, vec![0.0, 1.0, 2.0]);
        assert_eq!(ticks.major, vec![-0.5, 0.5, 1.5, 2.5]);
        assert!(ticks.minor.is_empty());
    }

    #[test]
    fn category_ticks_centered() {
        let kind = AxisKind::Category {
            labels: vec!["a".into(), "b".into()],
            is_tick_centered: true,
        };
        let ticks = compute_ticks(&TickRequest::new(-0.5, 1.5), &kind);
        assert_eq!(ticks.major, ticks.labels);
    }

    #[test]
    fn log_ticks_skip_decades_on_wide_ranges() {
        let kind = AxisKind::logarithmic(10.0);
        let request = TickRequest::new(1e-20, 1e20).with_max_intervals(5.0);
        let ticks = compute_ticks(&request, &kind);
        assert!(ticks.major.len() <= 6);
        assert!(ticks.major_step > 1.0);
        assert!(!ticks.minor.is_empty());
    }

    #[test]
    fn log_ticks_within_one_decade_promote_multiples() {
        let kind = AxisKind::logarithmic(10.0);
        let ticks = compute_ticks(&TickRequest::new(2.0, 8.0), &kind);
        assert_eq!(ticks.major, vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn power_padding_extends_to_decades() {
        assert_eq!(pad_range_to_powers(2.0, 500.0, 10.0), (1.0, 1000.0));
        assert_eq!(pad_range_to_powers(1.0, 1000.0, 10.0), (1.0, 1000.0));
    }
}
