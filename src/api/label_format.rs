use std::sync::Arc;

use crate::core::date_ticks::resolve_major_step;
use crate::core::primitives::remove_noise;
use crate::core::{AxisKind, TickRequest, TickSet, format_date_label};

/// Custom tick label formatter installed on an axis.
pub type ValueFormatterFn = Arc<dyn Fn(f64) -> String + Send + Sync + 'static>;

const MAX_FIXED_DECIMALS: usize = 15;

/// Default label text for `value` on an axis of `kind`.
///
/// `ticks` supplies the resolved step, which drives the number of decimals
/// and the calendar unit of date labels.
#[must_use]
pub fn default_label(kind: &AxisKind, value: f64, ticks: &TickSet) -> String {
    match kind {
        AxisKind::Linear | AxisKind::Magnitude | AxisKind::Angle { .. } => {
            format_fixed_step(value, ticks.major_step)
        }
        AxisKind::Logarithmic { .. } => format_general(value),
        AxisKind::Category { labels, .. } => category_label(labels, value),
        AxisKind::DateTime(options) => {
            let step = ticks.date_step.unwrap_or_else(|| {
                let request = TickRequest::new(value, value).with_major_step(Some(ticks.major_step));
                resolve_major_step(&request, value, value, options)
            });
            format_date_label(value, step, options)
        }
    }
}

/// Formats `value` with as many decimals as `step` needs.
#[must_use]
pub fn format_fixed_step(value: f64, step: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e15 || (magnitude > 0.0 && magnitude < 1e-12) {
        return format_general(value);
    }
    let decimals = decimals_for_step(step);
    let text = format!("{:.*}", decimals, remove_noise(value));
    normalize_negative_zero(text)
}

/// Shortest round-trip text, switching to exponent notation outside
/// `[1e-4, 1e15)`.
#[must_use]
pub fn format_general(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let value = remove_noise(value);
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e15).contains(&magnitude) {
        format!("{value:e}")
    } else {
        normalize_negative_zero(value.to_string())
    }
}

fn decimals_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let step = remove_noise(step);
    let mut decimals = 0;
    let mut scaled = step;
    while decimals < MAX_FIXED_DECIMALS && (scaled - scaled.round()).abs() > scaled.abs() * 1e-9 {
        scaled = remove_noise(scaled * 10.0);
        decimals += 1;
    }
    decimals
}

fn normalize_negative_zero(text: String) -> String {
    let is_zero = text
        .strip_prefix('-')
        .is_some_and(|rest| rest.chars().all(|c| c == '0' || c == '.'));
    if is_zero {
        text[1..].to_owned()
    } else {
        text
    }
}

fn category_label(labels: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-9 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}
