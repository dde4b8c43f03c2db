use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{PlotError, PlotResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> PlotResult<f64> {
    value.to_f64().ok_or_else(|| {
        PlotError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Inverse of [`datetime_to_unix_seconds`]; `None` outside chrono's range.
#[must_use]
pub fn unix_seconds_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Removes floating-point noise by rounding to 15 significant digits.
#[must_use]
pub fn remove_noise(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    format!("{value:.14e}").parse::<f64>().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_noise_cleans_binary_fractions() {
        assert_eq!(remove_noise(0.1 * 3.0), 0.3);
        assert_eq!(remove_noise(1.0e-7 * 7.0), 7.0e-7);
    }

    #[test]
    fn unix_seconds_round_trip() {
        let time = unix_seconds_to_datetime(1_700_000_000.5).expect("in range");
        assert_eq!(datetime_to_unix_seconds(time), 1_700_000_000.5);
        assert!(unix_seconds_to_datetime(f64::NAN).is_none());
    }
}
