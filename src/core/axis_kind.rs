use serde::{Deserialize, Serialize};

use crate::core::date_ticks::DateTimeAxisOptions;

/// Closed set of axis kinds.
///
/// All kinds share one axis record; the tag selects the tick strategy, the
/// value projection used by the transform, and the default label formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AxisKind {
    #[default]
    Linear,
    Logarithmic {
        base: f64,
        /// Extends the range outward to the nearest powers of `base`.
        #[serde(default)]
        power_padding: bool,
    },
    Category {
        labels: Vec<String>,
        /// Tick marks at category centres instead of between categories.
        #[serde(default)]
        is_tick_centered: bool,
    },
    DateTime(DateTimeAxisOptions),
    /// Radial axis of a polar plot.
    Magnitude,
    /// Angular axis of a polar plot; values map linearly onto
    /// `start_angle..end_angle` degrees.
    Angle { start_angle: f64, end_angle: f64 },
}

impl AxisKind {
    #[must_use]
    pub fn logarithmic(base: f64) -> Self {
        Self::Logarithmic {
            base,
            power_padding: false,
        }
    }

    #[must_use]
    pub fn category<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self::Category {
            labels: labels.into_iter().map(Into::into).collect(),
            is_tick_centered: false,
        }
    }

    #[must_use]
    pub fn date_time() -> Self {
        Self::DateTime(DateTimeAxisOptions::default())
    }

    #[must_use]
    pub fn angle() -> Self {
        Self::Angle {
            start_angle: 0.0,
            end_angle: 360.0,
        }
    }

    #[must_use]
    pub fn is_polar(&self) -> bool {
        matches!(self, Self::Magnitude | Self::Angle { .. })
    }

    /// Log base when the axis is logarithmic and the base is usable.
    #[must_use]
    pub fn log_base(&self) -> Option<f64> {
        match self {
            Self::Logarithmic { base, .. } if base.is_finite() && *base > 1.0 => Some(*base),
            Self::Logarithmic { .. } => Some(10.0),
            _ => None,
        }
    }

    /// Maps a data value into the space where the axis transform is affine.
    #[must_use]
    pub fn project(&self, value: f64) -> f64 {
        match self.log_base() {
            Some(base) => value.ln() / base.ln(),
            None => value,
        }
    }

    /// Inverse of [`AxisKind::project`].
    #[must_use]
    pub fn unproject(&self, projected: f64) -> f64 {
        match self.log_base() {
            Some(base) => base.powf(projected),
            None => projected,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Logarithmic { .. } => "logarithmic",
            Self::Category { .. } => "category",
            Self::DateTime(_) => "date_time",
            Self::Magnitude => "magnitude",
            Self::Angle { .. } => "angle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_projection_round_trips() {
        let kind = AxisKind::logarithmic(10.0);
        assert!((kind.project(1000.0) - 3.0).abs() < 1e-12);
        assert!((kind.unproject(kind.project(42.0)) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn linear_projection_is_identity() {
        assert_eq!(AxisKind::Linear.project(-3.5), -3.5);
    }

    #[test]
    fn kind_serializes_with_tag() {
        let json = serde_json::to_string(&AxisKind::logarithmic(2.0)).expect("serialize");
        assert!(json.contains("\"kind\":\"logarithmic\""));
    }
}
