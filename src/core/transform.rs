use serde::{Deserialize, Serialize};

use crate::core::ScreenPoint;

/// Affine map between an axis' actual range and the pixel span it occupies.
///
/// Both directions are pure functions of
/// `(actual_min, actual_max, screen_min, screen_max, reversed)`.
/// A degenerate range (`actual_min == actual_max`) is a caller precondition:
/// the map does not panic but yields non-finite coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTransform {
    actual_min: f64,
    actual_max: f64,
    screen_min: f64,
    screen_max: f64,
    reversed: bool,
}

impl AxisTransform {
    #[must_use]
    pub const fn new(
        actual_min: f64,
        actual_max: f64,
        screen_min: f64,
        screen_max: f64,
        reversed: bool,
    ) -> Self {
        Self {
            actual_min,
            actual_max,
            screen_min,
            screen_max,
            reversed,
        }
    }

    #[must_use]
    pub fn actual_range(self) -> (f64, f64) {
        (self.actual_min, self.actual_max)
    }

    #[must_use]
    pub fn screen_range(self) -> (f64, f64) {
        (self.screen_min, self.screen_max)
    }

    #[must_use]
    pub fn is_reversed(self) -> bool {
        self.reversed
    }

    /// Maps a data-space value to a screen coordinate.
    #[must_use]
    pub fn transform(self, value: f64) -> f64 {
        let fraction = (value - self.actual_min) / (self.actual_max - self.actual_min);
        let span = self.screen_max - self.screen_min;
        if self.reversed {
            self.screen_max - fraction * span
        } else {
            self.screen_min + fraction * span
        }
    }

    /// Maps a screen coordinate back to a data-space value.
    #[must_use]
    pub fn inverse_transform(self, screen: f64) -> f64 {
        let span = self.screen_max - self.screen_min;
        let fraction = if self.reversed {
            (self.screen_max - screen) / span
        } else {
            (screen - self.screen_min) / span
        };
        self.actual_min + fraction * (self.actual_max - self.actual_min)
    }

    /// Pixels per data unit (signed, negative for vertical axes growing upwards).
    #[must_use]
    pub fn scale(self) -> f64 {
        let scale = (self.screen_max - self.screen_min) / (self.actual_max - self.actual_min);
        if self.reversed { -scale } else { scale }
    }
}

/// Maps (magnitude, angle) data pairs onto the screen around a midpoint.
///
/// `magnitude` must map data magnitudes to a radius in pixels and `angle` data
/// values to degrees (0 = east, growing counter-clockwise on screen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarTransform {
    pub midpoint: ScreenPoint,
    pub magnitude: AxisTransform,
    pub angle: AxisTransform,
}

impl PolarTransform {
    #[must_use]
    pub fn transform(self, magnitude: f64, angle: f64) -> ScreenPoint {
        let radius = self.magnitude.transform(magnitude);
        let theta = self.angle.transform(angle).to_radians();
        ScreenPoint::new(
            self.midpoint.x + radius * theta.cos(),
            self.midpoint.y - radius * theta.sin(),
        )
    }

    /// Returns `(magnitude, angle)` for a screen point.
    #[must_use]
    pub fn inverse_transform(self, point: ScreenPoint) -> (f64, f64) {
        let dx = point.x - self.midpoint.x;
        let dy = self.midpoint.y - point.y;
        let radius = (dx * dx + dy * dy).sqrt();
        let (start, end) = self.angle.screen_range();
        let low = start.min(end);
        let degrees = low + (dy.atan2(dx).to_degrees() - low).rem_euclid(360.0);
        (
            self.magnitude.inverse_transform(radius),
            self.angle.inverse_transform(degrees),
        )
    }
}
