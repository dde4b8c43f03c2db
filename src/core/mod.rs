pub mod axis_kind;
pub mod clipping;
pub mod date_ticks;
pub mod geometry;
pub mod primitives;
pub mod reduction;
pub mod spline;
pub mod ticks;
pub mod transform;
pub mod types;

pub use axis_kind::AxisKind;
pub use clipping::ClipWindow;
pub use date_ticks::{
    CalendarWeekRule, DateStep, DateTimeAxisOptions, DateTimeIntervalType, format_date_label,
    week_of_year,
};
pub use geometry::{ScreenPoint, ScreenRect, ScreenVector, Size};
pub use reduction::{reduce_points, reduced};
pub use spline::{DEFAULT_SPLINE_TENSION, DEFAULT_SPLINE_TOLERANCE, canonical_spline};
pub use ticks::{
    TickRequest, TickSet, compute_ticks, create_tick_values, filter_minor_ticks, nice_interval,
    pad_range_to_powers,
};
pub use transform::{AxisTransform, PolarTransform};
pub use types::DataPoint;
