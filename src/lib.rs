//! plot-rs: toolkit-neutral 2D plot rendering.
//!
//! Axes compute ticks and map data to screen coordinates; renderers draw
//! axes, series and legends through the [`render::RenderContext`] trait, which
//! hosts implement on top of their drawing surface.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{Axis, AxisPosition, AxisRenderer, PlotRenderPass, Series, SeriesRenderer};
pub use error::{PlotError, PlotResult};
