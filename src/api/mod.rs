mod axis;
mod axis_renderer;
mod json_contract;
mod label_format;
mod legend_renderer;
mod polar_axis_renderer;
mod render_pass;
mod series;
mod series_renderer;

pub use axis::{Axis, AxisPosition, AxisStyle, LineAppearance, TickStyle};
pub use axis_renderer::{
    AxisRenderOptions, AxisRenderStats, AxisRenderer, CROSSING_TICK_SCALE, default_label_alignment,
    rotated_alignments, tick_offsets,
};
pub use json_contract::{PLOT_STYLE_JSON_SCHEMA_V1, PlotStyleConfig, PlotStyleJsonContractV1};
pub use label_format::{ValueFormatterFn, default_label, format_fixed_step, format_general};
pub use legend_renderer::{LegendConfig, LegendOrientation, LegendPosition, LegendRenderer};
pub use polar_axis_renderer::{AngleAxisRenderer, MagnitudeAxisRenderer, polar_transform};
pub use render_pass::{PlotRenderPass, RenderPassSummary};
pub use series::{AreaBaseline, Series, SeriesKind, SeriesStyle};
pub use series_renderer::{SeriesRenderer, clipped_runs};
