use tracing::debug;

use crate::core::ScreenRect;
use crate::error::{PlotError, PlotResult};
use crate::render::RenderContext;

use super::axis::Axis;
use super::axis_renderer::{AxisRenderOptions, AxisRenderer};
use super::legend_renderer::{LegendConfig, LegendRenderer};
use super::series::Series;
use super::series_renderer::SeriesRenderer;

/// Counts reported by one [`PlotRenderPass::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderPassSummary {
    pub x_major_ticks: usize,
    pub y_major_ticks: usize,
    pub series: usize,
    pub legend: Option<ScreenRect>,
}

/// Draws a Cartesian plot in the canonical order: axes, series clipped to
/// the plot area, legend, then a resource clean-up on the surface.
#[derive(Debug, Clone, Default)]
pub struct PlotRenderPass {
    axis_renderer: AxisRenderer,
    series_renderer: SeriesRenderer,
    legend_renderer: LegendRenderer,
}

impl PlotRenderPass {
    #[must_use]
    pub fn new(options: AxisRenderOptions, legend: LegendConfig) -> Self {
        Self {
            axis_renderer: AxisRenderer::new(options),
            series_renderer: SeriesRenderer::default(),
            legend_renderer: LegendRenderer::new(legend),
        }
    }

    #[must_use]
    pub fn with_series_renderer(mut self, series_renderer: SeriesRenderer) -> Self {
        self.series_renderer = series_renderer;
        self
    }

    /// Binds both axes to `plot_area` and draws everything.
    ///
    /// `x_axis` must be horizontal and `y_axis` vertical.
    pub fn render<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        x_axis: &mut Axis,
        y_axis: &mut Axis,
        series: &[Series],
        plot_area: ScreenRect,
    ) -> PlotResult<RenderPassSummary> {
        if !plot_area.width.is_finite()
            || !plot_area.height.is_finite()
            || plot_area.width <= 0.0
            || plot_area.height <= 0.0
        {
            return Err(PlotError::InvalidData(format!(
                "plot area must have a positive finite size, got {}x{}",
                plot_area.width, plot_area.height
            )));
        }
        if x_axis.is_vertical() || y_axis.is_horizontal() {
            return Err(PlotError::InvalidConfig(
                "render pass expects a horizontal x axis and a vertical y axis".to_owned(),
            ));
        }
        x_axis.validate()?;
        y_axis.validate()?;

        x_axis.update_transform(plot_area);
        y_axis.update_transform(plot_area);

        let x_stats = self
            .axis_renderer
            .render(ctx, x_axis, Some(y_axis), plot_area)?;
        let y_stats = self
            .axis_renderer
            .render(ctx, y_axis, Some(x_axis), plot_area)?;

        // The clip is popped before a series error is returned.
        let (x_axis, y_axis) = (&*x_axis, &*y_axis);
        ctx.push_clip(plot_area);
        let drawn = series
            .iter()
            .try_for_each(|item| self.series_renderer.render(ctx, item, x_axis, y_axis));
        ctx.pop_clip()?;
        drawn?;

        let legend = self.legend_renderer.render(ctx, series, plot_area)?;
        ctx.clean_up();

        let summary = RenderPassSummary {
            x_major_ticks: x_stats.major_ticks,
            y_major_ticks: y_stats.major_ticks,
            series: series.len(),
            legend,
        };
        debug!(
            x_ticks = summary.x_major_ticks,
            y_ticks = summary.y_major_ticks,
            series = summary.series,
            has_legend = summary.legend.is_some(),
            "plot render pass completed"
        );
        Ok(summary)
    }
}
