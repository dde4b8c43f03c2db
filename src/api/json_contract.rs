use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

use super::axis::AxisStyle;
use super::axis_renderer::AxisRenderOptions;
use super::legend_renderer::LegendConfig;
use super::series::SeriesStyle;

pub const PLOT_STYLE_JSON_SCHEMA_V1: u32 = 1;

/// Persistable look of a plot: axis themes, a series palette, the legend and
/// axis rendering tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlotStyleConfig {
    #[serde(default)]
    pub x_axis: AxisStyle,
    #[serde(default)]
    pub y_axis: AxisStyle,
    /// Applied to series in order, cycling when there are more series.
    #[serde(default)]
    pub series: Vec<SeriesStyle>,
    #[serde(default)]
    pub legend: LegendConfig,
    #[serde(default)]
    pub axis_render: AxisRenderOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStyleJsonContractV1 {
    pub schema_version: u32,
    pub style: PlotStyleConfig,
}

impl PlotStyleConfig {
    /// Style for the series at `index`, cycling through the palette.
    #[must_use]
    pub fn series_style(&self, index: usize) -> SeriesStyle {
        if self.series.is_empty() {
            return SeriesStyle::default();
        }
        self.series[index % self.series.len()].clone()
    }

    pub fn validate(&self) -> PlotResult<()> {
        self.x_axis.validate()?;
        self.y_axis.validate()?;
        for style in &self.series {
            style.validate()?;
        }
        self.legend.validate()?;
        self.axis_render.validate()
    }

    pub fn to_json_pretty(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PlotError::InvalidData(format!("failed to serialize plot style json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> PlotResult<String> {
        let payload = PlotStyleJsonContractV1 {
            schema_version: PLOT_STYLE_JSON_SCHEMA_V1,
            style: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            PlotError::InvalidData(format!("failed to serialize plot style contract v1: {e}"))
        })
    }

    /// Accepts either a bare style object or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> PlotResult<Self> {
        if let Ok(payload) = serde_json::from_str::<PlotStyleJsonContractV1>(input) {
            if payload.schema_version != PLOT_STYLE_JSON_SCHEMA_V1 {
                return Err(PlotError::InvalidData(format!(
                    "unsupported plot style schema version: {}",
                    payload.schema_version
                )));
            }
            payload.style.validate()?;
            return Ok(payload.style);
        }
        let style: PlotStyleConfig = serde_json::from_str(input).map_err(|e| {
            PlotError::InvalidData(format!("failed to parse plot style json payload: {e}"))
        })?;
        style.validate()?;
        Ok(style)
    }
}
