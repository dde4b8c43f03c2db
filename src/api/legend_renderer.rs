use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ScreenPoint, ScreenRect, Size};
use crate::error::{PlotError, PlotResult};
use crate::render::math_text::{draw_math_text, measure_math_text};
use crate::render::{
    Color, FontSpec, HorizontalAlignment, RenderContext, TextPrimitive, VerticalAlignment,
};

use super::axis::LineAppearance;
use super::series::Series;
use super::series_renderer::SeriesRenderer;

/// Placement of the legend box inside the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    MiddleLeft,
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl LegendPosition {
    /// Horizontal and vertical placement as -1 (start), 0 (center), 1 (end).
    const fn signs(self) -> (i8, i8) {
        match self {
            Self::TopLeft => (-1, -1),
            Self::TopCenter => (0, -1),
            Self::TopRight => (1, -1),
            Self::MiddleLeft => (-1, 0),
            Self::Center => (0, 0),
            Self::MiddleRight => (1, 0),
            Self::BottomLeft => (-1, 1),
            Self::BottomCenter => (0, 1),
            Self::BottomRight => (1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegendOrientation {
    #[default]
    Vertical,
    Horizontal,
}

fn default_true() -> bool {
    true
}

fn default_symbol_width() -> f64 {
    16.0
}

fn default_symbol_spacing() -> f64 {
    4.0
}

fn default_item_spacing() -> f64 {
    8.0
}

fn default_padding() -> f64 {
    8.0
}

fn default_margin() -> f64 {
    8.0
}

fn default_text_color() -> Color {
    Color::BLACK
}

fn default_background() -> Color {
    Color::rgba(1.0, 1.0, 1.0, 0.8)
}

fn default_border() -> LineAppearance {
    LineAppearance::solid(Color::BLACK, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub position: LegendPosition,
    #[serde(default)]
    pub orientation: LegendOrientation,
    #[serde(default = "default_symbol_width")]
    pub symbol_width: f64,
    /// Gap between a swatch and its label.
    #[serde(default = "default_symbol_spacing")]
    pub symbol_spacing: f64,
    /// Gap between consecutive entries.
    #[serde(default = "default_item_spacing")]
    pub item_spacing: f64,
    #[serde(default = "default_padding")]
    pub padding: f64,
    /// Distance between the box and the plot area edge.
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default)]
    pub font: FontSpec,
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default = "default_border")]
    pub border: LineAppearance,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_font: FontSpec,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            visible: true,
            position: LegendPosition::default(),
            orientation: LegendOrientation::default(),
            symbol_width: default_symbol_width(),
            symbol_spacing: default_symbol_spacing(),
            item_spacing: default_item_spacing(),
            padding: default_padding(),
            margin: default_margin(),
            font: FontSpec::default(),
            text_color: default_text_color(),
            background: default_background(),
            border: default_border(),
            title: None,
            title_font: FontSpec::default(),
        }
    }
}

impl LegendConfig {
    #[must_use]
    pub fn with_position(mut self, position: LegendPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: LegendOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        for (field, value) in [
            ("symbol width", self.symbol_width),
            ("symbol spacing", self.symbol_spacing),
            ("item spacing", self.item_spacing),
            ("padding", self.padding),
            ("margin", self.margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlotError::InvalidConfig(format!(
                    "legend {field} must be finite and >= 0"
                )));
            }
        }
        self.text_color.validate()?;
        self.background.validate()?;
        self.border.validate("legend border")
    }
}

/// Measured legend contents, reused between measuring and drawing.
#[derive(Debug, Clone, PartialEq)]
struct LegendLayout {
    title: Size,
    entries: Vec<(usize, Size)>,
    size: Size,
}

/// Lays out and draws one swatch plus label per titled series.
#[derive(Debug, Clone, Default)]
pub struct LegendRenderer {
    config: LegendConfig,
    series_renderer: SeriesRenderer,
}

impl LegendRenderer {
    #[must_use]
    pub fn new(config: LegendConfig) -> Self {
        Self {
            config,
            series_renderer: SeriesRenderer::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &LegendConfig {
        &self.config
    }

    fn layout<C: RenderContext + ?Sized>(&self, ctx: &mut C, series: &[Series]) -> LegendLayout {
        let config = &self.config;
        let entries: Vec<(usize, Size)> = series
            .iter()
            .enumerate()
            .filter(|(_, s)| s.has_legend_entry())
            .map(|(index, s)| {
                let text = s.title.as_deref().unwrap_or_default();
                (index, measure_math_text(ctx, text, &config.font, None))
            })
            .collect();
        let title = match config.title.as_deref() {
            Some(title) if !title.is_empty() => {
                measure_math_text(ctx, title, &config.title_font, None)
            }
            _ => Size::EMPTY,
        };

        let swatch = config.symbol_width + config.symbol_spacing;
        let gaps = entries.len().saturating_sub(1) as f64 * config.item_spacing;
        let body = match config.orientation {
            LegendOrientation::Vertical => Size::new(
                entries
                    .iter()
                    .map(|(_, size)| swatch + size.width)
                    .fold(0.0, f64::max),
                entries.iter().map(|(_, size)| size.height).sum::<f64>() + gaps,
            ),
            LegendOrientation::Horizontal => Size::new(
                entries.iter().map(|(_, size)| swatch + size.width).sum::<f64>() + gaps,
                entries
                    .iter()
                    .map(|(_, size)| size.height)
                    .fold(0.0, f64::max),
            ),
        };
        let title_gap = if title.height > 0.0 && !entries.is_empty() {
            config.item_spacing
        } else {
            0.0
        };
        let size = if entries.is_empty() && title.height <= 0.0 {
            Size::EMPTY
        } else {
            Size::new(
                body.width.max(title.width) + config.padding * 2.0,
                body.height + title.height + title_gap + config.padding * 2.0,
            )
        };
        LegendLayout {
            title,
            entries,
            size,
        }
    }

    /// Size of the legend box, empty when there is nothing to show.
    pub fn measure<C: RenderContext + ?Sized>(&self, ctx: &mut C, series: &[Series]) -> Size {
        if !self.config.visible {
            return Size::EMPTY;
        }
        self.layout(ctx, series).size
    }

    /// Draws the legend inside `plot_area` and returns its box.
    pub fn render<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        series: &[Series],
        plot_area: ScreenRect,
    ) -> PlotResult<Option<ScreenRect>> {
        let config = &self.config;
        config.validate()?;
        if !config.visible {
            return Ok(None);
        }
        let layout = self.layout(ctx, series);
        if layout.size.width <= 0.0 || layout.size.height <= 0.0 {
            return Ok(None);
        }

        let rect = self.placement(layout.size, plot_area);
        let border = config.border.pen();
        if config.background.is_visible() || border.is_some() {
            ctx.draw_rectangle(rect, config.background, border.as_ref());
        }

        let mut cursor = ScreenPoint::new(rect.left + config.padding, rect.top + config.padding);
        if let Some(title) = config.title.as_deref().filter(|_| layout.title.height > 0.0) {
            let anchor = ScreenPoint::new(rect.center().x, cursor.y);
            let text = TextPrimitive::new(title, anchor, config.text_color, config.title_font.clone())
                .with_alignment(HorizontalAlignment::Center, VerticalAlignment::Top);
            draw_math_text(ctx, &text);
            cursor.y += layout.title.height + config.item_spacing;
        }

        for &(index, text_size) in &layout.entries {
            let entry = &series[index];
            let symbol = ScreenRect::new(cursor.x, cursor.y, config.symbol_width, text_size.height);
            self.series_renderer.render_legend_symbol(ctx, entry, symbol);

            let anchor = ScreenPoint::new(
                symbol.right() + config.symbol_spacing,
                cursor.y + text_size.height / 2.0,
            );
            let label = TextPrimitive::new(
                entry.title.as_deref().unwrap_or_default(),
                anchor,
                config.text_color,
                config.font.clone(),
            )
            .with_alignment(HorizontalAlignment::Left, VerticalAlignment::Middle);
            draw_math_text(ctx, &label);

            match config.orientation {
                LegendOrientation::Vertical => cursor.y += text_size.height + config.item_spacing,
                LegendOrientation::Horizontal => {
                    cursor.x += config.symbol_width
                        + config.symbol_spacing
                        + text_size.width
                        + config.item_spacing;
                }
            }
        }

        debug!(
            entries = layout.entries.len(),
            width = rect.width,
            height = rect.height,
            "legend rendered"
        );
        Ok(Some(rect))
    }

    fn placement(&self, size: Size, plot_area: ScreenRect) -> ScreenRect {
        let margin = self.config.margin;
        let (h, v) = self.config.position.signs();
        let left = match h {
            -1 => plot_area.left + margin,
            0 => plot_area.center().x - size.width / 2.0,
            _ => plot_area.right() - margin - size.width,
        };
        let top = match v {
            -1 => plot_area.top + margin,
            0 => plot_area.center().y - size.height / 2.0,
            _ => plot_area.bottom() - margin - size.height,
        };
        ScreenRect::new(left, top, size.width, size.height)
    }
}
