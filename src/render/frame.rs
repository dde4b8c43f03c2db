use crate::core::{ScreenPoint, ScreenRect};
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, Pen, TextPrimitive};

/// One recorded render-context call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        points: Vec<ScreenPoint>,
        pen: Pen,
    },
    /// Independent segments as consecutive point pairs, drawn in one batch.
    LineSegments {
        points: Vec<ScreenPoint>,
        pen: Pen,
    },
    Polygon {
        points: Vec<ScreenPoint>,
        fill: Color,
        stroke: Option<Pen>,
    },
    Ellipse {
        rect: ScreenRect,
        fill: Color,
        stroke: Option<Pen>,
    },
    Text(TextPrimitive),
    Image {
        width: u32,
        height: u32,
        source: ScreenRect,
        destination: ScreenRect,
        opacity: f64,
    },
    ToolTip(Option<String>),
    PushClip(ScreenRect),
    PopClip,
}

impl DrawCommand {
    pub fn validate(&self) -> PlotResult<()> {
        match self {
            Self::Line { points, pen } | Self::LineSegments { points, pen } => {
                validate_points(points)?;
                pen.validate()
            }
            Self::Polygon {
                points,
                fill,
                stroke,
            } => {
                validate_points(points)?;
                fill.validate()?;
                stroke.as_ref().map_or(Ok(()), Pen::validate)
            }
            Self::Ellipse { rect, fill, stroke } => {
                validate_rect(*rect)?;
                fill.validate()?;
                stroke.as_ref().map_or(Ok(()), Pen::validate)
            }
            Self::Text(text) => text.validate(),
            Self::Image { destination, .. } => validate_rect(*destination),
            Self::PushClip(rect) => validate_rect(*rect),
            Self::ToolTip(_) | Self::PopClip => Ok(()),
        }
    }
}

fn validate_points(points: &[ScreenPoint]) -> PlotResult<()> {
    if points.iter().all(|point| point.is_finite()) {
        Ok(())
    } else {
        Err(PlotError::InvalidData(
            "primitive coordinates must be finite".to_owned(),
        ))
    }
}

fn validate_rect(rect: ScreenRect) -> PlotResult<()> {
    let finite = [rect.left, rect.top, rect.width, rect.height]
        .iter()
        .all(|value| value.is_finite());
    if !finite || rect.width < 0.0 || rect.height < 0.0 {
        return Err(PlotError::InvalidData(
            "rectangle must be finite with non-negative size".to_owned(),
        ));
    }
    Ok(())
}

/// Backend-agnostic record of one render pass, in call order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderFrame {
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_command(mut self, command: DrawCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn validate(&self) -> PlotResult<()> {
        let mut clip_depth = 0_usize;
        for command in &self.commands {
            command.validate()?;
            match command {
                DrawCommand::PushClip(_) => clip_depth += 1,
                DrawCommand::PopClip => {
                    clip_depth = clip_depth.checked_sub(1).ok_or(PlotError::UnbalancedClip {
                        operation: "pop_clip",
                    })?;
                }
                _ => {}
            }
        }
        if clip_depth != 0 {
            return Err(PlotError::UnbalancedClip {
                operation: "push_clip",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    /// Polylines as `(points, pen)`.
    pub fn lines(&self) -> impl Iterator<Item = (&[ScreenPoint], &Pen)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { points, pen } => Some((points.as_slice(), pen)),
            _ => None,
        })
    }

    /// Segment batches as `(points, pen)`.
    pub fn segment_batches(&self) -> impl Iterator<Item = (&[ScreenPoint], &Pen)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::LineSegments { points, pen } => Some((points.as_slice(), pen)),
            _ => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = &[ScreenPoint]> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Polygon { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn ellipses(&self) -> impl Iterator<Item = ScreenRect> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Ellipse { rect, .. } => Some(*rect),
            _ => None,
        })
    }
}
