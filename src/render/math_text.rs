//! Inline math markup: `^{...}` superscripts and `_{...}` subscripts.
//!
//! Anything else, including an unterminated `{`, is literal text.

use smallvec::SmallVec;

use crate::core::{ScreenPoint, ScreenVector, Size};
use crate::render::{
    FontSpec, HorizontalAlignment, RenderContext, TextPrimitive, VerticalAlignment,
};

/// Font size of sub- and superscripts relative to the base font.
pub const SCRIPT_FONT_SCALE: f64 = 0.62;
/// Superscripts are top-aligned with the regular text.
pub const SUPERSCRIPT_OFFSET_SCALE: f64 = 0.0;
/// Downward shift of subscripts relative to the base font size.
pub const SUBSCRIPT_OFFSET_SCALE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathTextRunKind {
    Regular,
    Superscript,
    Subscript,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MathTextRun {
    pub text: String,
    pub font_size_scale: f64,
    pub vertical_offset_scale: f64,
    pub kind: MathTextRunKind,
}

impl MathTextRun {
    fn regular(text: String) -> Self {
        Self {
            text,
            font_size_scale: 1.0,
            vertical_offset_scale: 0.0,
            kind: MathTextRunKind::Regular,
        }
    }

    fn script(text: String, kind: MathTextRunKind) -> Self {
        let vertical_offset_scale = match kind {
            MathTextRunKind::Subscript => SUBSCRIPT_OFFSET_SCALE,
            _ => SUPERSCRIPT_OFFSET_SCALE,
        };
        Self {
            text,
            font_size_scale: SCRIPT_FONT_SCALE,
            vertical_offset_scale,
            kind,
        }
    }

    #[must_use]
    pub fn is_regular(&self) -> bool {
        self.kind == MathTextRunKind::Regular
    }
}

pub type MathTextRuns = SmallVec<[MathTextRun; 4]>;

/// Splits `text` into regular and script runs. Never fails.
#[must_use]
pub fn parse_math_text(text: &str) -> MathTextRuns {
    let mut runs = MathTextRuns::new();
    let mut regular = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        let marker = rest.find("^{").into_iter().chain(rest.find("_{")).min();
        let Some(start) = marker else {
            regular.push_str(rest);
            break;
        };
        let body = &rest[start + 2..];
        let Some(end) = body.find('}') else {
            regular.push_str(rest);
            break;
        };

        regular.push_str(&rest[..start]);
        let content = &body[..end];
        if !content.is_empty() {
            if !regular.is_empty() {
                runs.push(MathTextRun::regular(std::mem::take(&mut regular)));
            }
            let kind = if rest.as_bytes()[start] == b'^' {
                MathTextRunKind::Superscript
            } else {
                MathTextRunKind::Subscript
            };
            runs.push(MathTextRun::script(content.to_owned(), kind));
        }
        rest = &body[end + 1..];
    }

    if !regular.is_empty() {
        runs.push(MathTextRun::regular(regular));
    }
    runs
}

/// A run positioned relative to the top-left corner of the unrotated text box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRun {
    pub run: MathTextRun,
    pub offset: ScreenVector,
    pub size: Size,
    pub font: FontSpec,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MathTextLayout {
    pub runs: SmallVec<[PlacedRun; 4]>,
    /// Unrotated extent of all runs.
    pub size: Size,
}

/// Measures and places the runs of `text`.
///
/// Scripts start at the end of the preceding regular text, so a
/// superscript/subscript pair stacks; regular text resumes after the widest
/// preceding run.
pub fn layout_math_text<C: RenderContext + ?Sized>(
    ctx: &mut C,
    text: &str,
    font: &FontSpec,
) -> MathTextLayout {
    let font = if font.is_valid() {
        font.clone()
    } else {
        font.resolved(&ctx.default_font())
    };

    let mut layout = MathTextLayout::default();
    let mut current_x = 0.0_f64;
    let mut max_x = 0.0_f64;
    let mut height = 0.0_f64;

    for run in parse_math_text(text) {
        let run_font = if run.font_size_scale == 1.0 {
            font.clone()
        } else {
            font.scaled(run.font_size_scale)
        };
        let size = ctx.measure_text(&run.text, &run_font);
        let x = if run.is_regular() { max_x } else { current_x };
        let y = run.vertical_offset_scale * font.size;

        if run.is_regular() {
            current_x = x + size.width;
            max_x = current_x;
        } else {
            max_x = max_x.max(x + size.width);
        }
        height = height.max(y + size.height);

        layout.runs.push(PlacedRun {
            run,
            offset: ScreenVector::new(x, y),
            size,
            font: run_font,
        });
    }
    layout.size = Size::new(max_x, height);
    layout
}

/// Measures `text`; with `angle` the rotated bounding box is returned.
pub fn measure_math_text<C: RenderContext + ?Sized>(
    ctx: &mut C,
    text: &str,
    font: &FontSpec,
    angle: Option<f64>,
) -> Size {
    let size = layout_math_text(ctx, text, font).size;
    match angle {
        Some(angle) => size.rotated_bounds(angle),
        None => size,
    }
}

/// Draws `text.text` with math markup and returns its unrotated size.
///
/// The box is aligned around `text.anchor` before rotation; run offsets are
/// then rotated rigidly around the anchor by `text.rotation`.
pub fn draw_math_text<C: RenderContext + ?Sized>(ctx: &mut C, text: &TextPrimitive) -> Size {
    let layout = layout_math_text(ctx, &text.text, &text.font);
    if layout.runs.is_empty() {
        return Size::EMPTY;
    }

    if let [only] = layout.runs.as_slice() {
        if only.run.is_regular() {
            let mut plain = text.clone();
            plain.font = only.font.clone();
            ctx.draw_text(&plain);
            return layout.size;
        }
    }

    let origin = ScreenPoint::new(
        text.anchor.x + text.h_align.offset(layout.size.width),
        text.anchor.y + text.v_align.offset(layout.size.height),
    );
    let max_width = text.max_size.map(|size| size.width);
    for placed in &layout.runs {
        if max_width.is_some_and(|width| placed.offset.x >= width) {
            continue;
        }
        let position = (origin + placed.offset).rotate_around(text.anchor, text.rotation);
        let run = TextPrimitive::new(placed.run.text.clone(), position, text.color, placed.font.clone())
            .with_rotation(text.rotation)
            .with_alignment(HorizontalAlignment::Left, VerticalAlignment::Top);
        ctx.draw_text(&run);
    }
    layout.size
}
