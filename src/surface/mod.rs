//! The drawing surface every renderer paints on.
//!
//! A surface is a single-owner, single-pass document cursor: renderers get
//! it as `&mut dyn Surface`, and `save` consumes it. Colors, line width,
//! font and opacity persist until reassigned.

pub mod pdf;
pub mod record;
pub mod svg;

use crate::error::SurfaceError;
use crate::layout::{Point, Rect};
use crate::theme::{Font, Rgb};
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

pub use pdf::PdfSurface;
pub use record::{DrawCommand, RecordingSurface};
pub use svg::SvgSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    Fill,
    Stroke,
}

/// Horizontal anchoring of a text run relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

pub trait Surface {
    /// Starts a new page; subsequent primitives land on it.
    fn add_page(&mut self);
    fn page_count(&self) -> usize;

    fn set_fill_color(&mut self, color: Rgb);
    fn set_stroke_color(&mut self, color: Rgb);
    fn set_line_width(&mut self, width: f32);
    fn set_font(&mut self, font: Font);
    fn opacity(&self) -> f32;
    /// Prefer [`OpacityScope`], which restores the previous value.
    fn set_opacity(&mut self, opacity: f32);

    fn rounded_rect(&mut self, rect: Rect, radius: f32, mode: DrawMode);
    fn circle(&mut self, center: Point, radius: f32, mode: DrawMode);
    fn ellipse(&mut self, center: Point, rx: f32, ry: f32, mode: DrawMode);
    fn line(&mut self, from: Point, to: Point);
    fn triangle(&mut self, a: Point, b: Point, c: Point, mode: DrawMode);
    /// Draws `text` with its baseline at `pos.y`, in the current fill color.
    fn text(&mut self, text: &str, pos: Point, align: TextAlign);

    /// Serializes the document. `path` is the requested output file; some
    /// backends write one file per page next to it. Returns what was written.
    fn save(self: Box<Self>, path: &Path) -> Result<Vec<PathBuf>, SurfaceError>;
}

/// Temporary opacity for a run of draws.
///
/// Derefs to the wrapped surface and puts the previous opacity back when
/// dropped, on every exit path.
pub struct OpacityScope<'a> {
    surface: &'a mut dyn Surface,
    previous: f32,
}

impl<'a> OpacityScope<'a> {
    pub fn new(surface: &'a mut dyn Surface, opacity: f32) -> Self {
        let previous = surface.opacity();
        surface.set_opacity(opacity.clamp(0.0, 1.0));
        Self { surface, previous }
    }
}

impl<'a> Deref for OpacityScope<'a> {
    type Target = dyn Surface + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.surface
    }
}

impl DerefMut for OpacityScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.surface
    }
}

impl Drop for OpacityScope<'_> {
    fn drop(&mut self) {
        self.surface.set_opacity(self.previous);
    }
}

/// Strokes an open polyline through `points`.
pub fn polyline(surface: &mut dyn Surface, points: &[Point]) {
    for pair in points.windows(2) {
        surface.line(pair[0], pair[1]);
    }
}

/// Sets fill color and font, then draws the text run.
pub fn styled_text(
    surface: &mut dyn Surface,
    text: &str,
    pos: Point,
    align: TextAlign,
    font: Font,
    color: Rgb,
) {
    if text.is_empty() {
        return;
    }
    surface.set_font(font);
    surface.set_fill_color(color);
    surface.text(text, pos, align);
}
