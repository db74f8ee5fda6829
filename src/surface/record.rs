use super::{DrawMode, Surface, TextAlign};
use crate::error::SurfaceError;
use crate::layout::{Point, Rect};
use crate::theme::{Font, Rgb};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One primitive call, as issued by the renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    AddPage,
    FillColor { color: Rgb },
    StrokeColor { color: Rgb },
    LineWidth { width: f32 },
    Font { font: Font },
    Opacity { opacity: f32 },
    RoundedRect { rect: Rect, radius: f32, mode: DrawMode },
    Circle { center: Point, radius: f32, mode: DrawMode },
    Ellipse { center: Point, rx: f32, ry: f32, mode: DrawMode },
    Line { from: Point, to: Point },
    Triangle { points: [Point; 3], mode: DrawMode },
    Text { text: String, pos: Point, align: TextAlign },
}

#[derive(Debug, Serialize)]
struct CommandDump<'a> {
    pages: usize,
    commands: &'a [DrawCommand],
}

/// Keeps every primitive in order instead of painting it. Used for the
/// `json` output format and for inspecting renderer output in tests.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    pages: usize,
    opacity: f32,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            pages: 0,
            opacity: 1.0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text runs in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|cmd| predicate(cmd)).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&CommandDump {
            pages: self.pages,
            commands: &self.commands,
        })
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Surface for RecordingSurface {
    fn add_page(&mut self) {
        self.pages += 1;
        self.push(DrawCommand::AddPage);
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.push(DrawCommand::FillColor { color });
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.push(DrawCommand::StrokeColor { color });
    }

    fn set_line_width(&mut self, width: f32) {
        self.push(DrawCommand::LineWidth { width });
    }

    fn set_font(&mut self, font: Font) {
        self.push(DrawCommand::Font { font });
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.push(DrawCommand::Opacity { opacity });
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, mode: DrawMode) {
        self.push(DrawCommand::RoundedRect { rect, radius, mode });
    }

    fn circle(&mut self, center: Point, radius: f32, mode: DrawMode) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            mode,
        });
    }

    fn ellipse(&mut self, center: Point, rx: f32, ry: f32, mode: DrawMode) {
        self.push(DrawCommand::Ellipse {
            center,
            rx,
            ry,
            mode,
        });
    }

    fn line(&mut self, from: Point, to: Point) {
        self.push(DrawCommand::Line { from, to });
    }

    fn triangle(&mut self, a: Point, b: Point, c: Point, mode: DrawMode) {
        self.push(DrawCommand::Triangle {
            points: [a, b, c],
            mode,
        });
    }

    fn text(&mut self, text: &str, pos: Point, align: TextAlign) {
        self.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            align,
        });
    }

    fn save(self: Box<Self>, path: &Path) -> Result<Vec<PathBuf>, SurfaceError> {
        let json = self
            .to_json()
            .map_err(|err| SurfaceError::backend(format!("draw command dump: {err}")))?;
        std::fs::write(path, json).map_err(|err| SurfaceError::io(path, err))?;
        Ok(vec![path.to_path_buf()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let mut surface = RecordingSurface::new();
        surface.add_page();
        surface.set_fill_color(Rgb::WHITE);
        surface.text("hello", Point::new(1.0, 2.0), TextAlign::Center);
        assert_eq!(surface.page_count(), 1);
        assert_eq!(surface.commands().len(), 3);
        assert_eq!(surface.texts(), vec!["hello"]);
    }

    #[test]
    fn json_dump_tags_operations() {
        let mut surface = RecordingSurface::new();
        surface.add_page();
        surface.line(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        let json = surface.to_json().unwrap();
        assert!(json.contains("\"op\": \"addPage\""));
        assert!(json.contains("\"op\": \"line\""));
        assert!(json.contains("\"pages\": 1"));
    }
}
