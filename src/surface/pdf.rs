use super::{DrawMode, Surface, TextAlign};
use crate::config::LayoutConfig;
use crate::error::SurfaceError;
use crate::layout::text::{PT_TO_UNIT, text_width};
use crate::layout::{Point, Rect};
use crate::theme::{Font, FontWeight, Rgb, Theme};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{IndirectFontRef, Mm, PdfDocumentReference, PdfLayerReference};
use std::f32::consts::{FRAC_PI_2, PI};
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

const LAYER_NAME: &str = "Report";
const CIRCLE_SEGMENTS: usize = 48;
const CORNER_SEGMENTS: usize = 6;

/// PDF document writer. Page geometry is in millimetres with a top-left
/// origin; printpdf wants bottom-left, so every y is flipped on the way out.
///
/// PDF content streams here carry no soft-mask state, so translucent fills
/// are composited against the page backdrop color before they are emitted.
pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    pages: usize,
    width: f32,
    height: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    fill: Rgb,
    stroke: Rgb,
    font: Font,
    opacity: f32,
    backdrop: Rgb,
    theme: Theme,
    layout: LayoutConfig,
}

impl PdfSurface {
    pub fn new(title: &str, theme: &Theme, layout: &LayoutConfig) -> Result<Self, SurfaceError> {
        let (width, height) = (layout.page_width, layout.page_height);
        let (doc, page, layer) =
            printpdf::PdfDocument::new(title, Mm(width), Mm(height), LAYER_NAME);
        let regular = doc
            .add_builtin_font(printpdf::BuiltinFont::Helvetica)
            .map_err(|err| SurfaceError::backend(format!("font: {err:?}")))?;
        let bold = doc
            .add_builtin_font(printpdf::BuiltinFont::HelveticaBold)
            .map_err(|err| SurfaceError::backend(format!("font: {err:?}")))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            pages: 0,
            width,
            height,
            regular,
            bold,
            fill: Rgb::new(0, 0, 0),
            stroke: Rgb::new(0, 0, 0),
            font: theme.body_font,
            opacity: 1.0,
            backdrop: theme.palette.panel,
            theme: theme.clone(),
            layout: layout.clone(),
        })
    }

    fn to_pdf(&self, point: Point) -> printpdf::Point {
        printpdf::Point::new(Mm(point.x), Mm(self.height - point.y))
    }

    fn effective(&self, color: Rgb) -> printpdf::Color {
        let color = if self.opacity < 1.0 {
            color.over(self.backdrop, self.opacity)
        } else {
            color
        };
        let (r, g, b) = color.to_unit();
        printpdf::Color::Rgb(printpdf::Rgb::new(r, g, b, None))
    }

    fn shape(&self, points: &[Point], mode: DrawMode) {
        let ring: Vec<(printpdf::Point, bool)> =
            points.iter().map(|p| (self.to_pdf(*p), false)).collect();
        match mode {
            DrawMode::Fill => {
                self.layer.set_fill_color(self.effective(self.fill));
                self.layer.add_polygon(printpdf::Polygon {
                    rings: vec![ring],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                });
            }
            DrawMode::Stroke => {
                self.layer.set_outline_color(self.effective(self.stroke));
                self.layer.add_line(printpdf::Line {
                    points: ring,
                    is_closed: true,
                });
            }
        }
    }
}

impl Surface for PdfSurface {
    fn add_page(&mut self) {
        if self.pages > 0 {
            let (page, layer) = self
                .doc
                .add_page(Mm(self.width), Mm(self.height), LAYER_NAME);
            self.layer = self.doc.get_page(page).get_layer(layer);
        }
        self.pages += 1;
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.layer.set_outline_thickness(width / PT_TO_UNIT);
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, mode: DrawMode) {
        self.shape(&rounded_rect_points(rect, radius), mode);
    }

    fn circle(&mut self, center: Point, radius: f32, mode: DrawMode) {
        self.shape(&ellipse_points(center, radius, radius), mode);
    }

    fn ellipse(&mut self, center: Point, rx: f32, ry: f32, mode: DrawMode) {
        self.shape(&ellipse_points(center, rx, ry), mode);
    }

    fn line(&mut self, from: Point, to: Point) {
        self.layer.set_outline_color(self.effective(self.stroke));
        self.layer.add_line(printpdf::Line {
            points: vec![(self.to_pdf(from), false), (self.to_pdf(to), false)],
            is_closed: false,
        });
    }

    fn triangle(&mut self, a: Point, b: Point, c: Point, mode: DrawMode) {
        self.shape(&[a, b, c], mode);
    }

    fn text(&mut self, text: &str, pos: Point, align: TextAlign) {
        let width = text_width(text, self.font, &self.theme, &self.layout);
        let x = match align {
            TextAlign::Left => pos.x,
            TextAlign::Center => pos.x - width / 2.0,
            TextAlign::Right => pos.x - width,
        };
        let font = match self.font.weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        };
        self.layer.set_fill_color(self.effective(self.fill));
        self.layer
            .use_text(text, self.font.size, Mm(x), Mm(self.height - pos.y), font);
    }

    fn save(self: Box<Self>, path: &Path) -> Result<Vec<PathBuf>, SurfaceError> {
        let this = *self;
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut writer = BufWriter::new(cursor);
            this.doc
                .save(&mut writer)
                .map_err(|err| SurfaceError::backend(format!("pdf serialize: {err:?}")))?;
        }
        std::fs::write(path, &buf).map_err(|err| SurfaceError::io(path, err))?;
        tracing::debug!(pages = this.pages, bytes = buf.len(), "pdf written");
        Ok(vec![path.to_path_buf()])
    }
}

fn ellipse_points(center: Point, rx: f32, ry: f32) -> Vec<Point> {
    (0..CIRCLE_SEGMENTS)
        .map(|idx| {
            let angle = 2.0 * PI * idx as f32 / CIRCLE_SEGMENTS as f32;
            Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
        })
        .collect()
}

/// Outline of a rounded rect, clockwise from the top-left corner's end.
fn rounded_rect_points(rect: Rect, radius: f32) -> Vec<Point> {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    if r <= 0.0 {
        return vec![
            rect.origin(),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.bottom()),
            Point::new(rect.x, rect.bottom()),
        ];
    }
    // Corner centers paired with the angle each quarter arc starts at.
    let corners = [
        (Point::new(rect.right() - r, rect.y + r), -FRAC_PI_2),
        (Point::new(rect.right() - r, rect.bottom() - r), 0.0),
        (Point::new(rect.x + r, rect.bottom() - r), FRAC_PI_2),
        (Point::new(rect.x + r, rect.y + r), PI),
    ];
    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (center, start) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let angle = start + FRAC_PI_2 * step as f32 / CORNER_SEGMENTS as f32;
            points.push(center.polar(r, angle));
        }
    }
    points
}
