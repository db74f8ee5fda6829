use super::{DrawMode, Surface, TextAlign};
use crate::error::SurfaceError;
use crate::layout::text::PT_TO_UNIT;
use crate::layout::{Point, Rect};
use crate::theme::{Font, FontWeight, Rgb};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Builds one SVG document per page. Optionally rasterizes the pages to PNG
/// on save.
pub struct SvgSurface {
    width: f32,
    height: f32,
    font_family: String,
    pages: Vec<String>,
    fill: Rgb,
    stroke: Rgb,
    line_width: f32,
    font: Font,
    opacity: f32,
    png_scale: Option<f32>,
}

impl SvgSurface {
    pub fn new(width: f32, height: f32, font_family: &str) -> Self {
        Self {
            width,
            height,
            font_family: font_family.to_string(),
            pages: Vec::new(),
            fill: Rgb::new(0, 0, 0),
            stroke: Rgb::new(0, 0, 0),
            line_width: 0.3,
            font: Font::regular(10.0),
            opacity: 1.0,
            png_scale: None,
        }
    }

    /// Write PNG files instead of SVG, at `scale` pixels per layout unit.
    pub fn rasterized(mut self, scale: f32) -> Self {
        self.png_scale = Some(scale.max(0.1));
        self
    }

    /// Finished SVG markup for every page so far.
    pub fn pages(&self) -> Vec<String> {
        self.pages.iter().map(|body| self.wrap_page(body)).collect()
    }

    fn wrap_page(&self, body: &str) -> String {
        let (w, h) = (self.width, self.height);
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">{body}</svg>"
        )
    }

    fn current(&mut self) -> &mut String {
        if self.pages.is_empty() {
            self.pages.push(String::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn paint_attrs(&self, mode: DrawMode) -> String {
        match mode {
            DrawMode::Fill => {
                let mut attrs = format!("fill=\"{}\"", self.fill);
                if self.opacity < 1.0 {
                    let _ = write!(attrs, " fill-opacity=\"{:.3}\"", self.opacity);
                }
                attrs
            }
            DrawMode::Stroke => self.stroke_attrs(),
        }
    }

    fn stroke_attrs(&self) -> String {
        let mut attrs = format!(
            "fill=\"none\" stroke=\"{}\" stroke-width=\"{:.3}\" stroke-linecap=\"round\"",
            self.stroke, self.line_width
        );
        if self.opacity < 1.0 {
            let _ = write!(attrs, " stroke-opacity=\"{:.3}\"", self.opacity);
        }
        attrs
    }
}

impl Surface for SvgSurface {
    fn add_page(&mut self) {
        self.pages.push(String::new());
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
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
        let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        let attrs = self.paint_attrs(mode);
        let el = format!(
            "<rect x=\"{:.3}\" y=\"{:.3}\" width=\"{:.3}\" height=\"{:.3}\" rx=\"{radius:.3}\" ry=\"{radius:.3}\" {attrs}/>",
            rect.x, rect.y, rect.width, rect.height
        );
        self.current().push_str(&el);
    }

    fn circle(&mut self, center: Point, radius: f32, mode: DrawMode) {
        let attrs = self.paint_attrs(mode);
        let el = format!(
            "<circle cx=\"{:.3}\" cy=\"{:.3}\" r=\"{:.3}\" {attrs}/>",
            center.x, center.y, radius
        );
        self.current().push_str(&el);
    }

    fn ellipse(&mut self, center: Point, rx: f32, ry: f32, mode: DrawMode) {
        let attrs = self.paint_attrs(mode);
        let el = format!(
            "<ellipse cx=\"{:.3}\" cy=\"{:.3}\" rx=\"{rx:.3}\" ry=\"{ry:.3}\" {attrs}/>",
            center.x, center.y
        );
        self.current().push_str(&el);
    }

    fn line(&mut self, from: Point, to: Point) {
        let attrs = self.stroke_attrs();
        let el = format!(
            "<line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\" {attrs}/>",
            from.x, from.y, to.x, to.y
        );
        self.current().push_str(&el);
    }

    fn triangle(&mut self, a: Point, b: Point, c: Point, mode: DrawMode) {
        let attrs = self.paint_attrs(mode);
        let el = format!(
            "<polygon points=\"{:.3},{:.3} {:.3},{:.3} {:.3},{:.3}\" {attrs}/>",
            a.x, a.y, b.x, b.y, c.x, c.y
        );
        self.current().push_str(&el);
    }

    fn text(&mut self, text: &str, pos: Point, align: TextAlign) {
        let anchor = match align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let weight = match self.font.weight {
            FontWeight::Regular => "normal",
            FontWeight::Bold => "bold",
        };
        let mut el = format!(
            "<text x=\"{:.3}\" y=\"{:.3}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{:.3}\" font-weight=\"{weight}\" fill=\"{}\"",
            pos.x,
            pos.y,
            escape_xml(&self.font_family),
            self.font.size * PT_TO_UNIT,
            self.fill
        );
        if self.opacity < 1.0 {
            let _ = write!(el, " fill-opacity=\"{:.3}\"", self.opacity);
        }
        let _ = write!(el, ">{}</text>", escape_xml(text));
        self.current().push_str(&el);
    }

    fn save(self: Box<Self>, path: &Path) -> Result<Vec<PathBuf>, SurfaceError> {
        let pages = self.pages();
        let targets = page_paths(path, pages.len());
        // Every page is encoded before the first file is touched.
        let encoded = match self.png_scale {
            Some(scale) => pages
                .iter()
                .map(|svg| encode_png(svg, scale))
                .collect::<Result<Vec<_>, _>>()?,
            None => pages.into_iter().map(String::into_bytes).collect(),
        };
        write_all_or_none(&targets, &encoded)?;
        tracing::debug!(pages = targets.len(), "svg pages written");
        Ok(targets)
    }
}

/// Writes `contents[i]` to `targets[i]`. On the first failure the files
/// already written by this call are removed again.
fn write_all_or_none(targets: &[PathBuf], contents: &[Vec<u8>]) -> Result<(), SurfaceError> {
    for (idx, (target, bytes)) in targets.iter().zip(contents).enumerate() {
        if let Err(err) = std::fs::write(target, bytes) {
            for written in &targets[..idx] {
                if let Err(cleanup) = std::fs::remove_file(written) {
                    tracing::warn!(path = %written.display(), %cleanup, "could not remove page");
                }
            }
            return Err(SurfaceError::io(target, err));
        }
    }
    Ok(())
}

/// `report.svg` for a single page, `report-1.svg`, `report-2.svg`, ... otherwise.
pub(crate) fn page_paths(path: &Path, count: usize) -> Vec<PathBuf> {
    if count <= 1 {
        return vec![path.to_path_buf()];
    }
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("page");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("svg");
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    (1..=count)
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx, ext)))
        .collect()
}

#[cfg(feature = "png")]
fn encode_png(svg: &str, scale: f32) -> Result<Vec<u8>, SurfaceError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|err| SurfaceError::backend(format!("svg parse: {err}")))?;
    let size = tree.size().to_int_size();
    let width = ((size.width() as f32) * scale).ceil() as u32;
    let height = ((size.height() as f32) * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| SurfaceError::backend("failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap
        .encode_png()
        .map_err(|err| SurfaceError::backend(format!("png encode: {err}")))
}

#[cfg(not(feature = "png"))]
fn encode_png(_svg: &str, _scale: f32) -> Result<Vec<u8>, SurfaceError> {
    Err(SurfaceError::backend(
        "PNG output not enabled (compile with the 'png' feature)",
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
