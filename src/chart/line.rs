use super::check_magnitude;
use crate::config::LayoutConfig;
use crate::error::InvalidChartSpec;
use crate::format::format_number;
use crate::layout::text::truncate_to_width;
use crate::layout::{Point, Rect};
use crate::surface::{DrawMode, Surface, TextAlign, polyline, styled_text};
use crate::theme::{ColorToken, Theme};

/// Gridlines sit at these fractions of the series maximum.
const GRID_FRACTIONS: [f64; 5] = [1.0, 0.75, 0.5, 0.25, 0.0];
const DOT_RADIUS: f32 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub title: String,
    pub series: Vec<f64>,
    pub labels: Vec<String>,
}

impl LineSpec {
    pub fn new(title: impl Into<String>, series: Vec<f64>, labels: Vec<String>) -> Self {
        Self {
            title: title.into(),
            series,
            labels,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidChartSpec> {
        if self.series.is_empty() {
            return Err(InvalidChartSpec::EmptySeries {
                chart: self.title.clone(),
            });
        }
        if self.series.len() != self.labels.len() {
            return Err(InvalidChartSpec::LabelMismatch {
                chart: self.title.clone(),
                values: self.series.len(),
                labels: self.labels.len(),
            });
        }
        for (value, label) in self.series.iter().zip(&self.labels) {
            check_magnitude(&self.title, label, *value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gridline {
    pub y: f32,
    pub value: f64,
    /// A flat all-zero series keeps the grid but only labels the baseline.
    pub labeled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub pos: Point,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub body: Rect,
    pub max: f64,
    pub gridlines: Vec<Gridline>,
    pub points: Vec<LinePoint>,
    pub categories: Vec<(String, Point)>,
    pub category_width: f32,
}

pub fn compute_line_layout(spec: &LineSpec, body: Rect) -> LineLayout {
    let max = spec.series.iter().copied().fold(0.0_f64, f64::max);
    let n = spec.series.len();

    let gridlines = GRID_FRACTIONS
        .iter()
        .map(|fraction| Gridline {
            y: body.bottom() - *fraction as f32 * body.height,
            value: max * fraction,
            labeled: max > 0.0 || *fraction == 0.0,
        })
        .collect();

    let x_at = |idx: usize| -> f32 {
        if n <= 1 {
            body.center().x
        } else {
            body.x + body.width * idx as f32 / (n - 1) as f32
        }
    };

    let points = if max > 0.0 {
        spec.series
            .iter()
            .enumerate()
            .map(|(idx, value)| LinePoint {
                pos: Point::new(
                    x_at(idx),
                    body.bottom() - (value / max) as f32 * body.height,
                ),
                value: *value,
            })
            .collect()
    } else {
        Vec::new()
    };

    let categories = spec
        .labels
        .iter()
        .enumerate()
        .map(|(idx, label)| (label.clone(), Point::new(x_at(idx), body.bottom() + 4.5)))
        .collect();
    let category_width = if n <= 1 {
        body.width
    } else {
        body.width / (n - 1) as f32
    };

    LineLayout {
        body,
        max,
        gridlines,
        points,
        categories,
        category_width,
    }
}

pub fn draw_line_chart(
    surface: &mut dyn Surface,
    theme: &Theme,
    config: &LayoutConfig,
    layout: &LineLayout,
) {
    let body = layout.body;
    let fmt = &theme.number_format;
    let muted = theme.color(ColorToken::TextMuted);

    surface.set_line_width(config.line_width * 0.6);
    surface.set_stroke_color(theme.color(ColorToken::Border));
    for grid in &layout.gridlines {
        surface.line(Point::new(body.x, grid.y), Point::new(body.right(), grid.y));
        if grid.labeled {
            styled_text(
                surface,
                &format_number(grid.value, fmt),
                Point::new(body.x - 1.5, grid.y + 0.9),
                TextAlign::Right,
                theme.small_font,
                muted,
            );
        }
    }

    // Axes.
    surface.set_line_width(config.line_width);
    surface.set_stroke_color(theme.color(ColorToken::TextMuted));
    surface.line(Point::new(body.x, body.y), Point::new(body.x, body.bottom()));
    surface.line(
        Point::new(body.x, body.bottom()),
        Point::new(body.right(), body.bottom()),
    );

    if !layout.points.is_empty() {
        let series = theme.color(ColorToken::Primary);
        surface.set_stroke_color(series);
        surface.set_line_width(config.line_width * 2.0);
        let path: Vec<Point> = layout.points.iter().map(|p| p.pos).collect();
        polyline(surface, &path);

        for point in &layout.points {
            surface.set_fill_color(series);
            surface.circle(point.pos, DOT_RADIUS, DrawMode::Fill);
            surface.set_fill_color(theme.color(ColorToken::Panel));
            surface.circle(point.pos, DOT_RADIUS * 0.45, DrawMode::Fill);
            styled_text(
                surface,
                &format_number(point.value, fmt),
                point.pos.offset(0.0, -2.0),
                TextAlign::Center,
                theme.small_font,
                theme.color(ColorToken::Text),
            );
        }
    }

    for (label, pos) in &layout.categories {
        let label = truncate_to_width(label, layout.category_width, theme.small_font, theme, config);
        styled_text(surface, &label, *pos, TextAlign::Center, theme.small_font, muted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn spec() -> LineSpec {
        LineSpec::new(
            "Intake",
            vec![10.0, 20.0, 15.0],
            vec!["Jan".into(), "Feb".into(), "Mar".into()],
        )
    }

    #[test]
    fn highest_value_has_smallest_y() {
        let layout = compute_line_layout(&spec(), Rect::new(0.0, 0.0, 90.0, 60.0));
        assert_eq!(layout.points.len(), 3);
        let highest = layout
            .points
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.pos.y.total_cmp(&b.1.pos.y))
            .map(|(idx, _)| idx)
            .unwrap();
        assert_eq!(layout.categories[highest].0, "Feb");
        assert!((layout.points[1].pos.y - 0.0).abs() < 1e-4);
        assert!((layout.points[0].pos.y - 30.0).abs() < 1e-4);
        assert!((layout.points[2].pos.x - 90.0).abs() < 1e-4);
    }

    #[test]
    fn gridline_labels_cover_quartiles() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let layout = compute_line_layout(&spec(), Rect::new(0.0, 0.0, 90.0, 60.0));
        let mut surface = RecordingSurface::new();
        draw_line_chart(&mut surface, &theme, &config, &layout);
        let texts = surface.texts();
        for label in ["20", "15", "10", "5", "0"] {
            assert!(texts.contains(&label), "missing gridline label {label}");
        }
    }

    #[test]
    fn all_zero_series_draws_axes_only() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let zero = LineSpec::new("Flat", vec![0.0, 0.0], vec!["a".into(), "b".into()]);
        let layout = compute_line_layout(&zero, Rect::new(0.0, 0.0, 90.0, 60.0));
        assert!(layout.points.is_empty());
        assert_eq!(layout.gridlines.iter().filter(|g| g.labeled).count(), 1);

        let mut surface = RecordingSurface::new();
        draw_line_chart(&mut surface, &theme, &config, &layout);
        assert_eq!(
            surface.count(|c| matches!(c, DrawCommand::Circle { .. })),
            0
        );
    }

    #[test]
    fn single_point_is_centered_without_segments() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let one = LineSpec::new("One", vec![7.0], vec!["Only".into()]);
        let body = Rect::new(10.0, 10.0, 80.0, 40.0);
        let layout = compute_line_layout(&one, body);
        assert_eq!(layout.points.len(), 1);
        assert!((layout.points[0].pos.x - 50.0).abs() < 1e-4);

        let mut surface = RecordingSurface::new();
        draw_line_chart(&mut surface, &theme, &config, &layout);
        // 5 gridlines + 2 axes, no series segment.
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Line { .. })), 7);
    }

    #[test]
    fn validation_rejects_bad_series() {
        assert!(spec().validate().is_ok());
        let mismatch = LineSpec::new("M", vec![1.0, 2.0], vec!["a".into()]);
        assert!(matches!(
            mismatch.validate(),
            Err(InvalidChartSpec::LabelMismatch { values: 2, labels: 1, .. })
        ));
        let negative = LineSpec::new("N", vec![1.0, -2.0], vec!["a".into(), "b".into()]);
        assert!(matches!(
            negative.validate(),
            Err(InvalidChartSpec::NegativeValue { .. })
        ));
    }
}
