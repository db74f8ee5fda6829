//! Waterfall timeline: phases laid end to end, one row each.

use super::check_magnitude;
use crate::config::LayoutConfig;
use crate::error::InvalidChartSpec;
use crate::format::format_number;
use crate::layout::text::{text_width, truncate_to_width};
use crate::layout::{Point, Rect};
use crate::surface::{DrawMode, Surface, TextAlign, styled_text};
use crate::theme::{ColorToken, Theme};

#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub name: String,
    pub duration_days: f64,
    pub color: ColorToken,
}

impl Phase {
    pub fn new(name: impl Into<String>, duration_days: f64, color: ColorToken) -> Self {
        Self {
            name: name.into(),
            duration_days,
            color,
        }
    }
}

/// Phases in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttSpec {
    pub title: String,
    pub phases: Vec<Phase>,
}

impl GanttSpec {
    pub fn new(title: impl Into<String>, phases: Vec<Phase>) -> Self {
        Self {
            title: title.into(),
            phases,
        }
    }

    pub fn total_days(&self) -> f64 {
        self.phases.iter().map(|p| p.duration_days).sum()
    }

    pub fn validate(&self) -> Result<(), InvalidChartSpec> {
        for phase in &self.phases {
            check_magnitude(&self.title, &phase.name, phase.duration_days)?;
        }
        Ok(())
    }
}

/// Width of the phase-name column left of the timeline body.
pub(crate) fn label_column_width(inner: Rect) -> f32 {
    (inner.width * 0.3).min(30.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseBar {
    pub name: String,
    pub name_pos: Point,
    pub bar: Rect,
    pub duration_days: f64,
    pub color: ColorToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GanttLayout {
    pub body: Rect,
    pub total_days: f64,
    pub bars: Vec<PhaseBar>,
    pub gridlines: Vec<f32>,
    pub rows_bottom: f32,
    pub name_width: f32,
}

/// `gutter` is the width of the name column left of `body`.
pub fn compute_gantt_layout(
    spec: &GanttSpec,
    body: Rect,
    gutter: f32,
    config: &LayoutConfig,
) -> GanttLayout {
    let total = spec.total_days();
    let name_width = (gutter - 2.0).max(0.0);
    if total <= 0.0 {
        return GanttLayout {
            body,
            total_days: 0.0,
            bars: Vec::new(),
            gridlines: Vec::new(),
            rows_bottom: body.y,
            name_width,
        };
    }

    let count = spec.phases.len();
    let row_height = config
        .gantt_row_height
        .min(body.height / count.max(1) as f32);
    let thickness = row_height * 0.62;
    let x_at = |days: f64| body.x + body.width * (days / total) as f32;

    let mut bars = Vec::with_capacity(count);
    let mut cumulative = 0.0_f64;
    for (idx, phase) in spec.phases.iter().enumerate() {
        let start = x_at(cumulative);
        cumulative += phase.duration_days;
        // The next row starts exactly where this one ends.
        let end = if idx + 1 == count {
            body.right()
        } else {
            x_at(cumulative)
        };
        let top = body.y + idx as f32 * row_height + (row_height - thickness) / 2.0;
        bars.push(PhaseBar {
            name: phase.name.clone(),
            name_pos: Point::new(body.x - 2.0, top + thickness * 0.8),
            bar: Rect::new(start, top, end - start, thickness),
            duration_days: phase.duration_days,
            color: phase.color,
        });
    }

    let gridlines = (0..=4)
        .map(|quarter| body.x + body.width * quarter as f32 / 4.0)
        .collect();

    GanttLayout {
        body,
        total_days: total,
        bars,
        gridlines,
        rows_bottom: body.y + count as f32 * row_height,
        name_width,
    }
}

pub fn draw_gantt_chart(
    surface: &mut dyn Surface,
    theme: &Theme,
    config: &LayoutConfig,
    layout: &GanttLayout,
) {
    let body = layout.body;
    let fmt = &theme.number_format;
    let muted = theme.color(ColorToken::TextMuted);

    if layout.bars.is_empty() {
        styled_text(
            surface,
            "0 days",
            Point::new(body.center().x, body.center().y),
            TextAlign::Center,
            theme.caption_font,
            muted,
        );
        return;
    }

    surface.set_stroke_color(theme.color(ColorToken::Border));
    surface.set_line_width(config.line_width * 0.6);
    for x in &layout.gridlines {
        surface.line(Point::new(*x, body.y), Point::new(*x, layout.rows_bottom));
    }

    for bar in &layout.bars {
        if bar.bar.width > 0.0 {
            surface.set_fill_color(theme.color(bar.color));
            surface.rounded_rect(
                bar.bar,
                (bar.bar.height / 3.0).min(bar.bar.width / 2.0),
                DrawMode::Fill,
            );
        }
        let name = truncate_to_width(&bar.name, layout.name_width, theme.small_font, theme, config);
        styled_text(
            surface,
            &name,
            bar.name_pos,
            TextAlign::Right,
            theme.small_font,
            theme.color(ColorToken::Text),
        );
        let days = format!("{}d", format_number(bar.duration_days, fmt));
        if text_width(&days, theme.small_font, theme, config) + 2.0 <= bar.bar.width {
            styled_text(
                surface,
                &days,
                Point::new(bar.bar.center().x, bar.name_pos.y),
                TextAlign::Center,
                theme.small_font,
                theme.color(ColorToken::Panel),
            );
        }
    }

    let axis_y = layout.rows_bottom + 3.5;
    styled_text(
        surface,
        "day 0",
        Point::new(body.x, axis_y),
        TextAlign::Left,
        theme.small_font,
        muted,
    );
    styled_text(
        surface,
        &format!("day {}", format_number(layout.total_days, fmt)),
        Point::new(body.right(), axis_y),
        TextAlign::Right,
        theme.small_font,
        muted,
    );
    styled_text(
        surface,
        &format!("Total: {} days", format_number(layout.total_days, fmt)),
        Point::new(body.right(), body.bottom() + 7.5),
        TextAlign::Right,
        theme.caption_font,
        theme.color(ColorToken::Text),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn spec(days: &[f64]) -> GanttSpec {
        GanttSpec::new(
            "Phases",
            days.iter()
                .enumerate()
                .map(|(idx, d)| Phase::new(format!("P{idx}"), *d, ColorToken::series(idx)))
                .collect(),
        )
    }

    #[test]
    fn widths_tile_the_body_in_order() {
        let config = LayoutConfig::default();
        let body = Rect::new(40.0, 20.0, 77.0, 50.0);
        let layout = compute_gantt_layout(&spec(&[12.0, 30.0, 7.0, 0.0, 21.0]), body, 28.0, &config);
        let total_width: f32 = layout.bars.iter().map(|b| b.bar.width).sum();
        assert!((total_width - body.width).abs() <= 1.0);

        let mut running = body.x;
        for bar in &layout.bars {
            assert!((bar.bar.x - running).abs() < 1e-4);
            running = bar.bar.right();
        }
        assert!((running - body.right()).abs() < 1e-3);
        for pair in layout.bars.windows(2) {
            assert!(pair[1].bar.y > pair[0].bar.y);
        }
    }

    #[test]
    fn zero_total_has_no_rows() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let layout = compute_gantt_layout(
            &spec(&[0.0, 0.0]),
            Rect::new(40.0, 20.0, 77.0, 50.0),
            28.0,
            &config,
        );
        assert!(layout.bars.is_empty());
        let mut surface = RecordingSurface::new();
        draw_gantt_chart(&mut surface, &theme, &config, &layout);
        assert_eq!(surface.texts(), vec!["0 days"]);
        assert_eq!(
            surface.count(|c| matches!(c, DrawCommand::RoundedRect { .. })),
            0
        );
    }

    #[test]
    fn end_labels_and_total() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let layout = compute_gantt_layout(
            &spec(&[10.0, 20.0]),
            Rect::new(40.0, 20.0, 77.0, 50.0),
            28.0,
            &config,
        );
        let mut surface = RecordingSurface::new();
        draw_gantt_chart(&mut surface, &theme, &config, &layout);
        let texts = surface.texts();
        assert!(texts.contains(&"day 0"));
        assert!(texts.contains(&"day 30"));
        assert!(texts.contains(&"Total: 30 days"));
        assert_eq!(layout.gridlines.len(), 5);
    }

    #[test]
    fn rows_shrink_to_fit_many_phases() {
        let config = LayoutConfig::default();
        let body = Rect::new(0.0, 0.0, 60.0, 21.0);
        let layout = compute_gantt_layout(&spec(&[1.0; 6]), body, 28.0, &config);
        assert!(layout.rows_bottom <= body.bottom() + 1e-4);
    }
}
