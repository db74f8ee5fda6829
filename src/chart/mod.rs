//! Chart renderers.
//!
//! Every chart shares one frame (elevated panel, title, body rect) and then
//! runs its own body algorithm. Each kind splits into a pure
//! `compute_*_layout` that returns geometry and a `draw_*` that only emits
//! primitives for that geometry.

pub mod bar;
pub mod gantt;
pub mod line;
pub mod pie;

pub use bar::{BarLayout, BarRow, BarSpec, compute_bar_layout};
pub use gantt::{GanttLayout, GanttSpec, Phase, compute_gantt_layout};
pub use line::{LineLayout, LineSpec, compute_line_layout};
pub use pie::{PieLayout, PieSpec, PieStyle, Segment, compute_pie_layout, largest_remainder_percents};

use crate::config::LayoutConfig;
use crate::elevation::draw_panel;
use crate::error::InvalidChartSpec;
use crate::layout::text::{PT_TO_UNIT, truncate_to_width};
use crate::layout::{Point, Rect};
use crate::surface::{Surface, TextAlign, styled_text};
use crate::theme::{ColorToken, Theme};

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Line(LineSpec),
    Pie(PieSpec),
    Donut(PieSpec),
    Bar(BarSpec),
    Gantt(GanttSpec),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Line(spec) => &spec.title,
            ChartSpec::Pie(spec) | ChartSpec::Donut(spec) => &spec.title,
            ChartSpec::Bar(spec) => &spec.title,
            ChartSpec::Gantt(spec) => &spec.title,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ChartSpec::Line(_) => "line",
            ChartSpec::Pie(_) => "pie",
            ChartSpec::Donut(_) => "donut",
            ChartSpec::Bar(_) => "bar",
            ChartSpec::Gantt(_) => "timeline",
        }
    }

    pub fn validate(&self) -> Result<(), InvalidChartSpec> {
        match self {
            ChartSpec::Line(spec) => spec.validate(),
            ChartSpec::Pie(spec) | ChartSpec::Donut(spec) => spec.validate(),
            ChartSpec::Bar(spec) => spec.validate(),
            ChartSpec::Gantt(spec) => spec.validate(),
        }
    }

    /// Extra room carved out of the framed body for axis and end labels,
    /// as (top, right, bottom, left).
    fn body_insets(&self, inner: Rect) -> (f32, f32, f32, f32) {
        match self {
            ChartSpec::Line(_) => (4.0, 2.0, 6.0, 10.0),
            ChartSpec::Pie(_) | ChartSpec::Donut(_) => (0.0, 0.0, 0.0, 0.0),
            ChartSpec::Bar(_) => (0.0, 0.0, 0.0, 0.0),
            ChartSpec::Gantt(_) => (0.0, 0.0, 9.0, gantt::label_column_width(inner)),
        }
    }
}

/// Geometry shared by every chart kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub panel: Rect,
    pub title_pos: Point,
    pub title_width: f32,
    pub body: Rect,
    /// Label column carved out left of the body.
    pub gutter: f32,
}

pub fn compute_chart_frame(
    rect: Rect,
    spec: &ChartSpec,
    theme: &Theme,
    config: &LayoutConfig,
) -> ChartFrame {
    let pad = config.chart_padding;
    let title_size = theme.heading_font.size * PT_TO_UNIT;
    let inner = rect.inset(pad + config.chart_title_height, pad, pad, pad);
    let (top, right, bottom, left) = spec.body_insets(inner);
    ChartFrame {
        panel: rect,
        title_pos: Point::new(rect.x + pad, rect.y + pad + title_size),
        title_width: (rect.width - pad * 2.0).max(0.0),
        body: inner.inset(top, right, bottom, left),
        gutter: left,
    }
}

/// Validates `spec`, then draws the framed chart into `rect`. Nothing is
/// emitted for a spec that fails validation.
pub fn render_chart(
    surface: &mut dyn Surface,
    theme: &Theme,
    config: &LayoutConfig,
    rect: Rect,
    spec: &ChartSpec,
) -> Result<(), InvalidChartSpec> {
    spec.validate()?;
    let frame = compute_chart_frame(rect, spec, theme, config);
    tracing::debug!(kind = spec.kind_name(), title = spec.title(), "render chart");

    draw_panel(surface, theme, config, frame.panel, config.panel_radius);
    let title = truncate_to_width(spec.title(), frame.title_width, theme.heading_font, theme, config);
    styled_text(
        surface,
        &title,
        frame.title_pos,
        TextAlign::Left,
        theme.heading_font,
        theme.color(ColorToken::Text),
    );

    match spec {
        ChartSpec::Line(line_spec) => {
            let layout = compute_line_layout(line_spec, frame.body);
            line::draw_line_chart(surface, theme, config, &layout);
        }
        ChartSpec::Pie(pie_spec) => {
            let layout = compute_pie_layout(pie_spec, frame.body, PieStyle::Pie, config);
            pie::draw_pie_chart(surface, theme, config, &layout);
        }
        ChartSpec::Donut(pie_spec) => {
            let layout = compute_pie_layout(pie_spec, frame.body, PieStyle::Donut, config);
            pie::draw_pie_chart(surface, theme, config, &layout);
        }
        ChartSpec::Bar(bar_spec) => {
            let layout = compute_bar_layout(bar_spec, frame.body, theme, config);
            bar::draw_bar_chart(surface, theme, config, &layout);
        }
        ChartSpec::Gantt(gantt_spec) => {
            let layout = compute_gantt_layout(gantt_spec, frame.body, frame.gutter, config);
            gantt::draw_gantt_chart(surface, theme, config, &layout);
        }
    }
    Ok(())
}

/// Every magnitude on a chart must be finite and non-negative.
pub(crate) fn check_magnitude(chart: &str, label: &str, value: f64) -> Result<(), InvalidChartSpec> {
    if !value.is_finite() {
        return Err(InvalidChartSpec::NonFinite {
            chart: chart.to_string(),
            label: label.to_string(),
        });
    }
    if value < 0.0 {
        return Err(InvalidChartSpec::NegativeValue {
            chart: chart.to_string(),
            label: label.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn line() -> ChartSpec {
        ChartSpec::Line(LineSpec::new(
            "Monthly intake",
            vec![10.0, 20.0, 15.0],
            vec!["Jan".into(), "Feb".into(), "Mar".into()],
        ))
    }

    #[test]
    fn invalid_spec_emits_nothing() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let mut surface = RecordingSurface::new();
        let spec = ChartSpec::Line(LineSpec::new("Empty", Vec::new(), Vec::new()));
        let err = render_chart(
            &mut surface,
            &theme,
            &config,
            Rect::new(14.0, 30.0, 182.0, 80.0),
            &spec,
        )
        .unwrap_err();
        assert!(matches!(err, InvalidChartSpec::EmptySeries { .. }));
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn frame_draws_panel_then_title() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let mut surface = RecordingSurface::new();
        render_chart(
            &mut surface,
            &theme,
            &config,
            Rect::new(14.0, 30.0, 182.0, 80.0),
            &line(),
        )
        .unwrap();
        assert!(matches!(
            surface.commands().iter().find(|c| matches!(c, DrawCommand::RoundedRect { .. } | DrawCommand::Text { .. })),
            Some(DrawCommand::RoundedRect { .. })
        ));
        assert_eq!(surface.texts()[0], "Monthly intake");
    }

    #[test]
    fn body_stays_inside_panel() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let rect = Rect::new(14.0, 30.0, 88.0, 70.0);
        let specs = [
            line(),
            ChartSpec::Pie(PieSpec::new("Status", Vec::new())),
            ChartSpec::Bar(BarSpec::new("Progress", Vec::new())),
            ChartSpec::Gantt(GanttSpec::new("Phases", Vec::new())),
        ];
        for spec in specs {
            let frame = compute_chart_frame(rect, &spec, &theme, &config);
            assert!(rect.contains_rect(&frame.body, 1e-3), "{}", spec.kind_name());
            assert!(frame.body.y > frame.title_pos.y);
        }
    }

    #[test]
    fn magnitude_checks() {
        assert!(check_magnitude("c", "a", 0.0).is_ok());
        assert!(matches!(
            check_magnitude("c", "a", -1.0),
            Err(InvalidChartSpec::NegativeValue { .. })
        ));
        assert!(matches!(
            check_magnitude("c", "a", f64::NAN),
            Err(InvalidChartSpec::NonFinite { .. })
        ));
    }
}
