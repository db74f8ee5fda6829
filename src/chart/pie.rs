use super::check_magnitude;
use crate::config::LayoutConfig;
use crate::error::InvalidChartSpec;
use crate::format::format_number;
use crate::layout::text::{PT_TO_UNIT, truncate_to_width};
use crate::layout::{Point, Rect};
use crate::surface::{DrawMode, Surface, TextAlign, styled_text};
use crate::theme::{ColorToken, Theme};
use std::f32::consts::{FRAC_PI_2, TAU};

const SWATCH: f32 = 2.6;
const LEGEND_GAP: f32 = 3.0;
/// Height kept for the disk before any legend row is placed.
const MIN_DISK_HEIGHT: f32 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub label: String,
    pub value: f64,
    pub color: ColorToken,
}

impl Segment {
    pub fn new(label: impl Into<String>, value: f64, color: ColorToken) -> Self {
        Self {
            label: label.into(),
            value,
            color,
        }
    }
}

/// Payload shared by pie and donut charts.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSpec {
    pub title: String,
    pub segments: Vec<Segment>,
}

impl PieSpec {
    pub fn new(title: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            title: title.into(),
            segments,
        }
    }

    pub fn total(&self) -> f64 {
        self.segments.iter().map(|s| s.value).sum()
    }

    pub fn validate(&self) -> Result<(), InvalidChartSpec> {
        for segment in &self.segments {
            check_magnitude(&self.title, &segment.label, segment.value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieStyle {
    Pie,
    Donut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceLayout {
    pub color: ColorToken,
    /// Radians, clockwise from 12 o'clock on a y-down page.
    pub start_angle: f32,
    pub end_angle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub swatch: Rect,
    pub label: String,
    pub label_pos: Point,
    pub percent: u32,
    pub percent_pos: Point,
    pub color: ColorToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieLayout {
    pub style: PieStyle,
    pub center: Point,
    pub radius: f32,
    pub inner_radius: f32,
    pub subdivisions: usize,
    pub total: f64,
    pub slices: Vec<SliceLayout>,
    pub legend: Vec<LegendRow>,
    pub legend_label_width: f32,
}

/// Whole-number shares of `values` that always add up to exactly 100.
///
/// Floors every share, then hands the missing points to the largest
/// remainders (earlier entries win ties). All zeros when the total is zero.
/// This differs from rounding each share on its own: `[1, 1, 1]` gives
/// 34/33/33 rather than 33/33/33, and no share is ever off by more than one.
pub fn largest_remainder_percents(values: &[f64]) -> Vec<u32> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return vec![0; values.len()];
    }
    let raw: Vec<f64> = values.iter().map(|v| v / total * 100.0).collect();
    let mut percents: Vec<u32> = raw.iter().map(|r| r.floor() as u32).collect();
    let assigned: u32 = percents.iter().sum();
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|a, b| {
        let ra = raw[*a] - raw[*a].floor();
        let rb = raw[*b] - raw[*b].floor();
        rb.total_cmp(&ra).then(a.cmp(b))
    });
    for idx in order.into_iter().take(100_u32.saturating_sub(assigned) as usize) {
        percents[idx] += 1;
    }
    percents
}

pub fn compute_pie_layout(
    spec: &PieSpec,
    body: Rect,
    style: PieStyle,
    config: &LayoutConfig,
) -> PieLayout {
    let total = spec.total();
    let wanted = if total > 0.0 { spec.segments.len() } else { 0 };
    let rows = wanted.min(legend_capacity(body, config));
    if rows < wanted {
        tracing::warn!(
            chart = %spec.title,
            dropped = wanted - rows,
            "legend rows do not fit the chart body"
        );
    }

    let legend_height = rows as f32 * config.legend_row_height;
    let legend_gap = if rows > 0 { LEGEND_GAP } else { 0.0 };
    let disk_area = body.inset(0.0, 0.0, legend_height + legend_gap, 0.0);
    let radius = (disk_area.width.min(disk_area.height) / 2.0).max(0.0);
    let center = disk_area.center();
    let inner_radius = match style {
        PieStyle::Pie => 0.0,
        PieStyle::Donut => radius * config.donut_inner_ratio,
    };

    let mut slices = Vec::new();
    let mut legend = Vec::new();
    if total > 0.0 {
        let mut cumulative = 0.0_f64;
        for segment in &spec.segments {
            let start = -FRAC_PI_2 + (cumulative / total) as f32 * TAU;
            cumulative += segment.value;
            let end = -FRAC_PI_2 + (cumulative / total) as f32 * TAU;
            slices.push(SliceLayout {
                color: segment.color,
                start_angle: start,
                end_angle: end,
            });
        }

        let values: Vec<f64> = spec.segments.iter().map(|s| s.value).collect();
        let percents = largest_remainder_percents(&values);
        let legend_top = body.bottom() - legend_height;
        let shown = spec.segments.iter().zip(percents).take(rows);
        for (idx, (segment, percent)) in shown.enumerate() {
            let row_y = legend_top + idx as f32 * config.legend_row_height;
            let mid = row_y + config.legend_row_height / 2.0;
            legend.push(LegendRow {
                swatch: Rect::new(body.x, mid - SWATCH / 2.0, SWATCH, SWATCH),
                label: segment.label.clone(),
                label_pos: Point::new(body.x + SWATCH + 2.0, mid + 0.9),
                percent,
                percent_pos: Point::new(body.right(), mid + 0.9),
                color: segment.color,
            });
        }
    }

    PieLayout {
        style,
        center,
        radius,
        inner_radius,
        subdivisions: config.arc_subdivisions.max(1),
        total,
        slices,
        legend,
        legend_label_width: (body.width - SWATCH - 2.0 - 10.0).max(0.0),
    }
}

/// Legend rows that fit under a disk of at least `MIN_DISK_HEIGHT`.
fn legend_capacity(body: Rect, config: &LayoutConfig) -> usize {
    if config.legend_row_height <= 0.0 {
        return 0;
    }
    let room = body.height - MIN_DISK_HEIGHT.min(body.height) - LEGEND_GAP;
    (room / config.legend_row_height).floor().max(0.0) as usize
}

pub fn draw_pie_chart(
    surface: &mut dyn Surface,
    theme: &Theme,
    config: &LayoutConfig,
    layout: &PieLayout,
) {
    let center = layout.center;
    let outer = layout.radius;
    let inner = layout.inner_radius;

    if layout.slices.is_empty() {
        surface.set_stroke_color(theme.color(ColorToken::Border));
        surface.set_line_width(config.line_width);
        surface.circle(center, outer, DrawMode::Stroke);
        if layout.style == PieStyle::Donut {
            surface.circle(center, inner, DrawMode::Stroke);
        }
    }

    let steps = layout.subdivisions;
    for slice in &layout.slices {
        let span = slice.end_angle - slice.start_angle;
        if span <= 0.0 {
            continue;
        }
        surface.set_fill_color(theme.color(slice.color));
        for step in 0..steps {
            let a0 = slice.start_angle + span * step as f32 / steps as f32;
            let a1 = slice.start_angle + span * (step + 1) as f32 / steps as f32;
            let (o0, o1) = (center.polar(outer, a0), center.polar(outer, a1));
            match layout.style {
                PieStyle::Pie => surface.triangle(center, o0, o1, DrawMode::Fill),
                PieStyle::Donut => {
                    let (i0, i1) = (center.polar(inner, a0), center.polar(inner, a1));
                    surface.triangle(o0, o1, i1, DrawMode::Fill);
                    surface.triangle(o0, i1, i0, DrawMode::Fill);
                }
            }
        }
    }

    let visible = layout
        .slices
        .iter()
        .filter(|s| s.end_angle > s.start_angle)
        .count();
    if visible > 1 {
        surface.set_stroke_color(theme.color(ColorToken::Separator));
        surface.set_line_width(config.line_width * 2.0);
        for slice in &layout.slices {
            surface.line(
                center.polar(inner, slice.start_angle),
                center.polar(outer, slice.start_angle),
            );
        }
    }

    if layout.style == PieStyle::Donut {
        surface.set_fill_color(theme.color(ColorToken::Panel));
        surface.circle(center, inner, DrawMode::Fill);
        let value_size = theme.value_font.size * PT_TO_UNIT;
        styled_text(
            surface,
            &format_number(layout.total, &theme.number_format),
            center.offset(0.0, value_size * 0.35),
            TextAlign::Center,
            theme.value_font,
            theme.color(ColorToken::Text),
        );
        styled_text(
            surface,
            "Total",
            center.offset(0.0, value_size * 0.35 + 3.5),
            TextAlign::Center,
            theme.small_font,
            theme.color(ColorToken::TextMuted),
        );
    }

    for row in &layout.legend {
        surface.set_fill_color(theme.color(row.color));
        surface.rounded_rect(row.swatch, 0.5, DrawMode::Fill);
        let label = truncate_to_width(
            &row.label,
            layout.legend_label_width,
            theme.caption_font,
            theme,
            config,
        );
        styled_text(
            surface,
            &label,
            row.label_pos,
            TextAlign::Left,
            theme.caption_font,
            theme.color(ColorToken::Text),
        );
        styled_text(
            surface,
            &format!("{}%", row.percent),
            row.percent_pos,
            TextAlign::Right,
            theme.caption_font,
            theme.color(ColorToken::TextMuted),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn spec(values: &[f64]) -> PieSpec {
        PieSpec::new(
            "Status",
            values
                .iter()
                .enumerate()
                .map(|(idx, v)| Segment::new(format!("S{idx}"), *v, ColorToken::series(idx)))
                .collect(),
        )
    }

    fn triangles(surface: &RecordingSurface) -> usize {
        surface.count(|c| matches!(c, DrawCommand::Triangle { .. }))
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        for values in [
            vec![1.0, 1.0, 1.0],
            vec![3.0, 3.0, 3.0, 1.0],
            vec![0.5, 99.5],
            vec![7.0, 13.0, 21.0, 1.0, 0.0, 2.0],
        ] {
            let percents = largest_remainder_percents(&values);
            assert_eq!(percents.iter().sum::<u32>(), 100, "{values:?}");
            let total: f64 = values.iter().sum();
            for (v, p) in values.iter().zip(&percents) {
                let exact = v / total * 100.0;
                assert!((exact - *p as f64).abs() < 1.0 + 1e-9, "{exact} vs {p}");
            }
        }
    }

    #[test]
    fn slices_start_at_twelve_and_close_the_circle() {
        let config = LayoutConfig::default();
        let layout = compute_pie_layout(
            &spec(&[1.0, 3.0]),
            Rect::new(0.0, 0.0, 80.0, 80.0),
            PieStyle::Pie,
            &config,
        );
        assert!((layout.slices[0].start_angle + FRAC_PI_2).abs() < 1e-6);
        assert!((layout.slices[1].end_angle - (TAU - FRAC_PI_2)).abs() < 1e-5);
        assert!((layout.slices[0].end_angle - 0.0).abs() < 1e-5);
    }

    #[test]
    fn each_segment_uses_fixed_subdivisions() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let body = Rect::new(0.0, 0.0, 80.0, 80.0);
        let pie = spec(&[2.0, 0.0, 5.0]);

        let mut surface = RecordingSurface::new();
        let layout = compute_pie_layout(&pie, body, PieStyle::Pie, &config);
        draw_pie_chart(&mut surface, &theme, &config, &layout);
        assert_eq!(triangles(&surface), 2 * 30);

        let mut surface = RecordingSurface::new();
        let layout = compute_pie_layout(&pie, body, PieStyle::Donut, &config);
        draw_pie_chart(&mut surface, &theme, &config, &layout);
        assert_eq!(triangles(&surface), 2 * 60);
        assert!(surface.texts().contains(&"Total"));
        assert!(surface.texts().contains(&"7"));
    }

    #[test]
    fn zero_total_draws_ring_without_legend() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        for style in [PieStyle::Pie, PieStyle::Donut] {
            let layout = compute_pie_layout(
                &spec(&[0.0, 0.0]),
                Rect::new(0.0, 0.0, 80.0, 80.0),
                style,
                &config,
            );
            assert!(layout.legend.is_empty());
            let mut surface = RecordingSurface::new();
            draw_pie_chart(&mut surface, &theme, &config, &layout);
            assert_eq!(triangles(&surface), 0);
            assert!(surface.count(|c| matches!(c, DrawCommand::Circle { mode: DrawMode::Stroke, .. })) >= 1);
        }
    }

    #[test]
    fn legend_is_bottom_anchored() {
        let config = LayoutConfig::default();
        let body = Rect::new(0.0, 0.0, 80.0, 80.0);
        let layout = compute_pie_layout(&spec(&[1.0, 2.0, 3.0]), body, PieStyle::Pie, &config);
        assert_eq!(layout.legend.len(), 3);
        let last = layout.legend.last().unwrap();
        assert!(last.swatch.bottom() <= body.bottom() + 1e-4);
        assert!(layout.center.y + layout.radius <= layout.legend[0].swatch.y);
        assert_eq!(layout.legend.iter().map(|r| r.percent).sum::<u32>(), 100);
    }

    #[test]
    fn long_legends_keep_the_disk_and_stay_in_the_body() {
        let config = LayoutConfig::default();
        let body = Rect::new(14.0, 114.0, 78.5, 61.0);
        for count in [12usize, 16, 20, 40] {
            let values: Vec<f64> = (1..=count).map(|v| v as f64).collect();
            for style in [PieStyle::Pie, PieStyle::Donut] {
                let layout = compute_pie_layout(&spec(&values), body, style, &config);
                assert!(layout.radius >= MIN_DISK_HEIGHT / 2.0 - 1e-4, "n={count}");
                assert!(layout.legend.len() < count, "n={count}");
                assert_eq!(layout.slices.len(), count);
                assert!(layout.legend[0].swatch.y >= body.y, "n={count}");
                assert!(layout.center.y + layout.radius <= layout.legend[0].swatch.y);
                for row in &layout.legend {
                    assert!(body.contains_rect(&row.swatch, 1e-3), "n={count}");
                }
            }
        }
    }
}
