use super::check_magnitude;
use crate::config::LayoutConfig;
use crate::error::InvalidChartSpec;
use crate::format::format_number;
use crate::layout::text::truncate_to_width;
use crate::layout::{Point, Rect};
use crate::surface::{DrawMode, Surface, TextAlign, styled_text};
use crate::theme::{ColorToken, Theme};

/// Room kept right of the track for the value label.
const VALUE_COLUMN: f32 = 16.0;

/// One progress row. `max` is the row's own scale ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub label: String,
    pub value: f64,
    pub max: f64,
    pub color: ColorToken,
}

impl BarRow {
    pub fn new(label: impl Into<String>, value: f64, max: f64, color: ColorToken) -> Self {
        Self {
            label: label.into(),
            value,
            max,
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub title: String,
    pub rows: Vec<BarRow>,
}

impl BarSpec {
    pub fn new(title: impl Into<String>, rows: Vec<BarRow>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidChartSpec> {
        for row in &self.rows {
            check_magnitude(&self.title, &row.label, row.value)?;
            if !row.max.is_finite() {
                return Err(InvalidChartSpec::NonFinite {
                    chart: self.title.clone(),
                    label: row.label.clone(),
                });
            }
            if row.max <= 0.0 {
                return Err(InvalidChartSpec::InvalidScale {
                    chart: self.title.clone(),
                    label: row.label.clone(),
                    max: row.max,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarRowLayout {
    pub label: String,
    pub label_pos: Point,
    pub track: Rect,
    pub bar: Rect,
    pub value_text: String,
    pub value_pos: Point,
    pub color: ColorToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub rows: Vec<BarRowLayout>,
    pub label_width: f32,
    /// Rows that did not fit in the body.
    pub dropped: usize,
}

pub fn compute_bar_layout(
    spec: &BarSpec,
    body: Rect,
    theme: &Theme,
    config: &LayoutConfig,
) -> BarLayout {
    let row_height = config.bar_row_height;
    let fits = if row_height > 0.0 {
        ((body.height / row_height).floor() as usize).min(spec.rows.len())
    } else {
        0
    };
    let dropped = spec.rows.len() - fits;
    if dropped > 0 {
        tracing::warn!(chart = %spec.title, dropped, "bar rows do not fit the chart body");
    }

    let track_width = (body.width - VALUE_COLUMN).max(0.0);
    let thickness = config.bar_thickness.min(row_height * 0.5);
    let rows = spec
        .rows
        .iter()
        .take(fits)
        .enumerate()
        .map(|(idx, row)| {
            let top = body.y + idx as f32 * row_height;
            let track = Rect::new(body.x, top + row_height - thickness - 1.0, track_width, thickness);
            let ratio = (row.value / row.max).clamp(0.0, 1.0) as f32;
            BarRowLayout {
                label: row.label.clone(),
                label_pos: Point::new(body.x, track.y - 1.2),
                track,
                bar: Rect::new(track.x, track.y, track.width * ratio, thickness),
                value_text: format_number(row.value, &theme.number_format),
                value_pos: Point::new(body.right(), track.bottom() - 0.4),
                color: row.color,
            }
        })
        .collect();

    BarLayout {
        rows,
        label_width: track_width,
        dropped,
    }
}

pub fn draw_bar_chart(
    surface: &mut dyn Surface,
    theme: &Theme,
    config: &LayoutConfig,
    layout: &BarLayout,
) {
    for row in &layout.rows {
        let radius = row.track.height / 2.0;
        surface.set_fill_color(theme.color(ColorToken::Track));
        surface.rounded_rect(row.track, radius, DrawMode::Fill);
        if row.bar.width > 0.0 {
            surface.set_fill_color(theme.color(row.color));
            surface.rounded_rect(row.bar, radius.min(row.bar.width / 2.0), DrawMode::Fill);
        }
        let label = truncate_to_width(&row.label, layout.label_width, theme.caption_font, theme, config);
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
            &row.value_text,
            row.value_pos,
            TextAlign::Right,
            theme.caption_font,
            theme.color(ColorToken::TextMuted),
        );
    }
}
