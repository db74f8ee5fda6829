use super::cover::display_rate;
use super::{PageContext, PageFrame, format_value};
use crate::card::{CardSpec, draw_card};
use crate::elevation::draw_panel;
use crate::error::ReportResult;
use crate::format::{format_change, format_count, format_currency_compact, percent_change};
use crate::icon::IconKind;
use crate::layout::text::truncate_to_width;
use crate::layout::{LayoutFlow, PageLayoutGrid, Point, Rect};
use crate::snapshot::Comparison;
use crate::surface::{DrawMode, Surface, TextAlign, styled_text};
use crate::theme::ColorToken;

/// Relative column widths of the comparison table.
const COLUMNS: [f32; 4] = [0.4, 0.2, 0.2, 0.2];
const HEADERS: [&str; 4] = ["Metric", "Current", "Previous", "Change"];

pub(super) fn metric_cards(ctx: &PageContext<'_>) -> [CardSpec; 6] {
    let snapshot = ctx.snapshot;
    let fmt = &ctx.theme.number_format;
    let counts = &snapshot.counts;
    let money = &snapshot.financials;
    [
        CardSpec::new(
            "Active cases",
            format_count(counts.active_cases, fmt),
            format!("of {} total", format_count(counts.total_cases, fmt)),
            IconKind::File,
            ColorToken::Primary,
        ),
        CardSpec::new(
            "Closed cases",
            format_count(counts.closed_cases, fmt),
            format!("success rate {}", display_rate(&snapshot.rates.success_rate)),
            IconKind::Check,
            ColorToken::Success,
        ),
        CardSpec::new(
            "Pending deadlines",
            format_count(counts.pending_deadlines, fmt),
            format!("{} hearings scheduled", format_count(counts.hearings_scheduled, fmt)),
            IconKind::Clock,
            ColorToken::Warning,
        ),
        CardSpec::new(
            "Received",
            format_currency_compact(money.received, fmt),
            format!("of {} billed", format_currency_compact(money.billed, fmt)),
            IconKind::Currency,
            ColorToken::Info,
        ),
        CardSpec::new(
            "Outstanding",
            format_currency_compact(money.outstanding, fmt),
            "awaiting payment",
            IconKind::Currency,
            ColorToken::Danger,
        ),
        CardSpec::new(
            "Collection rate",
            display_rate(&snapshot.rates.collection_rate),
            "received over billed",
            IconKind::Trend,
            ColorToken::Accent,
        ),
    ]
}

pub(super) fn draw_metrics_page(
    ctx: &PageContext<'_>,
    surface: &mut dyn Surface,
    frame: &PageFrame,
) -> ReportResult<()> {
    let (theme, layout) = (ctx.theme, ctx.layout);
    let mut flow = LayoutFlow::new(frame.body, layout.gap);

    let grid_height = layout.card_height * 2.0 + layout.gap;
    let cells = PageLayoutGrid::new(3, 2, layout.gap).cells(flow.next(grid_height));
    for (cell, card) in cells.iter().zip(metric_cards(ctx).iter()) {
        draw_card(surface, theme, layout, *cell, card);
    }

    flow.skip(layout.gap);
    let chrome = layout.chart_title_height + layout.chart_padding * 2.0;
    // One row is always taken by the column headers.
    let fitting_rows = ((flow.remaining() - chrome) / layout.table_row_height).floor();
    let capacity = fitting_rows.max(1.0) as usize - 1;
    let comparisons = &ctx.snapshot.comparisons;
    let shown = &comparisons[..comparisons.len().min(capacity)];
    if shown.len() < comparisons.len() {
        tracing::warn!(
            dropped = comparisons.len() - shown.len(),
            "comparison rows do not fit the metrics page"
        );
    }
    let table_height = chrome + layout.table_row_height * (shown.len() + 1) as f32;
    let panel = flow.next(table_height);
    draw_comparison_table(ctx, surface, panel, shown);
    Ok(())
}

fn draw_comparison_table(
    ctx: &PageContext<'_>,
    surface: &mut dyn Surface,
    panel: Rect,
    rows: &[Comparison],
) {
    let (theme, layout) = (ctx.theme, ctx.layout);
    draw_panel(surface, theme, layout, panel, layout.panel_radius);
    let pad = layout.chart_padding;
    styled_text(
        surface,
        "Period comparison",
        Point::new(panel.x + pad, panel.y + pad + 4.5),
        TextAlign::Left,
        theme.heading_font,
        theme.color(ColorToken::Text),
    );

    let table = panel.inset(pad + layout.chart_title_height, pad, pad, pad);
    let row_h = layout.table_row_height;
    let columns = column_rects(table, row_h);
    let text_dy = row_h * 0.65;

    surface.set_fill_color(theme.color(ColorToken::Track));
    surface.rounded_rect(Rect::new(table.x, table.y, table.width, row_h), 1.0, DrawMode::Fill);
    for (idx, (col, header)) in columns.iter().zip(HEADERS).enumerate() {
        let (x, align) = cell_anchor(*col, idx);
        styled_text(
            surface,
            header,
            Point::new(x, table.y + text_dy),
            align,
            theme.caption_font,
            theme.color(ColorToken::TextMuted),
        );
    }

    if rows.is_empty() {
        styled_text(
            surface,
            "No comparison data for this period.",
            Point::new(table.x + 2.0, table.y + row_h + text_dy),
            TextAlign::Left,
            theme.caption_font,
            theme.color(ColorToken::TextMuted),
        );
        return;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let top = table.y + row_h * (row_idx + 1) as f32;
        if row_idx + 1 < rows.len() {
            surface.set_stroke_color(theme.color(ColorToken::Border));
            surface.set_line_width(layout.line_width * 0.6);
            surface.line(
                Point::new(table.x, top + row_h),
                Point::new(table.right(), top + row_h),
            );
        }
        let baseline = top + text_dy;
        let cells = [
            truncate_to_width(&row.label, columns[0].width - 4.0, theme.body_font, theme, layout),
            format_value(row.current, row.kind, theme),
            format_value(row.previous, row.kind, theme),
        ];
        for (idx, text) in cells.iter().enumerate() {
            let (x, align) = cell_anchor(columns[idx], idx);
            styled_text(
                surface,
                text,
                Point::new(x, baseline),
                align,
                theme.body_font,
                theme.color(ColorToken::Text),
            );
        }
        draw_change_cell(ctx, surface, columns[3], baseline, row);
    }
}

fn column_rects(table: Rect, row_height: f32) -> Vec<Rect> {
    let mut x = table.x;
    COLUMNS
        .iter()
        .map(|fraction| {
            let width = table.width * fraction;
            let rect = Rect::new(x, table.y, width, row_height);
            x += width;
            rect
        })
        .collect()
}

/// First column reads left-aligned, figures are right-aligned.
fn cell_anchor(col: Rect, idx: usize) -> (f32, TextAlign) {
    if idx == 0 {
        (col.x + 2.0, TextAlign::Left)
    } else {
        (col.right() - 2.0, TextAlign::Right)
    }
}

fn draw_change_cell(
    ctx: &PageContext<'_>,
    surface: &mut dyn Surface,
    col: Rect,
    baseline: f32,
    row: &Comparison,
) {
    let theme = ctx.theme;
    let Some(change) = percent_change(row.current, row.previous) else {
        styled_text(
            surface,
            "n/a",
            Point::new(col.right() - 2.0, baseline),
            TextAlign::Right,
            theme.body_font,
            theme.color(ColorToken::TextMuted),
        );
        return;
    };
    let (token, up) = if change > 0.0 {
        (ColorToken::Success, Some(true))
    } else if change < 0.0 {
        (ColorToken::Danger, Some(false))
    } else {
        (ColorToken::TextMuted, None)
    };
    let color = theme.color(token);
    let text = format_change(row.current, row.previous).unwrap_or_default();
    styled_text(
        surface,
        &text,
        Point::new(col.right() - 2.0, baseline),
        TextAlign::Right,
        theme.body_font,
        color,
    );

    let arrow = Point::new(col.x + 4.0, baseline - 1.2);
    let half = 1.3;
    surface.set_fill_color(color);
    match up {
        Some(true) => surface.triangle(
            arrow.offset(0.0, -half),
            arrow.offset(half, half),
            arrow.offset(-half, half),
            DrawMode::Fill,
        ),
        Some(false) => surface.triangle(
            arrow.offset(-half, -half),
            arrow.offset(half, -half),
            arrow.offset(0.0, half),
            DrawMode::Fill,
        ),
        None => {
            surface.set_stroke_color(color);
            surface.line(arrow.offset(-half, 0.0), arrow.offset(half, 0.0));
        }
    }
}
