use super::{PageContext, PageFrame, ReportStage};
use crate::card::{CardSpec, draw_card};
use crate::error::ReportResult;
use crate::format::{format_count, format_currency_compact};
use crate::icon::IconKind;
use crate::layout::text::truncate_to_width;
use crate::layout::{LayoutFlow, PageLayoutGrid, Point, Rect, content_area};
use crate::surface::{DrawMode, Surface, TextAlign, styled_text};
use crate::theme::ColorToken;

const BAND_HEIGHT: f32 = 64.0;

pub(super) fn headline_cards(ctx: &PageContext<'_>) -> [CardSpec; 4] {
    let snapshot = ctx.snapshot;
    let fmt = &ctx.theme.number_format;
    [
        CardSpec::new(
            "Total cases",
            format_count(snapshot.counts.total_cases, fmt),
            format!("{} active", format_count(snapshot.counts.active_cases, fmt)),
            IconKind::File,
            ColorToken::Primary,
        ),
        CardSpec::new(
            "Clients",
            format_count(snapshot.counts.clients, fmt),
            format!("{} new this period", format_count(snapshot.counts.new_clients, fmt)),
            IconKind::People,
            ColorToken::Info,
        ),
        CardSpec::new(
            "Billed",
            format_currency_compact(snapshot.financials.billed, fmt),
            format!(
                "{} received",
                format_currency_compact(snapshot.financials.received, fmt)
            ),
            IconKind::Currency,
            ColorToken::Success,
        ),
        CardSpec::new(
            "Success rate",
            display_rate(&snapshot.rates.success_rate),
            "closed cases won or settled",
            IconKind::Check,
            ColorToken::Accent,
        ),
    ]
}

pub(super) fn display_rate(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "n/a".to_string()
    } else {
        trimmed.to_string()
    }
}

pub(super) fn draw_cover(
    ctx: &PageContext<'_>,
    surface: &mut dyn Surface,
    frame: &PageFrame,
) -> ReportResult<()> {
    let (theme, layout) = (ctx.theme, ctx.layout);
    let content = content_area(layout);
    let mut flow = LayoutFlow::new(
        Rect::new(content.x, content.y, content.width, frame.footer.y - content.y),
        layout.gap,
    );

    let band = flow.next(BAND_HEIGHT);
    surface.set_fill_color(theme.color(ColorToken::PrimaryDark));
    surface.rounded_rect(band, layout.panel_radius, DrawMode::Fill);
    let on_band = theme.color(ColorToken::Panel);
    let text_x = band.x + 10.0;
    let text_width = band.width - 20.0;
    let prefix = ctx.render.product_prefix.to_uppercase();
    styled_text(
        surface,
        &truncate_to_width(&prefix, text_width, theme.caption_font, theme, layout),
        Point::new(text_x, band.y + 14.0),
        TextAlign::Left,
        theme.caption_font,
        on_band,
    );
    styled_text(
        surface,
        "Analytics Report",
        Point::new(text_x, band.y + 32.0),
        TextAlign::Left,
        theme.title_font,
        on_band,
    );
    let captions = format!(
        "Period: {}   Jurisdiction: {}",
        ctx.filters.period, ctx.filters.jurisdiction
    );
    styled_text(
        surface,
        &truncate_to_width(&captions, text_width, theme.body_font, theme, layout),
        Point::new(text_x, band.y + 44.0),
        TextAlign::Left,
        theme.body_font,
        on_band,
    );
    styled_text(
        surface,
        &format!("Data as of {}", ctx.snapshot.as_of.format("%d %b %Y")),
        Point::new(text_x, band.y + 53.0),
        TextAlign::Left,
        theme.caption_font,
        on_band,
    );

    flow.skip(4.0);
    let heading = flow.next(8.0);
    styled_text(
        surface,
        "At a glance",
        Point::new(heading.x, heading.bottom() - 2.0),
        TextAlign::Left,
        theme.heading_font,
        theme.color(ColorToken::Text),
    );

    let grid_height = layout.card_height * 2.4 + layout.gap;
    let cells = PageLayoutGrid::new(2, 2, layout.gap)
        .with_margin(layout.gap)
        .cells(flow.next(grid_height));
    for (cell, card) in cells.iter().zip(headline_cards(ctx).iter()) {
        draw_card(surface, theme, layout, *cell, card);
    }

    flow.skip(4.0);
    let contents = flow.next(8.0 + 3.0 * 7.0);
    styled_text(
        surface,
        "Contents",
        Point::new(contents.x, contents.y + 6.0),
        TextAlign::Left,
        theme.heading_font,
        theme.color(ColorToken::Text),
    );
    let mut stage = ReportStage::Metrics;
    let mut row_y = contents.y + 14.0;
    while stage != ReportStage::Done {
        styled_text(
            surface,
            stage.title(),
            Point::new(contents.x + 4.0, row_y),
            TextAlign::Left,
            theme.body_font,
            theme.color(ColorToken::Text),
        );
        styled_text(
            surface,
            &format!("page {}", stage as usize + 1),
            Point::new(contents.right(), row_y),
            TextAlign::Right,
            theme.body_font,
            theme.color(ColorToken::TextMuted),
        );
        row_y += 7.0;
        stage = stage.next();
    }
    Ok(())
}
