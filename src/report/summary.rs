use super::cover::display_rate;
use super::{PageContext, PageFrame};
use crate::card::{CardSpec, draw_card};
use crate::chart::largest_remainder_percents;
use crate::elevation::draw_panel;
use crate::error::ReportResult;
use crate::format::{format_count, format_currency, format_currency_compact, format_number};
use crate::icon::IconKind;
use crate::layout::text::{PT_TO_UNIT, truncate_to_width, wrap_text};
use crate::layout::{LayoutFlow, Point, Rect, grid_slots};
use crate::snapshot::{ReportSnapshot, Severity};
use crate::surface::{DrawMode, Surface, TextAlign, styled_text};
use crate::theme::{ColorToken, Font, Theme};

const LINE_SPACING: f32 = 1.45;
const ALERT_ROW: f32 = 11.0;

/// Narrative paragraphs derived from the snapshot, in reading order.
pub(crate) fn narrative(
    snapshot: &ReportSnapshot,
    period: &str,
    jurisdiction: &str,
    theme: &Theme,
) -> Vec<String> {
    let fmt = &theme.number_format;
    let counts = &snapshot.counts;
    let money = &snapshot.financials;
    let mut paragraphs = vec![format!(
        "As of {}, the portfolio for {} in {} holds {} cases: {} active and {} closed, \
         with {} clients of whom {} are new.",
        snapshot.as_of.format("%d %b %Y"),
        jurisdiction,
        period,
        format_count(counts.total_cases, fmt),
        format_count(counts.active_cases, fmt),
        format_count(counts.closed_cases, fmt),
        format_count(counts.clients, fmt),
        format_count(counts.new_clients, fmt),
    )];

    paragraphs.push(format!(
        "Billing reached {} with {} received, leaving {} outstanding (collection rate {}).",
        format_currency(money.billed, fmt),
        format_currency(money.received, fmt),
        format_currency(money.outstanding, fmt),
        display_rate(&snapshot.rates.collection_rate),
    ));

    let values: Vec<f64> = snapshot.status_breakdown.iter().map(|s| s.value).collect();
    let shares = largest_remainder_percents(&values);
    // Earliest entry wins ties.
    let largest = snapshot
        .status_breakdown
        .iter()
        .zip(&shares)
        .filter(|(s, _)| s.value > 0.0)
        .reduce(|best, item| if item.0.value > best.0.value { item } else { best });
    if let Some((largest, share)) = largest {
        paragraphs.push(format!(
            "The largest status group is {} with {}% of cases.",
            largest.label, share
        ));
    }

    let intake = &snapshot.monthly_intake;
    if let (Some(first), Some(last)) = (intake.first(), intake.last()) {
        let peak = intake
            .iter()
            .fold(first, |best, p| if p.value > best.value { p } else { best });
        let trend = if last.value > first.value {
            "up"
        } else if last.value < first.value {
            "down"
        } else {
            "flat"
        };
        paragraphs.push(format!(
            "Monthly intake peaked in {} at {} new cases and is {} from {} in {} to {} in {}.",
            peak.label,
            format_number(peak.value, fmt),
            trend,
            format_number(first.value, fmt),
            first.label,
            format_number(last.value, fmt),
            last.label,
        ));
    }

    let total_days: f64 = snapshot.phases.iter().map(|p| p.duration_days).sum();
    let longest = snapshot
        .phases
        .iter()
        .reduce(|best, p| if p.duration_days > best.duration_days { p } else { best });
    if let Some(longest) = longest.filter(|_| total_days > 0.0) {
        paragraphs.push(format!(
            "A typical case runs {} days across {} phases; {} is the longest at {} days.",
            format_number(total_days, fmt),
            snapshot.phases.len(),
            longest.name,
            format_number(longest.duration_days, fmt),
        ));
    }
    paragraphs
}

fn severity_color(severity: Severity) -> ColorToken {
    match severity {
        Severity::Info => ColorToken::Info,
        Severity::Warning => ColorToken::Warning,
        Severity::Critical => ColorToken::Danger,
    }
}

pub(super) fn draw_summary_page(
    ctx: &PageContext<'_>,
    surface: &mut dyn Surface,
    frame: &PageFrame,
) -> ReportResult<()> {
    let (theme, layout) = (ctx.theme, ctx.layout);
    let snapshot = ctx.snapshot;
    let fmt = &theme.number_format;
    let mut flow = LayoutFlow::new(frame.body, layout.gap);

    let paragraphs = narrative(snapshot, &ctx.filters.period, &ctx.filters.jurisdiction, theme);
    let line_height = theme.body_font.size * PT_TO_UNIT * LINE_SPACING;
    let text_width = frame.body.width;
    let mut lines: Vec<Vec<String>> = Vec::with_capacity(paragraphs.len());
    for paragraph in &paragraphs {
        lines.push(wrap_text(paragraph, text_width, theme.body_font, theme, layout));
    }
    let text_height: f32 = lines
        .iter()
        .map(|p| p.len() as f32 * line_height + line_height * 0.6)
        .sum();
    let text_band = flow.next(text_height);
    let mut baseline = text_band.y + line_height * 0.8;
    for paragraph in &lines {
        for line in paragraph {
            if baseline > text_band.bottom() {
                break;
            }
            styled_text(
                surface,
                line,
                Point::new(text_band.x, baseline),
                TextAlign::Left,
                theme.body_font,
                theme.color(ColorToken::Text),
            );
            baseline += line_height;
        }
        baseline += line_height * 0.6;
    }

    let highlights = [
        CardSpec::new(
            "Cases handled",
            format_count(snapshot.counts.total_cases, fmt),
            "all statuses",
            IconKind::File,
            ColorToken::Primary,
        ),
        CardSpec::new(
            "Received",
            format_currency_compact(snapshot.financials.received, fmt),
            "cash in this period",
            IconKind::Currency,
            ColorToken::Success,
        ),
        CardSpec::new(
            "Success rate",
            display_rate(&snapshot.rates.success_rate),
            "of closed cases",
            IconKind::Trend,
            ColorToken::Accent,
        ),
    ];
    let strip = grid_slots(flow.next(layout.card_height), highlights.len(), layout.gap);
    for (slot, card) in strip.iter().zip(highlights.iter()) {
        draw_card(surface, theme, layout, *slot, card);
    }

    let alert_panel = flow.rest();
    draw_alerts(ctx, surface, alert_panel);
    Ok(())
}

fn draw_alerts(ctx: &PageContext<'_>, surface: &mut dyn Surface, panel: Rect) {
    let (theme, layout) = (ctx.theme, ctx.layout);
    if panel.height <= 0.0 {
        return;
    }
    draw_panel(surface, theme, layout, panel, layout.panel_radius);
    let pad = layout.chart_padding;
    styled_text(
        surface,
        "Alerts",
        Point::new(panel.x + pad, panel.y + pad + 4.5),
        TextAlign::Left,
        theme.heading_font,
        theme.color(ColorToken::Text),
    );
    let list = panel.inset(pad + layout.chart_title_height, pad, pad, pad);
    let alerts = &ctx.snapshot.alerts;
    if alerts.is_empty() {
        styled_text(
            surface,
            "No alerts for this period.",
            Point::new(list.x, list.y + 4.0),
            TextAlign::Left,
            theme.body_font,
            theme.color(ColorToken::TextMuted),
        );
        return;
    }

    let capacity = (list.height / ALERT_ROW).floor() as usize;
    if alerts.len() > capacity {
        tracing::warn!(dropped = alerts.len() - capacity, "alerts do not fit the summary page");
    }
    let title_font = Font::bold(theme.body_font.size);
    let text_x = list.x + 6.0;
    let text_width = (list.right() - text_x).max(0.0);
    for (idx, alert) in alerts.iter().take(capacity).enumerate() {
        let top = list.y + idx as f32 * ALERT_ROW;
        let color = theme.color(severity_color(alert.severity));
        surface.set_fill_color(color);
        surface.rounded_rect(Rect::new(list.x, top + 0.5, 1.6, ALERT_ROW - 2.5), 0.8, DrawMode::Fill);
        surface.circle(Point::new(list.x + 3.8, top + 3.0), 0.9, DrawMode::Fill);
        styled_text(
            surface,
            &truncate_to_width(&alert.title, text_width, title_font, theme, layout),
            Point::new(text_x, top + 4.0),
            TextAlign::Left,
            title_font,
            theme.color(ColorToken::Text),
        );
        styled_text(
            surface,
            &truncate_to_width(&alert.detail, text_width, theme.caption_font, theme, layout),
            Point::new(text_x, top + 8.0),
            TextAlign::Left,
            theme.caption_font,
            theme.color(ColorToken::TextMuted),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::report::page_frame;
    use crate::report::tests::sample_snapshot;
    use crate::snapshot::{Alert, ReportFilters};
    use crate::surface::{DrawCommand, RecordingSurface};

    fn render(snapshot: &ReportSnapshot) -> RecordingSurface {
        let config = Config::default();
        let filters = ReportFilters::new("Q3 2026", "Federal");
        let ctx = PageContext {
            theme: &config.theme,
            layout: &config.layout,
            render: &config.render,
            snapshot,
            filters: &filters,
        };
        let mut surface = RecordingSurface::new();
        surface.add_page();
        draw_summary_page(&ctx, &mut surface, &page_frame(&config.layout)).unwrap();
        surface
    }

    #[test]
    fn narrative_mentions_filters_and_totals() {
        let snapshot = sample_snapshot();
        let paragraphs = narrative(&snapshot, "Q3 2026", "Federal", &Theme::corporate());
        assert!(paragraphs[0].contains("Federal"));
        assert!(paragraphs[0].contains("Q3 2026"));
        assert!(paragraphs.iter().any(|p| p.starts_with("Billing reached")));
        assert!(paragraphs.iter().any(|p| p.starts_with("Monthly intake peaked")));
    }

    #[test]
    fn empty_series_skip_their_paragraphs() {
        let mut snapshot = sample_snapshot();
        snapshot.monthly_intake.clear();
        snapshot.status_breakdown.clear();
        snapshot.phases.clear();
        let paragraphs = narrative(&snapshot, "p", "j", &Theme::corporate());
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn alerts_use_severity_colors() {
        let theme = Theme::corporate();
        let mut snapshot = sample_snapshot();
        snapshot.alerts = vec![Alert {
            title: "Filing deadline tomorrow".to_string(),
            detail: "Three filings are due within 24 hours.".to_string(),
            severity: Severity::Critical,
        }];
        let surface = render(&snapshot);
        let texts = surface.texts();
        assert!(texts.contains(&"Filing deadline tomorrow"));
        let marker = surface
            .commands()
            .iter()
            .position(|c| matches!(c, DrawCommand::Text { text, .. } if text == "Filing deadline tomorrow"))
            .unwrap();
        let before = &surface.commands()[..marker];
        let dot = before
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Circle { .. }))
            .unwrap();
        let dot_color = before[..dot].iter().rev().find_map(|c| match c {
            DrawCommand::FillColor { color } => Some(*color),
            _ => None,
        });
        assert_eq!(dot_color, Some(theme.palette.danger));
    }

    #[test]
    fn no_alerts_placeholder() {
        let mut snapshot = sample_snapshot();
        snapshot.alerts.clear();
        let surface = render(&snapshot);
        assert!(surface.texts().contains(&"No alerts for this period."));
    }
}
