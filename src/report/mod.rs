//! Report assembly: a fixed, linear page pipeline driven from one snapshot.

mod charts;
mod cover;
mod metrics;
mod summary;

pub use charts::{area_chart, intake_chart, phase_chart, progress_chart, status_chart};

use crate::config::{Config, LayoutConfig, RenderConfig};
use crate::error::{ReportResult, SurfaceError};
use crate::format::{format_count, format_currency, format_number, format_percent};
use crate::layout::text::truncate_to_width;
use crate::layout::{Point, Rect, content_area};
use crate::snapshot::{ReportFilters, ReportSnapshot, ValueKind};
use crate::surface::{Surface, TextAlign, styled_text};
use crate::theme::{ColorToken, Theme};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Pages in draw order. Every stage but `Done` appends exactly one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStage {
    Cover,
    Metrics,
    Charts,
    Summary,
    Done,
}

impl ReportStage {
    pub const PAGE_COUNT: usize = 4;

    pub fn next(self) -> Self {
        match self {
            ReportStage::Cover => ReportStage::Metrics,
            ReportStage::Metrics => ReportStage::Charts,
            ReportStage::Charts => ReportStage::Summary,
            ReportStage::Summary | ReportStage::Done => ReportStage::Done,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportStage::Cover => "Cover",
            ReportStage::Metrics => "Key metrics",
            ReportStage::Charts => "Charts",
            ReportStage::Summary => "Executive summary",
            ReportStage::Done => "",
        }
    }
}

/// Everything a page composer reads. Nothing in here is mutated while
/// drawing; the surface is passed separately.
pub(crate) struct PageContext<'a> {
    pub theme: &'a Theme,
    pub layout: &'a LayoutConfig,
    pub render: &'a RenderConfig,
    pub snapshot: &'a ReportSnapshot,
    pub filters: &'a ReportFilters,
}

/// Header, body and footer bands of one page.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageFrame {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub(crate) fn page_frame(config: &LayoutConfig) -> PageFrame {
    let content = content_area(config);
    let header = Rect::new(content.x, content.y, content.width, config.header_height);
    let footer = Rect::new(
        content.x,
        content.bottom() - config.footer_height,
        content.width,
        config.footer_height,
    );
    let body = content.inset(
        config.header_height + config.gap,
        0.0,
        config.footer_height + config.gap,
        0.0,
    );
    PageFrame {
        header,
        body,
        footer,
    }
}

type PageComposer = fn(&PageContext<'_>, &mut dyn Surface, &PageFrame) -> ReportResult<()>;

/// Result of a full generation: the composed file name and what the surface
/// actually wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub file_name: String,
    pub paths: Vec<PathBuf>,
}

pub struct ReportAssembler {
    theme: Theme,
    layout: LayoutConfig,
    render: RenderConfig,
}

impl ReportAssembler {
    pub fn new(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
        }
    }

    /// Draws every page onto `surface`. Depends only on the snapshot, the
    /// filters and the configuration.
    #[tracing::instrument(
        skip_all,
        fields(period = %filters.period, jurisdiction = %filters.jurisdiction)
    )]
    pub fn compose(
        &self,
        surface: &mut dyn Surface,
        snapshot: &ReportSnapshot,
        filters: &ReportFilters,
    ) -> ReportResult<()> {
        snapshot.validate()?;
        let ctx = PageContext {
            theme: &self.theme,
            layout: &self.layout,
            render: &self.render,
            snapshot,
            filters,
        };
        let frame = page_frame(&self.layout);

        let mut stage = ReportStage::Cover;
        loop {
            let compose_page: PageComposer = match stage {
                ReportStage::Cover => cover::draw_cover,
                ReportStage::Metrics => metrics::draw_metrics_page,
                ReportStage::Charts => charts::draw_charts_page,
                ReportStage::Summary => summary::draw_summary_page,
                ReportStage::Done => break,
            };
            surface.add_page();
            let page = surface.page_count();
            tracing::debug!(?stage, page, "compose page");
            if stage != ReportStage::Cover {
                draw_page_header(&ctx, surface, &frame, stage.title());
            }
            compose_page(&ctx, surface, &frame)?;
            draw_footer(&ctx, surface, &frame, page);
            stage = stage.next();
        }
        Ok(())
    }

    /// Composes the report and hands the surface to its backend for saving
    /// into `out_dir`. `timestamp` only feeds the file name.
    #[tracing::instrument(skip_all, fields(out_dir = %out_dir.display()))]
    pub fn generate(
        &self,
        mut surface: Box<dyn Surface>,
        snapshot: &ReportSnapshot,
        filters: &ReportFilters,
        out_dir: &Path,
        timestamp: NaiveDateTime,
        extension: &str,
    ) -> ReportResult<GeneratedReport> {
        self.compose(surface.as_mut(), snapshot, filters)?;
        std::fs::create_dir_all(out_dir).map_err(|err| SurfaceError::io(out_dir, err))?;
        let file_name = report_filename(&self.render.product_prefix, timestamp, extension);
        let paths = surface.save(&out_dir.join(&file_name))?;
        tracing::info!(file = %file_name, files = paths.len(), "report written");
        Ok(GeneratedReport { file_name, paths })
    }
}

/// `<prefix>_Analytics_<YYYY-MM-DD_HH-MM>.<ext>`
pub fn report_filename(prefix: &str, timestamp: NaiveDateTime, extension: &str) -> String {
    format!(
        "{}_Analytics_{}.{}",
        prefix.trim(),
        timestamp.format("%Y-%m-%d_%H-%M"),
        extension.trim_start_matches('.')
    )
}

fn draw_page_header(
    ctx: &PageContext<'_>,
    surface: &mut dyn Surface,
    frame: &PageFrame,
    title: &str,
) {
    let theme = ctx.theme;
    let header = frame.header;
    styled_text(
        surface,
        title,
        Point::new(header.x, header.bottom() - 5.0),
        TextAlign::Left,
        theme.title_font.scaled(0.75),
        theme.color(ColorToken::PrimaryDark),
    );
    let caption = format!("{} | {}", ctx.filters.period, ctx.filters.jurisdiction);
    let caption = truncate_to_width(
        &caption,
        header.width * 0.45,
        theme.caption_font,
        theme,
        ctx.layout,
    );
    styled_text(
        surface,
        &caption,
        Point::new(header.right(), header.bottom() - 5.0),
        TextAlign::Right,
        theme.caption_font,
        theme.color(ColorToken::TextMuted),
    );
    surface.set_stroke_color(theme.color(ColorToken::Primary));
    surface.set_line_width(ctx.layout.line_width * 2.0);
    surface.line(
        Point::new(header.x, header.bottom() - 1.5),
        Point::new(header.right(), header.bottom() - 1.5),
    );
}

fn draw_footer(ctx: &PageContext<'_>, surface: &mut dyn Surface, frame: &PageFrame, page: usize) {
    let theme = ctx.theme;
    let footer = frame.footer;
    let muted = theme.color(ColorToken::TextMuted);
    surface.set_stroke_color(theme.color(ColorToken::Border));
    surface.set_line_width(ctx.layout.line_width);
    surface.line(footer.origin(), Point::new(footer.right(), footer.y));

    let baseline = footer.bottom() - 2.0;
    let left = format!(
        "{} | {} | {}",
        ctx.render.product_prefix, ctx.filters.period, ctx.filters.jurisdiction
    );
    let left = truncate_to_width(&left, footer.width * 0.7, theme.small_font, theme, ctx.layout);
    styled_text(
        surface,
        &left,
        Point::new(footer.x, baseline),
        TextAlign::Left,
        theme.small_font,
        muted,
    );
    styled_text(
        surface,
        &format!("Page {page} of {}", ReportStage::PAGE_COUNT),
        Point::new(footer.right(), baseline),
        TextAlign::Right,
        theme.small_font,
        muted,
    );
}

/// Formats a comparison figure by its kind.
pub(crate) fn format_value(value: f64, kind: ValueKind, theme: &Theme) -> String {
    let fmt = &theme.number_format;
    match kind {
        ValueKind::Count if value >= 0.0 && value.fract() == 0.0 => format_count(value as u64, fmt),
        ValueKind::Count => format_number(value, fmt),
        ValueKind::Currency => format_currency(value, fmt),
        ValueKind::Percent => format_percent(value),
    }
}
