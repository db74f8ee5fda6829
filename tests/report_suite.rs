use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use report_rs_renderer::chart::{
    ChartSpec, GanttSpec, LineSpec, Phase, PieSpec, PieStyle, Segment, compute_gantt_layout,
    compute_line_layout, compute_pie_layout, render_chart,
};
use report_rs_renderer::config::{Config, LayoutConfig};
use report_rs_renderer::layout::{Rect, content_area, grid_slots};
use report_rs_renderer::surface::{DrawCommand, PdfSurface, RecordingSurface, Surface, SvgSurface};
use report_rs_renderer::theme::{ColorToken, Theme};
use report_rs_renderer::{
    InvalidChartSpec, ReportAssembler, ReportError, ReportFilters, ReportSnapshot,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> ReportSnapshot {
    let path = fixture_path(name);
    let text = std::fs::read_to_string(&path).expect("fixture read failed");
    ReportSnapshot::from_json(&text).expect("fixture parse failed")
}

fn record(snapshot: &ReportSnapshot) -> RecordingSurface {
    let assembler = ReportAssembler::new(Config::default());
    let mut surface = RecordingSurface::new();
    assembler
        .compose(&mut surface, snapshot, &ReportFilters::new("Q3 2026", "Federal"))
        .expect("compose failed");
    surface
}

fn out_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("report-rs-renderer-suite")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    for name in ["quarterly.json", "empty.json"] {
        assert!(fixture_path(name).exists(), "fixture missing: {name}");
        let surface = record(&load(name));
        assert_eq!(surface.page_count(), 4, "{name}");
        assert_eq!(surface.opacity(), 1.0, "{name}");
    }
}

#[test]
fn compositions_are_identical() {
    let snapshot = load("quarterly.json");
    let first = record(&snapshot);
    let second = record(&snapshot);
    assert_eq!(first.commands(), second.commands());
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn zero_totals_render_without_rows() {
    let surface = record(&load("empty.json"));
    let texts = surface.texts();
    assert!(texts.contains(&"0 days"));
    assert!(!texts.iter().any(|t| t.ends_with('%')), "no legend rows expected");
    assert!(!texts.iter().any(|t| t.starts_with("Total: ")));
    assert_eq!(
        surface.count(|c| matches!(c, DrawCommand::Triangle { .. })),
        0
    );
}

#[test]
fn invalid_bar_scale_is_reported() {
    let assembler = ReportAssembler::new(Config::default());
    let mut surface = RecordingSurface::new();
    let err = assembler
        .compose(
            &mut surface,
            &load("invalid_scale.json"),
            &ReportFilters::default(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::InvalidChart(InvalidChartSpec::InvalidScale { .. })
    ));
    assert!(err.to_string().contains("Unbounded target"));
}

#[test]
fn placement_rects_stay_within_margins() {
    let config = LayoutConfig::default();
    let area = content_area(&config);
    let surface = record(&load("quarterly.json"));
    for cmd in surface.commands() {
        if let DrawCommand::RoundedRect { rect, .. } = cmd {
            // Drop shadows reach at most one unit past their panel.
            assert!(
                area.inset_uniform(-1.0).contains_rect(rect, 1e-3),
                "{rect:?} escapes the content area"
            );
        }
    }
}

#[test]
fn grid_slots_tile_the_width() {
    let area = Rect::new(14.0, 40.0, 182.0, 30.0);
    for n in 1..=6 {
        let slots = grid_slots(area, n, 5.0);
        assert_eq!(slots.len(), n);
        for pair in slots.windows(2) {
            assert!(!pair[0].overlaps(&pair[1]));
        }
        let covered: f32 = slots.iter().map(|s| s.width).sum::<f32>() + 5.0 * (n - 1) as f32;
        assert!((covered - area.width).abs() < 1e-3);
        assert!(slots.last().unwrap().right() <= area.right() + 1e-4);
    }
}

#[test]
fn line_chart_scenario() {
    let spec = LineSpec::new(
        "Intake",
        vec![10.0, 20.0, 15.0],
        vec!["Jan".into(), "Feb".into(), "Mar".into()],
    );
    let layout = compute_line_layout(&spec, Rect::new(0.0, 0.0, 90.0, 60.0));
    let min_y = layout
        .points
        .iter()
        .map(|p| p.pos.y)
        .fold(f32::INFINITY, f32::min);
    assert_eq!(layout.points[1].pos.y, min_y);
    let labels: Vec<f64> = layout.gridlines.iter().map(|g| g.value).collect();
    assert_eq!(labels, vec![20.0, 15.0, 10.0, 5.0, 0.0]);
}

#[test]
fn pie_percentages_and_timeline_widths() {
    let config = LayoutConfig::default();
    let pie = PieSpec::new(
        "Areas",
        [3.0, 3.0, 3.0]
            .iter()
            .enumerate()
            .map(|(i, v)| Segment::new(format!("A{i}"), *v, ColorToken::series(i)))
            .collect(),
    );
    let layout = compute_pie_layout(&pie, Rect::new(0.0, 0.0, 80.0, 90.0), PieStyle::Donut, &config);
    assert_eq!(layout.legend.iter().map(|r| r.percent).sum::<u32>(), 100);

    let gantt = GanttSpec::new(
        "Phases",
        [5.0, 11.0, 3.0]
            .iter()
            .enumerate()
            .map(|(i, d)| Phase::new(format!("P{i}"), *d, ColorToken::series(i)))
            .collect(),
    );
    let body = Rect::new(30.0, 0.0, 55.0, 40.0);
    let timeline = compute_gantt_layout(&gantt, body, 24.0, &config);
    let widths: f32 = timeline.bars.iter().map(|b| b.bar.width).sum();
    assert!((widths - body.width).abs() <= 1.0);
    let mut start = body.x;
    for bar in &timeline.bars {
        assert!((bar.bar.x - start).abs() < 1e-4);
        start += bar.bar.width;
    }
}

#[test]
fn chart_errors_leave_surface_untouched() {
    let theme = Theme::corporate();
    let config = LayoutConfig::default();
    let mut surface = RecordingSurface::new();
    let spec = ChartSpec::Pie(PieSpec::new(
        "Broken",
        vec![Segment::new("neg", -1.0, ColorToken::Primary)],
    ));
    assert!(render_chart(&mut surface, &theme, &config, Rect::new(0.0, 0.0, 80.0, 80.0), &spec).is_err());
    assert!(surface.commands().is_empty());
}

#[test]
fn generate_pdf_and_svg_files() {
    let config = Config::default();
    let assembler = ReportAssembler::new(config.clone());
    let snapshot = load("quarterly.json");
    let filters = ReportFilters::new("Q3 2026", "Federal");
    let stamp = NaiveDate::from_ymd_opt(2026, 10, 17)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap();

    let dir = out_dir("pdf");
    let pdf = PdfSurface::new("Report Analytics", &config.theme, &config.layout).unwrap();
    let report = assembler
        .generate(Box::new(pdf), &snapshot, &filters, &dir, stamp, "pdf")
        .unwrap();
    assert_eq!(report.file_name, "Report_Analytics_2026-10-17_14-30.pdf");
    let bytes = std::fs::read(&report.paths[0]).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let dir = out_dir("svg");
    let svg = SvgSurface::new(
        config.layout.page_width,
        config.layout.page_height,
        &config.theme.font_family,
    );
    let report = assembler
        .generate(Box::new(svg), &snapshot, &filters, &dir, stamp, "svg")
        .unwrap();
    assert_eq!(report.paths.len(), 4);
    for path in &report.paths {
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("<svg"));
        assert!(text.ends_with("</svg>"));
    }
    assert!(
        report.paths[3]
            .to_string_lossy()
            .ends_with("Report_Analytics_2026-10-17_14-30-4.svg")
    );
}
