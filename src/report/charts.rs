use super::{PageContext, PageFrame};
use crate::chart::{
    BarRow, BarSpec, ChartSpec, GanttSpec, LineSpec, Phase, PieSpec, Segment, render_chart,
};
use crate::error::ReportResult;
use crate::layout::{LayoutFlow, grid_slots};
use crate::snapshot::ReportSnapshot;
use crate::surface::Surface;
use crate::theme::ColorToken;

const LINE_BAND: f32 = 72.0;
const PIE_BAND: f32 = 80.0;

pub fn intake_chart(snapshot: &ReportSnapshot) -> ChartSpec {
    ChartSpec::Line(LineSpec::new(
        "Monthly case intake",
        snapshot.monthly_intake.iter().map(|p| p.value).collect(),
        snapshot.monthly_intake.iter().map(|p| p.label.clone()).collect(),
    ))
}

pub fn status_chart(snapshot: &ReportSnapshot) -> ChartSpec {
    ChartSpec::Pie(PieSpec::new(
        "Cases by status",
        snapshot
            .status_breakdown
            .iter()
            .enumerate()
            .map(|(idx, s)| Segment::new(s.label.clone(), s.value, ColorToken::series(idx)))
            .collect(),
    ))
}

pub fn area_chart(snapshot: &ReportSnapshot) -> ChartSpec {
    ChartSpec::Donut(PieSpec::new(
        "Cases by practice area",
        snapshot
            .area_breakdown
            .iter()
            .enumerate()
            // Offset so adjacent charts do not open with the same color.
            .map(|(idx, s)| Segment::new(s.label.clone(), s.value, ColorToken::series(idx + 3)))
            .collect(),
    ))
}

pub fn progress_chart(snapshot: &ReportSnapshot) -> ChartSpec {
    ChartSpec::Bar(BarSpec::new(
        "Targets progress",
        snapshot
            .progress
            .iter()
            .enumerate()
            .map(|(idx, p)| BarRow::new(p.label.clone(), p.value, p.max, ColorToken::series(idx)))
            .collect(),
    ))
}

pub fn phase_chart(snapshot: &ReportSnapshot) -> ChartSpec {
    ChartSpec::Gantt(GanttSpec::new(
        "Average case timeline",
        snapshot
            .phases
            .iter()
            .enumerate()
            .map(|(idx, p)| Phase::new(p.name.clone(), p.duration_days, ColorToken::series(idx)))
            .collect(),
    ))
}

/// Line chart across the page, then pie and donut side by side, then the
/// progress bars next to the timeline.
pub(super) fn draw_charts_page(
    ctx: &PageContext<'_>,
    surface: &mut dyn Surface,
    frame: &PageFrame,
) -> ReportResult<()> {
    let (theme, layout) = (ctx.theme, ctx.layout);
    let mut flow = LayoutFlow::new(frame.body, layout.gap);

    let intake = intake_chart(ctx.snapshot);
    let line_band = flow.next(LINE_BAND);
    if ctx.snapshot.monthly_intake.is_empty() {
        tracing::info!("no monthly intake series, skipping line chart");
    } else {
        render_chart(surface, theme, layout, line_band, &intake)?;
    }

    let pies = grid_slots(flow.next(PIE_BAND), 2, layout.gap);
    let lower = grid_slots(flow.rest(), 2, layout.gap);
    let placed = [
        (pies[0], status_chart(ctx.snapshot)),
        (pies[1], area_chart(ctx.snapshot)),
        (lower[0], progress_chart(ctx.snapshot)),
        (lower[1], phase_chart(ctx.snapshot)),
    ];
    for (rect, spec) in &placed {
        render_chart(surface, theme, layout, *rect, spec)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{InvalidChartSpec, ReportError};
    use crate::report::ReportAssembler;
    use crate::report::tests::sample_snapshot;
    use crate::snapshot::{LabeledValue, ReportFilters};
    use crate::surface::RecordingSurface;

    #[test]
    fn builders_keep_snapshot_order() {
        let snapshot = sample_snapshot();
        let ChartSpec::Gantt(gantt) = phase_chart(&snapshot) else {
            panic!("expected a timeline");
        };
        let names: Vec<&str> = gantt.phases.iter().map(|p| p.name.as_str()).collect();
        let expected: Vec<&str> = snapshot.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn negative_breakdown_fails_the_report() {
        let mut snapshot = sample_snapshot();
        snapshot.status_breakdown.push(LabeledValue {
            label: "Broken".to_string(),
            value: -3.0,
        });
        let assembler = ReportAssembler::new(Config::default());
        let mut surface = RecordingSurface::new();
        let err = assembler
            .compose(&mut surface, &snapshot, &ReportFilters::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidChart(InvalidChartSpec::NegativeValue { .. })
        ));
    }

    #[test]
    fn all_chart_titles_are_drawn() {
        let assembler = ReportAssembler::new(Config::default());
        let mut surface = RecordingSurface::new();
        assembler
            .compose(&mut surface, &sample_snapshot(), &ReportFilters::default())
            .unwrap();
        let texts = surface.texts();
        for title in [
            "Monthly case intake",
            "Cases by status",
            "Cases by practice area",
            "Targets progress",
            "Average case timeline",
        ] {
            assert!(texts.contains(&title), "{title}");
        }
    }
}
