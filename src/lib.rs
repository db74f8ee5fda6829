pub mod card;
pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod elevation;
pub mod error;
pub mod format;
pub mod icon;
pub mod layout;
pub mod report;
pub mod snapshot;
pub mod surface;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use error::{InvalidChartSpec, ReportError, ReportResult, SurfaceError};
pub use report::{GeneratedReport, ReportAssembler, ReportStage, report_filename};
pub use snapshot::{ReportFilters, ReportSnapshot};
