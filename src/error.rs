use std::path::PathBuf;

/// Convenience result type for report generation.
pub type ReportResult<T> = Result<T, ReportError>;

/// A chart payload that breaks its own contract. Raised before any primitive
/// for that chart is emitted.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidChartSpec {
    /// Line charts need at least one point.
    #[error("line chart '{chart}' has no data points")]
    EmptySeries { chart: String },

    /// Every line point needs exactly one category label.
    #[error("line chart '{chart}' has {values} values but {labels} labels")]
    LabelMismatch {
        chart: String,
        values: usize,
        labels: usize,
    },

    /// Negative magnitudes have no meaning for any of the chart kinds.
    #[error("{chart}: value for '{label}' is negative ({value})")]
    NegativeValue {
        chart: String,
        label: String,
        value: f64,
    },

    #[error("{chart}: value for '{label}' is not a finite number")]
    NonFinite { chart: String, label: String },

    /// Bar rows carry their own scale ceiling, which must be positive.
    #[error("bar chart '{chart}': row '{label}' has scale ceiling {max}, expected > 0")]
    InvalidScale {
        chart: String,
        label: String,
        max: f64,
    },
}

/// Failures raised by a drawing surface while serializing.
#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document backend error: {0}")]
    Backend(String),
}

impl SurfaceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Top-level error taxonomy for report generation.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    InvalidChart(#[from] InvalidChartSpec),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("invalid snapshot JSON")]
    Json(#[from] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    Snapshot(String),
}

impl ReportError {
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_errors_read_naturally() {
        let err = InvalidChartSpec::InvalidScale {
            chart: "Deadlines".to_string(),
            label: "Filed".to_string(),
            max: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "bar chart 'Deadlines': row 'Filed' has scale ceiling 0, expected > 0"
        );
    }

    #[test]
    fn report_error_is_transparent_over_chart_errors() {
        let err: ReportError = InvalidChartSpec::EmptySeries {
            chart: "Monthly".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "line chart 'Monthly' has no data points");
    }

    #[test]
    fn json_errors_keep_their_source() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ReportError::from(parse);
        assert_eq!(err.to_string(), "invalid snapshot JSON");
        let source = std::error::Error::source(&err).expect("serde_json error as source");
        assert!(source.to_string().contains("EOF"));
    }
}
