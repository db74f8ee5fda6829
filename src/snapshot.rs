//! Input model: the aggregated business payload a report is drawn from.
//!
//! Snapshots arrive as camelCase JSON. Every collection defaults to empty so
//! partial exports still render.

use crate::error::{ReportError, ReportResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    pub as_of: NaiveDate,
    #[serde(default)]
    pub counts: Counts,
    #[serde(default)]
    pub financials: Financials,
    #[serde(default)]
    pub rates: Rates,
    #[serde(default)]
    pub monthly_intake: Vec<LabeledValue>,
    #[serde(default)]
    pub status_breakdown: Vec<LabeledValue>,
    #[serde(default)]
    pub area_breakdown: Vec<LabeledValue>,
    #[serde(default)]
    pub progress: Vec<ProgressInput>,
    #[serde(default)]
    pub phases: Vec<PhaseInput>,
    #[serde(default)]
    pub comparisons: Vec<Comparison>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Counts {
    pub total_cases: u64,
    pub active_cases: u64,
    pub closed_cases: u64,
    pub clients: u64,
    pub new_clients: u64,
    pub pending_deadlines: u64,
    pub hearings_scheduled: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Financials {
    pub billed: f64,
    pub received: f64,
    pub outstanding: f64,
}

/// Ratios as the aggregation layer exports them, e.g. `"72.5%"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rates {
    pub success_rate: String,
    pub collection_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInput {
    pub label: String,
    pub value: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseInput {
    pub name: String,
    pub duration_days: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    #[default]
    Count,
    Currency,
    Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub label: String,
    pub current: f64,
    pub previous: f64,
    #[serde(default)]
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub title: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub severity: Severity,
}

/// Display-only captions; they never change what is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilters {
    pub period: String,
    pub jurisdiction: String,
}

impl ReportFilters {
    pub fn new(period: impl Into<String>, jurisdiction: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            jurisdiction: jurisdiction.into(),
        }
    }
}

impl Default for ReportFilters {
    fn default() -> Self {
        Self::new("All periods", "All jurisdictions")
    }
}

impl ReportSnapshot {
    pub fn from_json(text: &str) -> ReportResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Checks what chart validation cannot see: the exported ratio strings
    /// and the comparison figures.
    pub fn validate(&self) -> ReportResult<()> {
        for (name, raw) in [
            ("successRate", &self.rates.success_rate),
            ("collectionRate", &self.rates.collection_rate),
        ] {
            if !raw.trim().is_empty() && parse_percent(raw).is_none() {
                return Err(ReportError::snapshot(format!(
                    "rate {name} is not a percentage: '{raw}'"
                )));
            }
        }
        for row in &self.comparisons {
            if !row.current.is_finite() || !row.previous.is_finite() {
                return Err(ReportError::snapshot(format!(
                    "comparison '{}' has a non-finite value",
                    row.label
                )));
            }
        }
        let f = &self.financials;
        if [f.billed, f.received, f.outstanding].iter().any(|v| !v.is_finite()) {
            return Err(ReportError::snapshot("financial totals must be finite"));
        }
        Ok(())
    }
}

/// `"72.5%"`, `"72,5 %"` or `"72.5"` -> `72.5`.
pub fn parse_percent(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let value: f64 = number.replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_snapshot_defaults_collections() {
        let snapshot = ReportSnapshot::from_json(r#"{ "asOf": "2026-09-30" }"#).unwrap();
        assert_eq!(snapshot.as_of, NaiveDate::from_ymd_opt(2026, 9, 30).unwrap());
        assert!(snapshot.monthly_intake.is_empty());
        assert_eq!(snapshot.counts, Counts::default());
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn parses_camel_case_fields() {
        let snapshot = ReportSnapshot::from_json(
            r#"{
                "asOf": "2026-01-31",
                "counts": { "totalCases": 12, "activeCases": 7 },
                "rates": { "successRate": "72.5%" },
                "phases": [{ "name": "Filing", "durationDays": 14 }],
                "comparisons": [{ "label": "Billed", "current": 10, "previous": 8, "kind": "currency" }],
                "alerts": [{ "title": "Deadline", "severity": "critical" }]
            }"#,
        )
        .unwrap();
        assert_eq!(snapshot.counts.total_cases, 12);
        assert_eq!(parse_percent(&snapshot.rates.success_rate), Some(72.5));
        assert_eq!(snapshot.phases[0].duration_days, 14.0);
        assert_eq!(snapshot.comparisons[0].kind, ValueKind::Currency);
        assert_eq!(snapshot.alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn percent_strings() {
        assert_eq!(parse_percent("72.5%"), Some(72.5));
        assert_eq!(parse_percent(" 40 % "), Some(40.0));
        assert_eq!(parse_percent("12,5%"), Some(12.5));
        assert_eq!(parse_percent("n/a"), None);
    }

    #[test]
    fn malformed_rate_is_rejected() {
        let mut snapshot = ReportSnapshot::from_json(r#"{ "asOf": "2026-09-30" }"#).unwrap();
        snapshot.rates.collection_rate = "most".to_string();
        assert!(matches!(snapshot.validate(), Err(ReportError::Snapshot(_))));
    }

    #[test]
    fn bad_json_keeps_the_parser_error() {
        let err = ReportSnapshot::from_json("{").unwrap_err();
        assert!(matches!(err, ReportError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
