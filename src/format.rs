//! Number formatting for labels, captions and table cells.

use crate::theme::NumberFormat;

/// `12345` -> `12,345` with the configured separator.
pub fn format_count(value: u64, fmt: &NumberFormat) -> String {
    group_thousands(&value.to_string(), &fmt.thousands_separator)
}

/// Fixed two decimals with the currency symbol in front.
pub fn format_currency(value: f64, fmt: &NumberFormat) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!(
        "{sign}{} {}",
        fmt.currency_symbol,
        format_decimal(value.abs(), 2, fmt)
    )
}

/// Short currency for tight spots: `$ 1.2M`, `$ 48.5k`, `$ 950`.
pub fn format_currency_compact(value: f64, fmt: &NumberFormat) -> String {
    format!("{} {}", fmt.currency_symbol, format_compact(value, fmt))
}

pub fn format_compact(value: f64, fmt: &NumberFormat) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    let (scaled, suffix) = if abs >= 1_000_000_000.0 {
        (abs / 1_000_000_000.0, "B")
    } else if abs >= 1_000_000.0 {
        (abs / 1_000_000.0, "M")
    } else if abs >= 10_000.0 {
        (abs / 1_000.0, "k")
    } else {
        return format!("{sign}{}", format_number(abs, fmt));
    };
    format!("{sign}{}{suffix}", format_decimal(scaled, 1, fmt))
}

/// Whole numbers print without decimals, anything else with one.
pub fn format_number(value: f64, fmt: &NumberFormat) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if (rounded - rounded.round()).abs() < 1e-9 {
        format_decimal(rounded, 0, fmt)
    } else {
        format_decimal(rounded, 1, fmt)
    }
}

pub fn format_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if (rounded - rounded.round()).abs() < 1e-9 {
        format!("{:.0}%", rounded)
    } else {
        format!("{:.1}%", rounded)
    }
}

/// Signed relative change, e.g. `+12.5%`. `None` when there is no baseline.
pub fn format_change(current: f64, previous: f64) -> Option<String> {
    let change = percent_change(current, previous)?;
    let sign = if change > 0.0 { "+" } else { "" };
    Some(format!("{sign}{}", format_percent(change)))
}

pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous.abs() < f64::EPSILON || !current.is_finite() || !previous.is_finite() {
        return None;
    }
    Some((current - previous) / previous.abs() * 100.0)
}

fn format_decimal(value: f64, decimals: usize, fmt: &NumberFormat) -> String {
    let text = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };
    let grouped = group_thousands(int_part, &fmt.thousands_separator);
    match frac_part {
        Some(frac) => format!("{grouped}{}{frac}", fmt.decimal_separator),
        None => grouped,
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}
