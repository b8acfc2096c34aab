//! Value normalization and reference-range classification.

use std::sync::LazyLock;

use regex::Regex;

use labclip_model::{ItemType, ReferenceBounds, ValueStatus};

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?\d+(?:\.\d+)?$").expect("decimal regex"));

static NUMERIC_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?\d+(?:\.\d+)?").expect("numeric prefix regex"));

/// Parse a string that is entirely a plain decimal. Annotated values like
/// `"126(normal)"` do not qualify.
pub fn parse_decimal(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if !DECIMAL_RE.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Format a number without insignificant trailing zeros: `120.00` -> `"120"`,
/// `10.50` -> `"10.5"`.
pub fn format_decimal(value: f64) -> String {
    let rendered = format!("{value}");
    if rendered.contains('.') {
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        rendered
    }
}

/// Clean a raw reading: plain decimals are round-tripped through float
/// parsing to drop trailing zeros, everything else passes through verbatim.
pub fn normalize_value(raw: &str) -> String {
    match parse_decimal(raw) {
        Some(value) => format_decimal(value),
        None => raw.to_string(),
    }
}

/// Extract the leading decimal of an annotated value, e.g.
/// `"126(normal)"` -> `"126"`. Returns `None` when the value has no numeric
/// prefix at all.
pub fn numeric_prefix(raw: &str) -> Option<String> {
    NUMERIC_PREFIX_RE
        .find(raw.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(format_decimal)
}

/// Classify a reading against resolved bounds.
///
/// No bounds means no judgment applies, so the reading is Normal. A bound
/// that did not resolve is skipped. Values exactly equal to a bound are
/// Normal; only strict exceedance flips the status.
pub fn classify(value: &str, bounds: Option<&ReferenceBounds>) -> ValueStatus {
    let Some(bounds) = bounds else {
        return ValueStatus::Normal;
    };
    let Some(value) = parse_decimal(value) else {
        return ValueStatus::Normal;
    };
    if let Some(max) = bounds.max
        && value > max
    {
        return ValueStatus::High;
    }
    if let Some(min) = bounds.min
        && value < min
    {
        return ValueStatus::Low;
    }
    ValueStatus::Normal
}

/// Result of collapsing repeat readings onto one item.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedReading {
    pub value: String,
    pub status: ValueStatus,
    pub item_type: ItemType,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Merge repeat readings for the same (date, facility, order, item) into one
/// rendered value.
///
/// All-numeric readings collapse to their min/max spread: the value renders
/// `"min-max"` (a single value when min == max), High fires when the merged
/// max strictly exceeds the upper bound, Low when the merged min falls
/// strictly below the lower bound (High wins when both fire). Any
/// non-numeric reading makes the merge qualitative: values join with `", "`
/// and the status stays Normal.
pub fn merge_readings(values: &[String], bounds: Option<&ReferenceBounds>) -> MergedReading {
    let numeric: Vec<f64> = values.iter().filter_map(|v| parse_decimal(v)).collect();
    if numeric.len() != values.len() || numeric.is_empty() {
        return MergedReading {
            value: values.join(", "),
            status: ValueStatus::Normal,
            item_type: ItemType::Qualitative,
            min: None,
            max: None,
        };
    }
    let min = numeric.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numeric.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let value = if min == max {
        format_decimal(min)
    } else {
        format!("{}-{}", format_decimal(min), format_decimal(max))
    };
    let status = merged_status(min, max, bounds);
    MergedReading {
        value,
        status,
        item_type: ItemType::Numeric,
        min: Some(min),
        max: Some(max),
    }
}

fn merged_status(min: f64, max: f64, bounds: Option<&ReferenceBounds>) -> ValueStatus {
    let Some(bounds) = bounds else {
        return ValueStatus::Normal;
    };
    if let Some(upper) = bounds.max
        && max > upper
    {
        return ValueStatus::High;
    }
    if let Some(lower) = bounds.min
        && min < lower
    {
        return ValueStatus::Low;
    }
    ValueStatus::Normal
}
