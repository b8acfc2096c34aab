//! Reference-range string resolution.
//!
//! The feed encodes reference ranges as one or two bracketed segments with
//! at least eight observed shapes (`[3.3~8.6]`, `[10][40]`, `[<5.0 IU/mL][]`,
//! `[無][<0.3]`, sentinel pairs meaning "no judgment", …). Resolution tries
//! the shapes in a fixed precedence order; the order is load-bearing because
//! several real strings match more than one shape.

use std::sync::LazyLock;

use regex::Regex;

use labclip_model::ReferenceBounds;

use crate::config::RangeOverrides;
use crate::value::parse_decimal;

static BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("bracket regex"));

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("number regex"));

/// Outcome of resolving one record's reference range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedReference {
    /// `None` means no abnormality judgment applies to this reading.
    pub bounds: Option<ReferenceBounds>,
    /// True when a custom override supplied the bounds.
    pub custom: bool,
}

/// Resolve a record's reference range.
///
/// A custom override for the (order code, facility) pair wins
/// unconditionally and skips all string parsing. Otherwise the raw string is
/// parsed per the bracket grammar; strings matching no known shape resolve
/// silently to "no judgment".
pub fn resolve_range(
    reference_raw: &str,
    order_code: &str,
    facility: &str,
    overrides: &RangeOverrides,
) -> ResolvedReference {
    if let Some(bounds) = overrides.lookup(order_code, facility) {
        return ResolvedReference {
            bounds: Some(bounds),
            custom: true,
        };
    }
    let bounds = parse_reference(reference_raw);
    if bounds.is_none() && !reference_raw.trim().is_empty() {
        tracing::debug!(reference = reference_raw, order_code, "unresolved reference range");
    }
    ResolvedReference {
        bounds,
        custom: false,
    }
}

/// Parse the bracket grammar alone (no overrides).
pub fn parse_reference(reference_raw: &str) -> Option<ReferenceBounds> {
    let segments: Vec<String> = BRACKET_RE
        .captures_iter(reference_raw)
        .map(|captures| captures[1].trim().to_string())
        .collect();
    match segments.as_slice() {
        [] => None,
        [single] => parse_single(single),
        // A trailing empty bracket is decoration on the single-segment shapes.
        [first, second] if second.is_empty() => parse_single(first),
        [lower, upper] => parse_pair(lower, upper),
        _ => None,
    }
}

/// Single-segment shapes, in precedence order: `<value`, `min~max`, bare
/// value (which becomes a lower bound).
fn parse_single(segment: &str) -> Option<ReferenceBounds> {
    if segment.is_empty() {
        return None;
    }
    if has_less_than(segment) {
        return extract_number(segment).map(|max| ReferenceBounds::new(None, Some(max)));
    }
    if let Some((low, high)) = split_tilde(segment) {
        let min = extract_number(low);
        let max = extract_number(high);
        if min.is_some() || max.is_some() {
            return Some(ReferenceBounds::new(min, max));
        }
        return None;
    }
    extract_number(segment).map(|min| ReferenceBounds::new(Some(min), None))
}

/// Two-segment shapes, in precedence order: sentinels, placeholder lower
/// bound, `<` upper bound, independent numeral extraction.
fn parse_pair(lower: &str, upper: &str) -> Option<ReferenceBounds> {
    if is_sentinel_pair(lower, upper) {
        return None;
    }
    if is_placeholder(lower) {
        return extract_number(upper).map(|max| ReferenceBounds::new(None, Some(max)));
    }
    if has_less_than(upper)
        && let Some(max) = extract_number(upper)
    {
        return Some(ReferenceBounds::new(None, Some(max)));
    }
    let min = extract_number(lower);
    let max = if is_placeholder(upper) {
        None
    } else {
        extract_number(upper)
    };
    if min.is_some() || max.is_some() {
        Some(ReferenceBounds::new(min, max))
    } else {
        None
    }
}

/// Sentinel pairs meaning "no abnormality judgment": `[0][0]` in any
/// zero-padded variant, `[無][無]`, and `[0][9999]`.
fn is_sentinel_pair(lower: &str, upper: &str) -> bool {
    if lower == "無" && upper == "無" {
        return true;
    }
    match (parse_decimal(lower), parse_decimal(upper)) {
        (Some(a), Some(b)) => a == 0.0 && (b == 0.0 || b == 9999.0),
        _ => false,
    }
}

fn is_placeholder(segment: &str) -> bool {
    let trimmed = segment.trim();
    trimmed.is_empty()
        || trimmed == "-"
        || trimmed == "無"
        || trimmed.eq_ignore_ascii_case("NA")
}

fn has_less_than(segment: &str) -> bool {
    segment.contains('<') || segment.contains('＜')
}

fn split_tilde(segment: &str) -> Option<(&str, &str)> {
    segment
        .split_once('~')
        .or_else(|| segment.split_once('～'))
}

/// First numeral in a segment, round-tripped through f64 so trailing zeros
/// are insignificant.
fn extract_number(segment: &str) -> Option<f64> {
    NUMBER_RE
        .find(segment)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
