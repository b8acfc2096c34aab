use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resolved reference-range bounds for a reading.
///
/// Either bound may be absent (`[<5.0]` has no lower bound, `[3.5]` alone has
/// no upper bound). "No abnormality judgment applicable" is modeled as the
/// absence of bounds altogether (`Option<ReferenceBounds>::None`), not as a
/// bounds pair with both sides empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ReferenceBounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// True when at least one bound is present.
    pub fn is_bounded(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Classification of a reading against its resolved reference range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueStatus {
    #[default]
    Normal,
    High,
    Low,
}

impl ValueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueStatus::Normal => "normal",
            ValueStatus::High => "high",
            ValueStatus::Low => "low",
        }
    }

    pub fn is_abnormal(&self) -> bool {
        !matches!(self, ValueStatus::Normal)
    }
}

impl fmt::Display for ValueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(ValueStatus::Normal),
            "high" => Ok(ValueStatus::High),
            "low" => Ok(ValueStatus::Low),
            _ => Err(format!("Unknown value status: {s}")),
        }
    }
}

/// Whether the canonical reading parsed as a plain decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Numeric,
    Qualitative,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Numeric => "numeric",
            ItemType::Qualitative => "qualitative",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spread of same-day repeat readings merged onto one item.
///
/// `values` keeps every merged reading in arrival order; `time_points` keeps
/// the `HH:MM` times derivable from reading timestamps (may be shorter than
/// `values` when some readings carried no time). `min`/`max` are present only
/// when every merged reading was numeric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub values: Vec<String>,
    pub time_points: Vec<String>,
}

/// One normalized lab reading, ready for grouping and rendering.
///
/// Invariant: when `has_multiple_values` is set, `value` is the merged
/// `"min-max"` string (a single value when min == max) and `value_status`
/// reflects whether any merged reading crossed a bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLabItem {
    pub item_name: String,
    pub value: String,
    pub unit: String,
    pub reference_min: Option<f64>,
    pub reference_max: Option<f64>,
    pub value_status: ValueStatus,
    /// Short display label, when the abbreviation table resolved one.
    pub abbr_name: Option<String>,
    pub order_code: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub has_multiple_values: bool,
    pub value_range: Option<ValueRange>,
    /// True when the range came from a custom override rather than the
    /// reference-range string.
    pub using_custom_range: bool,
}

impl NormalizedLabItem {
    /// Display name for rendering: the abbreviation when one resolved,
    /// otherwise the raw item name.
    pub fn display_name(&self) -> &str {
        self.abbr_name.as_deref().unwrap_or(&self.item_name)
    }

    pub fn bounds(&self) -> Option<ReferenceBounds> {
        if self.reference_min.is_some() || self.reference_max.is_some() {
            Some(ReferenceBounds::new(self.reference_min, self.reference_max))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_status_round_trips_strings() {
        for status in [ValueStatus::Normal, ValueStatus::High, ValueStatus::Low] {
            assert_eq!(status.as_str().parse::<ValueStatus>(), Ok(status));
        }
        assert!("borderline".parse::<ValueStatus>().is_err());
    }

    #[test]
    fn display_name_prefers_abbreviation() {
        let mut item = NormalizedLabItem {
            item_name: "グリコヘモグロビン".to_string(),
            ..NormalizedLabItem::default()
        };
        assert_eq!(item.display_name(), "グリコヘモグロビン");
        item.abbr_name = Some("HbA1c".to_string());
        assert_eq!(item.display_name(), "HbA1c");
    }

    #[test]
    fn bounds_absent_when_no_reference() {
        let item = NormalizedLabItem::default();
        assert!(item.bounds().is_none());
        let bounded = NormalizedLabItem {
            reference_max: Some(120.0),
            ..NormalizedLabItem::default()
        };
        assert_eq!(bounded.bounds(), Some(ReferenceBounds::new(None, Some(120.0))));
    }
}
