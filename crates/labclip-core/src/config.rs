//! Pipeline configuration: range overrides, cross-duplicate rules, and
//! value-cleanup code sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use labclip_model::ReferenceBounds;

use crate::abbrev;

/// A custom reference range for one (order code, facility) pair.
///
/// Overrides exist because some facilities report ranges that are missing,
/// wrong, or encoded in a form the string grammar cannot express; an
/// override wins over the reference-range string unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeOverride {
    pub order_code: String,
    pub facility: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// The injected custom-override table, keyed by (order code, facility).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeOverrides {
    entries: Vec<RangeOverride>,
}

impl RangeOverrides {
    pub fn new(entries: Vec<RangeOverride>) -> Self {
        Self { entries }
    }

    pub fn insert(&mut self, entry: RangeOverride) {
        self.entries.push(entry);
    }

    /// Look up the override for an (order code, facility) pair.
    pub fn lookup(&self, order_code: &str, facility: &str) -> Option<ReferenceBounds> {
        self.entries
            .iter()
            .find(|entry| entry.order_code == order_code && entry.facility == facility)
            .map(|entry| ReferenceBounds::new(entry.min, entry.max))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One known cross-duplicate: at `facility`, records under
/// `redundant_order_code` re-report values already carried by
/// `source_order_code` and are dropped outright when the sibling value is
/// present on the same date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrossDuplicateRule {
    pub facility: String,
    pub redundant_order_code: String,
    pub source_order_code: String,
}

/// Everything the pipeline needs besides the records themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// Custom reference ranges, keyed by (order code, facility).
    pub overrides: RangeOverrides,
    /// Facility-specific cross-duplicate drop rules.
    pub cross_duplicates: Vec<CrossDuplicateRule>,
    /// Order codes whose values carry annotations after the numeral
    /// (`"126(normal)"`); only the numeric prefix takes part in dedup keys.
    pub numeric_prefix_codes: BTreeSet<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            overrides: RangeOverrides::default(),
            cross_duplicates: Vec::new(),
            numeric_prefix_codes: builtin_numeric_prefix_codes(),
        }
    }
}

/// Order codes known to annotate their values in the feed.
fn builtin_numeric_prefix_codes() -> BTreeSet<String> {
    BTreeSet::from([
        abbrev::ORDER_GLUCOSE.to_string(),
        abbrev::ORDER_CRP.to_string(),
    ])
}
