//! Two-phase deduplication of classified lab candidates.
//!
//! The feed emits the same clinical fact under overlapping groupings: once
//! keyed by the panel's order name and once by the individual assay's item
//! name, plus a handful of order codes that re-report a sibling order's
//! value at specific facilities. Phase A collapses the overlapping
//! encodings; Phase B folds genuine same-day repeat readings into one
//! candidate's value range instead of dropping them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use labclip_model::ReferenceBounds;

use crate::config::CrossDuplicateRule;

/// A reference-resolved, value-normalized record on its way through the
/// pipeline. Carries the grouping attributes the final `NormalizedLabItem`
/// no longer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub date: NaiveDate,
    pub time_point: Option<String>,
    pub facility: String,
    pub diagnosis_code: String,
    pub diagnosis_name: String,
    pub order_code: String,
    pub order_name: String,
    pub item_name: String,
    /// Normalized value (numeric prefix already extracted where required).
    pub value: String,
    pub unit: String,
    pub bounds: Option<ReferenceBounds>,
    pub using_custom_range: bool,
}

/// A canonical candidate plus every reading folded onto it, in arrival
/// order. `values` always contains the canonical reading first.
#[derive(Debug, Clone, PartialEq)]
pub struct Deduplicated {
    pub canonical: Candidate,
    pub values: Vec<String>,
    pub time_points: Vec<String>,
}

/// Run the full deduplication: cross-duplicate pre-filter, identity pass,
/// multi-value merge.
pub fn dedupe(candidates: Vec<Candidate>, rules: &[CrossDuplicateRule]) -> Vec<Deduplicated> {
    let filtered = drop_cross_duplicates(candidates, rules);
    let admitted = identity_pass(filtered);
    merge_pass(admitted)
}

/// Drop records whose order code is a known re-report of a sibling order
/// code at their facility, when the sibling carries the same value on the
/// same date.
pub fn drop_cross_duplicates(
    candidates: Vec<Candidate>,
    rules: &[CrossDuplicateRule],
) -> Vec<Candidate> {
    if rules.is_empty() {
        return candidates;
    }
    let present: BTreeSet<String> = candidates
        .iter()
        .map(|candidate| {
            value_key(
                candidate.date,
                &candidate.facility,
                &candidate.order_code,
                &candidate.value,
            )
        })
        .collect();
    candidates
        .into_iter()
        .filter(|candidate| {
            let redundant = rules.iter().any(|rule| {
                rule.facility == candidate.facility
                    && rule.redundant_order_code == candidate.order_code
                    && present.contains(&value_key(
                        candidate.date,
                        &candidate.facility,
                        &rule.source_order_code,
                        &candidate.value,
                    ))
            });
            if redundant {
                tracing::debug!(
                    order_code = %candidate.order_code,
                    facility = %candidate.facility,
                    "dropping cross-duplicate record"
                );
            }
            !redundant
        })
        .collect()
}

/// Phase A: admit the first record per identity key.
///
/// Each record carries two keys, one through its order name and one through
/// its item name; a single admitted set spans both, so a record whose fact
/// was already admitted under either encoding is dropped.
pub fn identity_pass(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut admitted = BTreeSet::new();
    let mut kept = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let by_order = identity_key(&candidate, &candidate.order_name);
        let by_item = identity_key(&candidate, &candidate.item_name);
        if admitted.contains(&by_order) || admitted.contains(&by_item) {
            continue;
        }
        admitted.insert(by_order);
        admitted.insert(by_item);
        kept.push(candidate);
    }
    kept
}

/// Phase B: re-key survivors value-agnostically and fold repeat readings
/// into the first record per key.
pub fn merge_pass(candidates: Vec<Candidate>) -> Vec<Deduplicated> {
    let mut order: Vec<String> = Vec::new();
    let mut merged: BTreeMap<String, Deduplicated> = BTreeMap::new();
    for candidate in candidates {
        let key = format!(
            "{}|{}|{}|{}",
            candidate.date.format("%Y/%m/%d"),
            candidate.facility,
            candidate.order_code,
            candidate.item_name
        );
        match merged.get_mut(&key) {
            Some(entry) => {
                entry.values.push(candidate.value.clone());
                if let Some(time_point) = candidate.time_point.clone() {
                    entry.time_points.push(time_point);
                }
            }
            None => {
                let entry = Deduplicated {
                    values: vec![candidate.value.clone()],
                    time_points: candidate.time_point.clone().into_iter().collect(),
                    canonical: candidate,
                };
                merged.insert(key.clone(), entry);
                order.push(key);
            }
        }
    }
    order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .collect()
}

fn identity_key(candidate: &Candidate, name: &str) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        candidate.date.format("%Y/%m/%d"),
        candidate.facility,
        candidate.order_code,
        name,
        candidate.value
    )
}

fn value_key(date: NaiveDate, facility: &str, order_code: &str, value: &str) -> String {
    format!("{}|{}|{}|{}", date.format("%Y/%m/%d"), facility, order_code, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(order_code: &str, order_name: &str, item_name: &str, value: &str) -> Candidate {
        Candidate {
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            time_point: None,
            facility: "Hosp A".to_string(),
            diagnosis_code: String::new(),
            diagnosis_name: String::new(),
            order_code: order_code.to_string(),
            order_name: order_name.to_string(),
            item_name: item_name.to_string(),
            value: value.to_string(),
            unit: String::new(),
            bounds: None,
            using_custom_range: false,
        }
    }

    #[test]
    fn test_identity_pass_collapses_overlapping_encodings() {
        // The same fact arrives once under the panel's order name and once
        // under the assay's item name.
        let records = vec![
            candidate("3B035", "肝機能パネル", "AST", "32"),
            candidate("3B035", "AST", "AST", "32"),
        ];
        let kept = identity_pass(records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].order_name, "肝機能パネル");
    }

    #[test]
    fn test_identity_pass_keeps_distinct_values() {
        let records = vec![
            candidate("3B035", "AST", "AST", "32"),
            candidate("3B035", "AST", "AST", "45"),
        ];
        assert_eq!(identity_pass(records).len(), 2);
    }

    #[test]
    fn test_identity_pass_collides_distinct_items_sharing_order_and_value() {
        // Known correctness risk of first-admitted-wins: two genuinely
        // distinct assays under one order code collide when the item name of
        // one equals the order name of the other and the values coincide.
        let records = vec![
            candidate("2A990", "白血球数", "WBC", "5"),
            candidate("2A990", "WBC", "好中球", "5"),
        ];
        let kept = identity_pass(records);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_merge_pass_folds_repeat_readings() {
        let mut morning = candidate("3D010", "Glu", "Glucose", "90");
        morning.time_point = Some("08:00".to_string());
        let mut evening = candidate("3D010", "Glu", "Glucose", "145");
        evening.time_point = Some("17:30".to_string());
        let merged = merge_pass(vec![morning, evening]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].values, vec!["90", "145"]);
        assert_eq!(merged[0].time_points, vec!["08:00", "17:30"]);
        assert_eq!(merged[0].canonical.value, "90");
    }

    #[test]
    fn test_merge_pass_preserves_first_seen_order() {
        let merged = merge_pass(vec![
            candidate("3B035", "AST", "AST", "32"),
            candidate("3B040", "ALT", "ALT", "28"),
            candidate("3B035", "AST", "AST", "40"),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].canonical.item_name, "AST");
        assert_eq!(merged[1].canonical.item_name, "ALT");
    }

    #[test]
    fn test_cross_duplicate_pre_filter() {
        let rules = vec![CrossDuplicateRule {
            facility: "Hosp A".to_string(),
            redundant_order_code: "3D011".to_string(),
            source_order_code: "3D010".to_string(),
        }];
        let records = vec![
            candidate("3D010", "Glu", "Glucose", "126"),
            candidate("3D011", "Glu(re-report)", "Glucose", "126"),
        ];
        let kept = drop_cross_duplicates(records, &rules);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].order_code, "3D010");
    }

    #[test]
    fn test_cross_duplicate_keeps_unmatched_values() {
        let rules = vec![CrossDuplicateRule {
            facility: "Hosp A".to_string(),
            redundant_order_code: "3D011".to_string(),
            source_order_code: "3D010".to_string(),
        }];
        // No sibling record with the same value: nothing to drop.
        let records = vec![candidate("3D011", "Glu(re-report)", "Glucose", "126")];
        assert_eq!(drop_cross_duplicates(records, &rules).len(), 1);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let records = vec![
            candidate("3B035", "肝機能パネル", "AST", "32"),
            candidate("3B035", "AST", "AST", "32"),
            candidate("3D010", "Glu", "Glucose", "90"),
            candidate("3D010", "Glu", "Glucose", "145"),
        ];
        let once = dedupe(records, &[]);
        let as_candidates: Vec<Candidate> = once
            .iter()
            .map(|entry| entry.canonical.clone())
            .collect();
        let twice = dedupe(as_candidates.clone(), &[]);
        let again: Vec<Candidate> = twice.iter().map(|entry| entry.canonical.clone()).collect();
        assert_eq!(as_candidates, again);
    }
}
