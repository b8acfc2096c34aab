//! Pipeline orchestration: raw records in, lab groups out.
//!
//! Stage order is fixed: candidate building (date parsing, value cleanup,
//! reference resolution) → cross-duplicate pre-filter → identity dedup →
//! multi-value merge → abbreviation and classification → grouping. Every
//! stage is a pure transformation; re-running the pipeline on the same
//! input yields the same output.

use labclip_model::{ItemType, LabGroup, NormalizedLabItem, RawLabRecord, ValueRange};

use crate::abbrev;
use crate::config::PipelineConfig;
use crate::dates;
use crate::dedupe::{self, Candidate, Deduplicated};
use crate::group::{self, DatedItem};
use crate::reference_range;
use crate::value;

/// Run the full normalization pipeline over one fetch of raw records.
pub fn process_records(records: &[RawLabRecord], config: &PipelineConfig) -> Vec<LabGroup> {
    let candidates = build_candidates(records, config);
    let deduplicated = dedupe::dedupe(candidates, &config.cross_duplicates);
    let items = deduplicated.into_iter().map(finalize_item).collect();
    group::group_items(items)
}

/// Resolve ranges and normalize values, dropping records that cannot be
/// dated.
fn build_candidates(records: &[RawLabRecord], config: &PipelineConfig) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(records.len());
    for record in records {
        let Some((date, time_point)) = dates::record_date(record) else {
            tracing::debug!(
                order_code = %record.order_code,
                item_name = %record.item_name,
                "discarding record without a parseable date"
            );
            continue;
        };
        let resolved = reference_range::resolve_range(
            &record.reference_raw,
            &record.order_code,
            &record.facility,
            &config.overrides,
        );
        let raw_value = if config.numeric_prefix_codes.contains(&record.order_code) {
            value::numeric_prefix(&record.value).unwrap_or_else(|| record.value.clone())
        } else {
            record.value.clone()
        };
        candidates.push(Candidate {
            date,
            time_point,
            facility: record.facility.clone(),
            diagnosis_code: record.diagnosis_code.clone(),
            diagnosis_name: record.diagnosis_name.clone(),
            order_code: record.order_code.clone(),
            order_name: record.order_name.clone(),
            item_name: record.item_name.clone(),
            value: value::normalize_value(&raw_value),
            unit: record.unit.clone(),
            bounds: resolved.bounds,
            using_custom_range: resolved.custom,
        });
    }
    candidates
}

/// Turn a deduplicated candidate (and any merged repeat readings) into the
/// final item.
fn finalize_item(deduplicated: Deduplicated) -> DatedItem {
    let Deduplicated {
        canonical,
        values,
        time_points,
    } = deduplicated;
    let bounds = canonical.bounds;
    let abbr_name = abbrev::resolve(&canonical.order_code, &canonical.item_name).map(String::from);

    let item = if values.len() > 1 {
        let merged = value::merge_readings(&values, bounds.as_ref());
        NormalizedLabItem {
            item_name: canonical.item_name,
            value: merged.value,
            unit: canonical.unit,
            reference_min: bounds.and_then(|b| b.min),
            reference_max: bounds.and_then(|b| b.max),
            value_status: merged.status,
            abbr_name,
            order_code: canonical.order_code,
            item_type: merged.item_type,
            has_multiple_values: true,
            value_range: Some(ValueRange {
                min: merged.min,
                max: merged.max,
                values,
                time_points,
            }),
            using_custom_range: canonical.using_custom_range,
        }
    } else {
        let item_type = if value::parse_decimal(&canonical.value).is_some() {
            ItemType::Numeric
        } else {
            ItemType::Qualitative
        };
        NormalizedLabItem {
            value_status: value::classify(&canonical.value, bounds.as_ref()),
            item_name: canonical.item_name,
            value: canonical.value,
            unit: canonical.unit,
            reference_min: bounds.and_then(|b| b.min),
            reference_max: bounds.and_then(|b| b.max),
            abbr_name,
            order_code: canonical.order_code,
            item_type,
            has_multiple_values: false,
            value_range: None,
            using_custom_range: canonical.using_custom_range,
        }
    };

    DatedItem {
        date: canonical.date,
        facility: canonical.facility,
        diagnosis_code: canonical.diagnosis_code,
        diagnosis_name: canonical.diagnosis_name,
        item,
    }
}
