//! Grouping of normalized items by (date, facility).

use std::collections::HashMap;

use chrono::NaiveDate;

use labclip_model::{LabGroup, NormalizedLabItem};

/// A normalized item still carrying its grouping attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedItem {
    pub date: NaiveDate,
    pub facility: String,
    pub diagnosis_code: String,
    pub diagnosis_name: String,
    pub item: NormalizedLabItem,
}

/// Bucket items by (date, facility) and sort groups by date descending.
///
/// The first-seen diagnosis code/name sticks to each bucket; the sort is
/// stable, so groups sharing a date keep their first-seen relative order,
/// and item order inside a group is first-seen order.
pub fn group_items(items: Vec<DatedItem>) -> Vec<LabGroup> {
    let mut groups: Vec<LabGroup> = Vec::new();
    let mut index: HashMap<(NaiveDate, String), usize> = HashMap::new();
    for dated in items {
        let key = (dated.date, dated.facility.clone());
        match index.get(&key) {
            Some(&position) => groups[position].items.push(dated.item),
            None => {
                index.insert(key, groups.len());
                groups.push(LabGroup {
                    date: dated.date,
                    facility: dated.facility,
                    diagnosis_code: dated.diagnosis_code,
                    diagnosis_name: dated.diagnosis_name,
                    items: vec![dated.item],
                });
            }
        }
    }
    groups.sort_by(|a, b| b.date.cmp(&a.date));
    groups
}
