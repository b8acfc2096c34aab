use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::item::NormalizedLabItem;

/// All readings reported by one facility on one date.
///
/// Groups are keyed uniquely by (date, facility); the diagnosis fields carry
/// the first-seen diagnosis for that bucket. Item order preserves first-seen
/// order from the raw feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabGroup {
    #[serde(with = "slash_date")]
    pub date: NaiveDate,
    pub facility: String,
    pub diagnosis_code: String,
    pub diagnosis_name: String,
    pub items: Vec<NormalizedLabItem>,
}

/// Serde adapter for the `YYYY/MM/DD` date form used throughout the
/// clipboard output and the persisted group JSON.
pub mod slash_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%Y/%m/%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }
}
