use serde::{Deserialize, Serialize};

/// One raw lab reading as delivered by the extraction collaborator.
///
/// Field names are a bit-exact contract with the extractor's JSON output;
/// every field defaults to empty so partial feeds still deserialize. Records
/// are read-only input to the pipeline and are never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLabRecord {
    /// Facility-agnostic identifier for the test type.
    pub order_code: String,
    /// Name of the order (panel-level grouping) the reading arrived under.
    pub order_name: String,
    /// Name of the individual assay.
    pub item_name: String,
    /// Reported result, numeric or qualitative, as a string.
    pub value: String,
    pub unit: String,
    /// Bracket-encoded reference range, e.g. `[3.3~8.6]` or `[10][40]`.
    pub reference_raw: String,
    /// Reporting hospital/clinic.
    pub facility: String,
    /// Prescription date of the visit the reading belongs to.
    pub recipe_date: String,
    /// Date (optionally with time) the specimen was inspected.
    pub inspect_date: String,
    pub diagnosis_code: String,
    pub diagnosis_name: String,
}
