pub mod error;
pub mod group;
pub mod item;
pub mod record;
pub mod template;

pub use error::TemplateError;
pub use group::LabGroup;
pub use item::{ItemType, NormalizedLabItem, ReferenceBounds, ValueRange, ValueStatus};
pub use record::RawLabRecord;
pub use template::{
    FieldName, FormatTemplate, FormatToken, HeaderField, ItemField, LayoutMode, TokenKind,
    TokenPayload, TokenSection,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_record_deserializes_camel_case() {
        let json = r#"{
            "orderCode": "16021",
            "orderName": "AST(GOT)",
            "itemName": "AST",
            "value": "32",
            "unit": "U/L",
            "referenceRaw": "[10][40]",
            "facility": "Central Clinic",
            "recipeDate": "2024/01/10",
            "inspectDate": "2024/01/10 08:45",
            "diagnosisCode": "K760",
            "diagnosisName": "Fatty liver"
        }"#;
        let record: RawLabRecord = serde_json::from_str(json).expect("deserialize record");
        assert_eq!(record.order_code, "16021");
        assert_eq!(record.reference_raw, "[10][40]");
        assert_eq!(record.inspect_date, "2024/01/10 08:45");
    }

    #[test]
    fn raw_record_tolerates_missing_fields() {
        let record: RawLabRecord =
            serde_json::from_str(r#"{"orderCode": "16021"}"#).expect("partial record");
        assert_eq!(record.order_code, "16021");
        assert!(record.facility.is_empty());
    }

    #[test]
    fn template_round_trips_persisted_shape() {
        let template = FormatTemplate::default();
        let json = serde_json::to_string(&template).expect("serialize template");
        assert!(json.contains("\"headerTokens\""));
        assert!(json.contains("\"itemTokens\""));
        assert!(json.contains("\"itemSeparator\""));
        assert!(json.contains("\"mode\":\"vertical\""));
        let round: FormatTemplate = serde_json::from_str(&json).expect("deserialize template");
        assert_eq!(round, template);
    }
}
