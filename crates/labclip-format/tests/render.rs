//! Rendering contract tests.

use chrono::NaiveDate;

use labclip_format::{RenderError, reference_display, render, render_strict};
use labclip_model::{
    FieldName, FormatTemplate, FormatToken, HeaderField, ItemField, LabGroup, LayoutMode,
    NormalizedLabItem, TokenKind, TokenSection,
};

fn item(name: &str, value: &str, unit: &str, min: Option<f64>, max: Option<f64>) -> NormalizedLabItem {
    NormalizedLabItem {
        item_name: name.to_string(),
        value: value.to_string(),
        unit: unit.to_string(),
        reference_min: min,
        reference_max: max,
        ..NormalizedLabItem::default()
    }
}

fn group(date: (i32, u32, u32), facility: &str, items: Vec<NormalizedLabItem>) -> LabGroup {
    LabGroup {
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        facility: facility.to_string(),
        diagnosis_code: String::new(),
        diagnosis_name: String::new(),
        items,
    }
}

fn cholesterol_fixture() -> Vec<LabGroup> {
    vec![group(
        (2024, 1, 10),
        "Hosp A",
        vec![item("Cholesterol", "211", "mg/dL", Some(130.0), Some(200.0))],
    )]
}

#[test]
fn test_horizontal_render_matches_contract_example() {
    let template = FormatTemplate {
        header_tokens: vec![
            FormatToken::field("h1", FieldName::Header(HeaderField::Date)),
            FormatToken::field("h2", FieldName::Header(HeaderField::Facility)),
        ],
        item_tokens: vec![
            FormatToken::field("i1", FieldName::Item(ItemField::ItemName)),
            FormatToken::literal("i2", TokenSection::Item, ": "),
            FormatToken::field("i3", FieldName::Item(ItemField::Value)),
        ],
        mode: LayoutMode::Horizontal,
        item_separator: "; ".to_string(),
    };
    let output = render(&cholesterol_fixture(), &template);
    assert_eq!(output, "2024/01/10 Hosp A Cholesterol: 211");
}

#[test]
fn test_vertical_render_with_default_template() {
    let groups = vec![
        group(
            (2024, 2, 14),
            "Hosp A",
            vec![item("AST", "35", "U/L", Some(10.0), Some(40.0))],
        ),
        group(
            (2024, 1, 10),
            "Hosp A",
            vec![
                item("Glucose", "90-145", "mg/dL", Some(70.0), Some(120.0)),
                item("HbA1c", "6.8", "%", Some(4.6), Some(6.2)),
            ],
        ),
    ];
    let output = render(&groups, &FormatTemplate::default());
    insta::assert_snapshot!(output, @r"
    2024/02/14 Hosp A
    AST: 35 U/L

    2024/01/10 Hosp A
    Glucose: 90-145 mg/dL
    HbA1c: 6.8 %
    ");
}

#[test]
fn test_horizontal_mode_joins_items_with_separator() {
    let groups = vec![group(
        (2024, 1, 10),
        "Hosp A",
        vec![
            item("AST", "32", "U/L", None, None),
            item("ALT", "28", "U/L", None, None),
        ],
    )];
    let template = FormatTemplate {
        mode: LayoutMode::Horizontal,
        item_separator: " / ".to_string(),
        ..FormatTemplate::default()
    };
    let output = render(&groups, &template);
    insta::assert_snapshot!(output, @"2024/01/10 Hosp A AST: 32 U/L / ALT: 28 U/L");
}

#[test]
fn test_newline_tokens_ignored_in_horizontal_mode() {
    let mut template = FormatTemplate::default();
    template.item_tokens.push(FormatToken::newline("i9"));
    template
        .item_tokens
        .push(FormatToken::field("i10", FieldName::Item(ItemField::ReferenceDisplay)));

    let groups = cholesterol_fixture();

    template.mode = LayoutMode::Vertical;
    let vertical = render(&groups, &template);
    assert!(vertical.contains("mg/dL\n130-200"));

    template.mode = LayoutMode::Horizontal;
    let horizontal = render(&groups, &template);
    assert!(!horizontal.contains('\n'));
    assert!(horizontal.contains("mg/dL130-200"));
}

#[test]
fn test_separator_token_emits_item_separator() {
    let template = FormatTemplate {
        header_tokens: vec![FormatToken::field("h1", FieldName::Header(HeaderField::Date))],
        item_tokens: vec![
            FormatToken::field("i1", FieldName::Item(ItemField::ItemName)),
            FormatToken::separator("i2", TokenSection::Item),
            FormatToken::field("i3", FieldName::Item(ItemField::Value)),
        ],
        mode: LayoutMode::Vertical,
        item_separator: " | ".to_string(),
    };
    let output = render(&cholesterol_fixture(), &template);
    assert_eq!(output, "2024/01/10\nCholesterol | 211");
}

#[test]
fn test_header_skips_empty_field_emissions() {
    let template = FormatTemplate {
        header_tokens: vec![
            FormatToken::field("h1", FieldName::Header(HeaderField::Date)),
            FormatToken::field("h2", FieldName::Header(HeaderField::DiagnosisCode)),
            FormatToken::field("h3", FieldName::Header(HeaderField::Facility)),
        ],
        ..FormatTemplate::default()
    };
    // Diagnosis code is empty in the fixture: no double space in between.
    let output = render(&cholesterol_fixture(), &template);
    assert!(output.starts_with("2024/01/10 Hosp A\n"));
}

#[test]
fn test_empty_token_lists_fall_back() {
    let template = FormatTemplate {
        header_tokens: Vec::new(),
        item_tokens: Vec::new(),
        mode: LayoutMode::Vertical,
        item_separator: ",".to_string(),
    };
    let groups = cholesterol_fixture();
    assert!(matches!(
        render_strict(&groups, &template),
        Err(RenderError::Structure(_))
    ));
    let output = render(&groups, &template);
    assert!(!output.is_empty());
    assert_eq!(output, "2024/01/10 - Hosp A\nCholesterol: 211 mg/dL");
}

#[test]
fn test_fallback_mirrors_horizontal_mode() {
    let template = FormatTemplate {
        header_tokens: Vec::new(),
        item_tokens: Vec::new(),
        mode: LayoutMode::Horizontal,
        item_separator: ",".to_string(),
    };
    let output = render(&cholesterol_fixture(), &template);
    assert_eq!(output, "2024/01/10 - Hosp A Cholesterol: 211 mg/dL");
}

#[test]
fn test_malformed_token_falls_back_instead_of_failing() {
    let mut template = FormatTemplate::default();
    // A field token with no field name: resolution faults, render recovers.
    template.item_tokens.push(FormatToken {
        id: "i9".to_string(),
        section: TokenSection::Item,
        kind: TokenKind::Field,
        field_name: None,
        literal_value: None,
    });
    let groups = cholesterol_fixture();
    assert!(matches!(
        render_strict(&groups, &template),
        Err(RenderError::Token(_))
    ));
    let output = render(&groups, &template);
    assert_eq!(output, "2024/01/10 - Hosp A\nCholesterol: 211 mg/dL");
}

#[test]
fn test_item_name_prefers_abbreviation() {
    let mut abbreviated = item("グリコヘモグロビン", "6.8", "%", None, None);
    abbreviated.abbr_name = Some("HbA1c".to_string());
    let groups = vec![group((2024, 1, 10), "Hosp A", vec![abbreviated])];
    let output = render(&groups, &FormatTemplate::default());
    assert_eq!(output, "2024/01/10 Hosp A\nHbA1c: 6.8 %");
}

#[test]
fn test_reference_display_variants() {
    assert_eq!(reference_display(Some(130.0), Some(200.0)), "130-200");
    assert_eq!(reference_display(Some(4.6), None), ">4.6");
    assert_eq!(reference_display(None, Some(5.0)), "<5");
    assert_eq!(reference_display(None, None), "");
}

#[test]
fn test_render_empty_groups_is_empty() {
    let output = render(&[], &FormatTemplate::default());
    assert!(output.is_empty());
}

#[test]
fn test_template_json_contract_renders() {
    let json = r#"{
        "headerTokens": [
            {"id": "h1", "section": "header", "kind": "field", "fieldName": "date"},
            {"id": "h2", "section": "header", "kind": "field", "fieldName": "facility"}
        ],
        "itemTokens": [
            {"id": "i1", "section": "item", "kind": "field", "fieldName": "itemName"},
            {"id": "i2", "section": "item", "kind": "literal", "literalValue": ": "},
            {"id": "i3", "section": "item", "kind": "field", "fieldName": "value"}
        ],
        "mode": "horizontal",
        "itemSeparator": "; "
    }"#;
    let template: FormatTemplate = serde_json::from_str(json).expect("deserialize template");
    let output = render(&cholesterol_fixture(), &template);
    assert_eq!(output, "2024/01/10 Hosp A Cholesterol: 211");
}
