//! Template rendering with a guaranteed fallback.
//!
//! `render` is a total function: whatever the template looks like, the user
//! gets text to copy. Structural problems (empty token lists) and token
//! resolution faults both route to a fixed built-in formatter; the original
//! fault is logged for diagnostics and never propagates.

use thiserror::Error;

use labclip_model::{
    FieldName, FormatTemplate, HeaderField, ItemField, LabGroup, LayoutMode, NormalizedLabItem,
    TemplateError, TokenPayload, TokenSection,
};

/// Why template rendering could not proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("template structure invalid: {0}")]
    Structure(&'static str),
    #[error("token resolution failed: {0}")]
    Token(#[from] TemplateError),
}

/// Render groups with a template. Never fails: any fault falls back to the
/// built-in formatter.
pub fn render(groups: &[LabGroup], template: &FormatTemplate) -> String {
    match render_strict(groups, template) {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!(%error, "template render failed, using fallback formatter");
            render_fallback(groups, template.mode)
        }
    }
}

/// The fallible inner renderer, for consumers that want the fault instead
/// of the fallback.
pub fn render_strict(
    groups: &[LabGroup],
    template: &FormatTemplate,
) -> Result<String, RenderError> {
    if template.header_tokens.is_empty() {
        return Err(RenderError::Structure("header token list is empty"));
    }
    if template.item_tokens.is_empty() {
        return Err(RenderError::Structure("item token list is empty"));
    }
    let mut blocks = Vec::with_capacity(groups.len());
    for group in groups {
        let header = render_header(group, template)?;
        let items = group
            .items
            .iter()
            .map(|item| render_item(item, template))
            .collect::<Result<Vec<_>, _>>()?;
        let block = match template.mode {
            LayoutMode::Vertical => format!("{header}\n{}", items.join("\n")),
            LayoutMode::Horizontal => {
                format!("{header} {}", items.join(&template.item_separator))
            }
        };
        blocks.push(block);
    }
    let joiner = match template.mode {
        LayoutMode::Vertical => "\n\n",
        LayoutMode::Horizontal => "\n",
    };
    Ok(blocks.join(joiner))
}

/// Header token emissions joined with single spaces; empty emissions are
/// skipped so absent diagnosis fields leave no double spacing.
fn render_header(group: &LabGroup, template: &FormatTemplate) -> Result<String, RenderError> {
    let mut parts: Vec<String> = Vec::with_capacity(template.header_tokens.len());
    for token in &template.header_tokens {
        if token.section != TokenSection::Header {
            return Err(TemplateError::SectionMismatch {
                id: token.id.clone(),
                expected: TokenSection::Header.as_str(),
                actual: token.section.as_str(),
            }
            .into());
        }
        let emitted = match token.payload()? {
            TokenPayload::Field(FieldName::Header(field)) => header_field(group, field),
            TokenPayload::Field(FieldName::Item(_)) => {
                return Err(TemplateError::SectionMismatch {
                    id: token.id.clone(),
                    expected: TokenSection::Header.as_str(),
                    actual: TokenSection::Item.as_str(),
                }
                .into());
            }
            TokenPayload::Literal(text) => text,
            TokenPayload::Separator => template.item_separator.clone(),
            // payload() rejects newlines in the header section.
            TokenPayload::Newline => String::new(),
        };
        if !emitted.is_empty() {
            parts.push(emitted);
        }
    }
    Ok(parts.join(" "))
}

/// Item token emissions concatenate directly.
fn render_item(item: &NormalizedLabItem, template: &FormatTemplate) -> Result<String, RenderError> {
    let mut out = String::new();
    for token in &template.item_tokens {
        if token.section != TokenSection::Item {
            return Err(TemplateError::SectionMismatch {
                id: token.id.clone(),
                expected: TokenSection::Item.as_str(),
                actual: token.section.as_str(),
            }
            .into());
        }
        match token.payload()? {
            TokenPayload::Field(FieldName::Item(field)) => {
                out.push_str(&item_field(item, field));
            }
            TokenPayload::Field(FieldName::Header(_)) => {
                return Err(TemplateError::SectionMismatch {
                    id: token.id.clone(),
                    expected: TokenSection::Item.as_str(),
                    actual: TokenSection::Header.as_str(),
                }
                .into());
            }
            TokenPayload::Literal(text) => out.push_str(&text),
            TokenPayload::Separator => out.push_str(&template.item_separator),
            TokenPayload::Newline => {
                // Newlines only exist in vertical layout.
                if template.mode == LayoutMode::Vertical {
                    out.push('\n');
                }
            }
        }
    }
    Ok(out)
}

fn header_field(group: &LabGroup, field: HeaderField) -> String {
    match field {
        HeaderField::Date => group.date.format("%Y/%m/%d").to_string(),
        HeaderField::Facility => group.facility.clone(),
        HeaderField::DiagnosisCode => group.diagnosis_code.clone(),
        HeaderField::DiagnosisName => group.diagnosis_name.clone(),
    }
}

fn item_field(item: &NormalizedLabItem, field: ItemField) -> String {
    match field {
        ItemField::ItemName => item.display_name().to_string(),
        ItemField::OrderCode => item.order_code.clone(),
        ItemField::Value => item.value.clone(),
        ItemField::Unit => item.unit.clone(),
        ItemField::ReferenceDisplay => reference_display(item.reference_min, item.reference_max),
    }
}

/// Human-readable form of the resolved bounds: `"min-max"`, `">min"`,
/// `"<max"`, or empty.
pub fn reference_display(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        (Some(min), None) => format!(">{min}"),
        (None, Some(max)) => format!("<{max}"),
        (None, None) => String::new(),
    }
}

/// The fixed built-in formatter. Pure string assembly over fields that
/// always exist; this path cannot fail.
fn render_fallback(groups: &[LabGroup], mode: LayoutMode) -> String {
    let mut blocks = Vec::with_capacity(groups.len());
    for group in groups {
        let header = format!("{} - {}", group.date.format("%Y/%m/%d"), group.facility);
        let items: Vec<String> = group
            .items
            .iter()
            .map(|item| {
                format!("{}: {} {}", item.display_name(), item.value, item.unit)
                    .trim_end()
                    .to_string()
            })
            .collect();
        let block = match mode {
            LayoutMode::Vertical => format!("{header}\n{}", items.join("\n")),
            LayoutMode::Horizontal => format!("{header} {}", items.join(", ")),
        };
        blocks.push(block);
    }
    let joiner = match mode {
        LayoutMode::Vertical => "\n\n",
        LayoutMode::Horizontal => "\n",
    };
    blocks.join(joiner)
}
