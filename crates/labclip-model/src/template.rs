use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// Which token list a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSection {
    Header,
    Item,
}

impl TokenSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSection::Header => "header",
            TokenSection::Item => "item",
        }
    }
}

impl fmt::Display for TokenSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Field,
    Literal,
    Separator,
    Newline,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Field => "field",
            TokenKind::Literal => "literal",
            TokenKind::Separator => "separator",
            TokenKind::Newline => "newline",
        }
    }
}

/// Group-level attributes a header field token can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderField {
    Date,
    Facility,
    DiagnosisCode,
    DiagnosisName,
}

impl HeaderField {
    pub const ALL: [HeaderField; 4] = [
        HeaderField::Date,
        HeaderField::Facility,
        HeaderField::DiagnosisCode,
        HeaderField::DiagnosisName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderField::Date => "date",
            HeaderField::Facility => "facility",
            HeaderField::DiagnosisCode => "diagnosisCode",
            HeaderField::DiagnosisName => "diagnosisName",
        }
    }
}

/// Item-level attributes an item field token can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemField {
    ItemName,
    OrderCode,
    Value,
    Unit,
    ReferenceDisplay,
}

impl ItemField {
    pub const ALL: [ItemField; 5] = [
        ItemField::ItemName,
        ItemField::OrderCode,
        ItemField::Value,
        ItemField::Unit,
        ItemField::ReferenceDisplay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemField::ItemName => "itemName",
            ItemField::OrderCode => "orderCode",
            ItemField::Value => "value",
            ItemField::Unit => "unit",
            ItemField::ReferenceDisplay => "referenceDisplay",
        }
    }
}

/// A field name, typed by the section it can appear in.
///
/// Serialized untagged: header and item field name strings are disjoint, so
/// the persisted form stays the flat `"fieldName": "date"` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldName {
    Header(HeaderField),
    Item(ItemField),
}

impl FieldName {
    /// The section this field is valid in.
    pub fn section(&self) -> TokenSection {
        match self {
            FieldName::Header(_) => TokenSection::Header,
            FieldName::Item(_) => TokenSection::Item,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Header(field) => field.as_str(),
            FieldName::Item(field) => field.as_str(),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        for field in HeaderField::ALL {
            if field.as_str() == trimmed {
                return Ok(FieldName::Header(field));
            }
        }
        for field in ItemField::ALL {
            if field.as_str() == trimmed {
                return Ok(FieldName::Item(field));
            }
        }
        Err(format!("Unknown field name: {s}"))
    }
}

/// The typed content of a token, with kind/field consistency already checked.
///
/// Renderers match this exhaustively instead of dispatching on raw
/// kind/field strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPayload {
    Field(FieldName),
    Literal(String),
    Separator,
    Newline,
}

/// One building block of a copy template.
///
/// The flat shape (`id`, `section`, `kind`, optional `fieldName` /
/// `literalValue`) is the persisted JSON contract; [`FormatToken::payload`]
/// lifts it into the typed [`TokenPayload`] and rejects inconsistent
/// combinations. Ids are unique within their list, not globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatToken {
    pub id: String,
    pub section: TokenSection,
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<FieldName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal_value: Option<String>,
}

impl FormatToken {
    pub fn field(id: impl Into<String>, field: FieldName) -> Self {
        Self {
            id: id.into(),
            section: field.section(),
            kind: TokenKind::Field,
            field_name: Some(field),
            literal_value: None,
        }
    }

    pub fn literal(id: impl Into<String>, section: TokenSection, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            section,
            kind: TokenKind::Literal,
            field_name: None,
            literal_value: Some(text.into()),
        }
    }

    pub fn separator(id: impl Into<String>, section: TokenSection) -> Self {
        Self {
            id: id.into(),
            section,
            kind: TokenKind::Separator,
            field_name: None,
            literal_value: None,
        }
    }

    pub fn newline(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            section: TokenSection::Item,
            kind: TokenKind::Newline,
            field_name: None,
            literal_value: None,
        }
    }

    /// Typed view of this token, checking kind/field/section consistency.
    pub fn payload(&self) -> Result<TokenPayload, TemplateError> {
        match self.kind {
            TokenKind::Field => match self.field_name {
                Some(field) if field.section() == self.section => Ok(TokenPayload::Field(field)),
                Some(field) => Err(TemplateError::SectionMismatch {
                    id: self.id.clone(),
                    expected: self.section.as_str(),
                    actual: field.section().as_str(),
                }),
                None => Err(TemplateError::IncompleteToken {
                    id: self.id.clone(),
                    kind: "field",
                    missing: "fieldName",
                }),
            },
            TokenKind::Literal => match &self.literal_value {
                Some(text) => Ok(TokenPayload::Literal(text.clone())),
                None => Err(TemplateError::IncompleteToken {
                    id: self.id.clone(),
                    kind: "literal",
                    missing: "literalValue",
                }),
            },
            TokenKind::Separator => Ok(TokenPayload::Separator),
            TokenKind::Newline => {
                if self.section == TokenSection::Header {
                    Err(TemplateError::NewlineInHeader)
                } else {
                    Ok(TokenPayload::Newline)
                }
            }
        }
    }
}

/// Output layout for rendered groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Vertical,
    Horizontal,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Vertical => "vertical",
            LayoutMode::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vertical" => Ok(LayoutMode::Vertical),
            "horizontal" => Ok(LayoutMode::Horizontal),
            _ => Err(format!("Unknown layout mode: {s}")),
        }
    }
}

/// A user-authored copy template.
///
/// This is the entire persisted state of the template engine. It is created
/// and mutated only through explicit editor operations; rendering never
/// changes it. The embedding application owns storage and change
/// notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatTemplate {
    pub header_tokens: Vec<FormatToken>,
    pub item_tokens: Vec<FormatToken>,
    pub mode: LayoutMode,
    pub item_separator: String,
}

impl Default for FormatTemplate {
    /// The built-in starting template: `date facility` header, one
    /// `name: value unit` line per item.
    fn default() -> Self {
        Self {
            header_tokens: vec![
                FormatToken::field("h1", FieldName::Header(HeaderField::Date)),
                FormatToken::field("h2", FieldName::Header(HeaderField::Facility)),
            ],
            item_tokens: vec![
                FormatToken::field("i1", FieldName::Item(ItemField::ItemName)),
                FormatToken::literal("i2", TokenSection::Item, ": "),
                FormatToken::field("i3", FieldName::Item(ItemField::Value)),
                FormatToken::literal("i4", TokenSection::Item, " "),
                FormatToken::field("i5", FieldName::Item(ItemField::Unit)),
            ],
            mode: LayoutMode::Vertical,
            item_separator: ", ".to_string(),
        }
    }
}

impl FormatTemplate {
    /// Check every token for kind/field consistency and section agreement
    /// with the list it lives in.
    pub fn validate(&self) -> Result<(), TemplateError> {
        for (tokens, section) in [
            (&self.header_tokens, TokenSection::Header),
            (&self.item_tokens, TokenSection::Item),
        ] {
            for token in tokens {
                if token.section != section {
                    return Err(TemplateError::SectionMismatch {
                        id: token.id.clone(),
                        expected: section.as_str(),
                        actual: token.section.as_str(),
                    });
                }
                token.payload()?;
            }
        }
        Ok(())
    }

    /// True when both token lists have at least one token.
    pub fn has_tokens(&self) -> bool {
        !self.header_tokens.is_empty() && !self.item_tokens.is_empty()
    }
}
