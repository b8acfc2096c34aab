//! Interactive template editing session.
//!
//! The editor is a small state machine over a [`FormatTemplate`]:
//! `Viewing -> EditingLiteral -> Viewing` and
//! `Viewing -> EditingSeparator -> Viewing`, nothing else. Structural
//! operations (add/remove/reorder) require the Viewing state. Header-list
//! and item-list edits are independent; no operation ever touches the other
//! list.

use labclip_model::{
    FieldName, FormatTemplate, FormatToken, LayoutMode, TemplateError, TokenKind, TokenSection,
};

use crate::token::next_token_id;

/// Where an editing session currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Viewing,
    EditingLiteral {
        section: TokenSection,
        token_id: String,
    },
    EditingSeparator,
}

/// One editing session over a template.
///
/// The session owns its template; callers take the edited template back with
/// [`TemplateEditor::into_template`] and persist it themselves.
#[derive(Debug, Clone, Default)]
pub struct TemplateEditor {
    template: FormatTemplate,
    state: EditorState,
}

impl TemplateEditor {
    pub fn new(template: FormatTemplate) -> Self {
        Self {
            template,
            state: EditorState::Viewing,
        }
    }

    pub fn template(&self) -> &FormatTemplate {
        &self.template
    }

    pub fn into_template(self) -> FormatTemplate {
        self.template
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Append a field token to the list its field belongs to.
    pub fn add_field(&mut self, field: FieldName) -> Result<&FormatToken, TemplateError> {
        self.require_viewing()?;
        let section = field.section();
        let id = next_token_id(self.tokens(section), section);
        let token = FormatToken::field(id, field);
        self.tokens_mut(section).push(token);
        Ok(self.tokens(section).last().expect("token just pushed"))
    }

    /// Append a literal token.
    pub fn add_literal(
        &mut self,
        section: TokenSection,
        text: impl Into<String>,
    ) -> Result<&FormatToken, TemplateError> {
        self.require_viewing()?;
        let id = next_token_id(self.tokens(section), section);
        let token = FormatToken::literal(id, section, text);
        self.tokens_mut(section).push(token);
        Ok(self.tokens(section).last().expect("token just pushed"))
    }

    /// Append a separator token (emits the template's item separator).
    pub fn add_separator(&mut self, section: TokenSection) -> Result<&FormatToken, TemplateError> {
        self.require_viewing()?;
        let id = next_token_id(self.tokens(section), section);
        let token = FormatToken::separator(id, section);
        self.tokens_mut(section).push(token);
        Ok(self.tokens(section).last().expect("token just pushed"))
    }

    /// Append a newline token. Newlines exist only in the item list.
    pub fn add_newline(&mut self) -> Result<&FormatToken, TemplateError> {
        self.require_viewing()?;
        let id = next_token_id(self.tokens(TokenSection::Item), TokenSection::Item);
        let token = FormatToken::newline(id);
        self.tokens_mut(TokenSection::Item).push(token);
        Ok(self
            .tokens(TokenSection::Item)
            .last()
            .expect("token just pushed"))
    }

    /// Remove a token from a list by id.
    pub fn remove_token(
        &mut self,
        section: TokenSection,
        id: &str,
    ) -> Result<FormatToken, TemplateError> {
        self.require_viewing()?;
        let position = self.position(section, id)?;
        Ok(self.tokens_mut(section).remove(position))
    }

    /// Move a token to a new position within its list (clamped to the list
    /// end).
    pub fn move_token(
        &mut self,
        section: TokenSection,
        id: &str,
        new_index: usize,
    ) -> Result<(), TemplateError> {
        self.require_viewing()?;
        let position = self.position(section, id)?;
        let tokens = self.tokens_mut(section);
        let token = tokens.remove(position);
        let target = new_index.min(tokens.len());
        tokens.insert(target, token);
        Ok(())
    }

    /// Start editing a literal token's text. Returns the current text.
    pub fn begin_literal_edit(
        &mut self,
        section: TokenSection,
        id: &str,
    ) -> Result<&str, TemplateError> {
        self.require_viewing()?;
        let position = self.position(section, id)?;
        let token = &self.tokens(section)[position];
        if token.kind != TokenKind::Literal {
            return Err(TemplateError::NotALiteralToken(id.to_string()));
        }
        self.state = EditorState::EditingLiteral {
            section,
            token_id: id.to_string(),
        };
        Ok(self.tokens(section)[position]
            .literal_value
            .as_deref()
            .unwrap_or(""))
    }

    /// Commit the literal edit in progress and return to Viewing.
    pub fn commit_literal(&mut self, text: impl Into<String>) -> Result<(), TemplateError> {
        let EditorState::EditingLiteral { section, token_id } = self.state.clone() else {
            return Err(TemplateError::NoEditInProgress);
        };
        let position = self.position(section, &token_id)?;
        self.tokens_mut(section)[position].literal_value = Some(text.into());
        self.state = EditorState::Viewing;
        Ok(())
    }

    /// Start editing the item separator. Returns the current separator.
    pub fn begin_separator_edit(&mut self) -> Result<&str, TemplateError> {
        self.require_viewing()?;
        self.state = EditorState::EditingSeparator;
        Ok(&self.template.item_separator)
    }

    /// Commit the separator edit in progress and return to Viewing.
    pub fn commit_separator(&mut self, separator: impl Into<String>) -> Result<(), TemplateError> {
        if self.state != EditorState::EditingSeparator {
            return Err(TemplateError::NoEditInProgress);
        }
        self.template.item_separator = separator.into();
        self.state = EditorState::Viewing;
        Ok(())
    }

    /// Abandon the edit in progress, leaving the template unchanged.
    pub fn cancel_edit(&mut self) -> Result<(), TemplateError> {
        if self.state == EditorState::Viewing {
            return Err(TemplateError::NoEditInProgress);
        }
        self.state = EditorState::Viewing;
        Ok(())
    }

    /// Switch the layout mode.
    pub fn set_mode(&mut self, mode: LayoutMode) -> Result<(), TemplateError> {
        self.require_viewing()?;
        self.template.mode = mode;
        Ok(())
    }

    fn require_viewing(&self) -> Result<(), TemplateError> {
        if self.state == EditorState::Viewing {
            Ok(())
        } else {
            Err(TemplateError::EditInProgress)
        }
    }

    fn position(&self, section: TokenSection, id: &str) -> Result<usize, TemplateError> {
        self.tokens(section)
            .iter()
            .position(|token| token.id == id)
            .ok_or_else(|| TemplateError::UnknownTokenId(id.to_string()))
    }

    fn tokens(&self, section: TokenSection) -> &[FormatToken] {
        match section {
            TokenSection::Header => &self.template.header_tokens,
            TokenSection::Item => &self.template.item_tokens,
        }
    }

    fn tokens_mut(&mut self, section: TokenSection) -> &mut Vec<FormatToken> {
        match section {
            TokenSection::Header => &mut self.template.header_tokens,
            TokenSection::Item => &mut self.template.item_tokens,
        }
    }
}
