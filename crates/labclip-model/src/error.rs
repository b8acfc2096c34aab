use thiserror::Error;

/// Structural faults in a format template or its editing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown token id: {0}")]
    UnknownTokenId(String),
    #[error("token {id} belongs to the {actual} section, not {expected}")]
    SectionMismatch {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("newline tokens are only valid in the item list")]
    NewlineInHeader,
    #[error("{kind} token {id} is missing its {missing}")]
    IncompleteToken {
        id: String,
        kind: &'static str,
        missing: &'static str,
    },
    #[error("token {0} is not a literal token")]
    NotALiteralToken(String),
    #[error("another edit is already in progress")]
    EditInProgress,
    #[error("no edit is in progress")]
    NoEditInProgress,
}
