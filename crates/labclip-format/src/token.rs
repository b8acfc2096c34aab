//! Token id minting.
//!
//! Ids are unique within their list and carry a section prefix plus a
//! numeric suffix (`h1`, `h2`, ... / `i1`, `i2`, ...). The next id is a pure
//! function of the existing list, derived from the max numeric suffix, so
//! concurrent editing sessions never share a counter.

use labclip_model::{FormatToken, TokenSection};

/// Mint the next token id for a list.
pub fn next_token_id(tokens: &[FormatToken], section: TokenSection) -> String {
    let prefix = match section {
        TokenSection::Header => 'h',
        TokenSection::Item => 'i',
    };
    let max_suffix = tokens.iter().filter_map(|token| numeric_suffix(&token.id)).max();
    format!("{prefix}{}", max_suffix.unwrap_or(0) + 1)
}

/// The trailing decimal digits of an id, if any.
fn numeric_suffix(id: &str) -> Option<u64> {
    let digits: String = id
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labclip_model::{FieldName, HeaderField};

    #[test]
    fn test_first_id_starts_at_one() {
        assert_eq!(next_token_id(&[], TokenSection::Header), "h1");
        assert_eq!(next_token_id(&[], TokenSection::Item), "i1");
    }

    #[test]
    fn test_next_id_derives_from_max_suffix() {
        let tokens = vec![
            FormatToken::field("h1", FieldName::Header(HeaderField::Date)),
            FormatToken::field("h7", FieldName::Header(HeaderField::Facility)),
            FormatToken::field("h3", FieldName::Header(HeaderField::DiagnosisCode)),
        ];
        assert_eq!(next_token_id(&tokens, TokenSection::Header), "h8");
    }

    #[test]
    fn test_gaps_from_removals_never_reuse_ids() {
        // Removing h2 must not let a new token take its id while h3 exists.
        let tokens = vec![
            FormatToken::field("h1", FieldName::Header(HeaderField::Date)),
            FormatToken::field("h3", FieldName::Header(HeaderField::Facility)),
        ];
        assert_eq!(next_token_id(&tokens, TokenSection::Header), "h4");
    }

    #[test]
    fn test_ids_without_suffix_are_ignored() {
        let tokens = vec![FormatToken::literal(
            "legacy",
            TokenSection::Item,
            ": ",
        )];
        assert_eq!(next_token_id(&tokens, TokenSection::Item), "i1");
    }
}
