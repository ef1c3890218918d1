//! Reserved-word lookup.
//!
//! Grounded in the teacher's `ori_lexer/src/keywords.rs` length-bucketed
//! table shape, trimmed to FHIRPath's much smaller keyword set.

use fhirpath_ir::TokenKind;

/// Returns the operator/literal token kind a bare identifier-shaped word
/// names, if any (spec §3.2's keyword tokens plus the `true`/`false`
/// boolean literals).
pub(crate) fn lookup(word: &str) -> Option<TokenKind> {
    Some(match word {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "xor" => TokenKind::Xor,
        "implies" => TokenKind::Implies,
        "div" => TokenKind::Div,
        "mod" => TokenKind::Mod,
        "in" => TokenKind::In,
        "contains" => TokenKind::Contains,
        "is" => TokenKind::Is,
        "as" => TokenKind::As,
        "not" => TokenKind::Not,
        "true" | "false" => TokenKind::Boolean,
        _ => return None,
    })
}

/// The calendar-duration unit keywords recognized when gluing a number and a
/// trailing word into a `Quantity` token (spec §4.1 Quantity literal).
const CALENDAR_UNITS: &[&str] = &[
    "year",
    "years",
    "month",
    "months",
    "week",
    "weeks",
    "day",
    "days",
    "hour",
    "hours",
    "minute",
    "minutes",
    "second",
    "seconds",
    "millisecond",
    "milliseconds",
];

pub(crate) fn is_calendar_unit(word: &str) -> bool {
    CALENDAR_UNITS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recognizes_keyword_operators() {
        assert_eq!(lookup("div"), Some(TokenKind::Div));
        assert_eq!(lookup("implies"), Some(TokenKind::Implies));
        assert_eq!(lookup("true"), Some(TokenKind::Boolean));
        assert_eq!(lookup("patient"), None);
    }

    #[test]
    fn recognizes_calendar_units() {
        assert!(is_calendar_unit("days"));
        assert!(is_calendar_unit("millisecond"));
        assert!(!is_calendar_unit("mg"));
    }
}
