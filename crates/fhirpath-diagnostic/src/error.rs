//! `ParseError` — the single error type every parse failure surfaces as
//! (spec §4.3, §6 "ParseError shape").
//!
//! Hand-written `Display`/`Error` impls rather than `thiserror`: the teacher
//! declares `thiserror` in its workspace dependencies but its own lexer and
//! parser error types (`ori_lexer::LexError`, `ori_parse::ParseError`) are
//! both written by hand, so that's the idiom actually in force here.

use crate::render::render;
use fhirpath_ir::Position;
use std::fmt;

/// A parse failure, carrying both the machine-readable fields and a
/// ready-rendered, caret-annotated `message`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub name: &'static str,
    /// The fully rendered, user-visible diagnostic (spec §4.3's template).
    pub message: String,
    /// The short, fixed-wording error description (spec §4.3's dictionary).
    pub original_message: String,
    pub line: u32,
    pub column: u32,
    pub position: u32,
    pub expression: String,
}

impl ParseError {
    /// Constructs a `ParseError` at `position` within `expression`,
    /// rendering `original_message` into the full caret-block `message` at
    /// the throw site (spec §7: "the formatter is invoked at the throw site").
    pub fn new(original_message: impl Into<String>, position: Position, expression: &str) -> Self {
        let original_message = original_message.into();
        let message = render(&original_message, position, expression);
        ParseError {
            name: "ParseError",
            message,
            original_message,
            line: position.line,
            column: position.column,
            position: position.offset,
            expression: expression.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fields_track_the_position() {
        let err = ParseError::new("Expected identifier after dot", Position::new(8, 1, 9), "Patient..name");
        assert_eq!(err.name, "ParseError");
        assert_eq!(err.original_message, "Expected identifier after dot");
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 9);
        assert_eq!(err.position, 8);
        assert_eq!(err.expression, "Patient..name");
    }

    #[test]
    fn message_contains_the_required_substrings() {
        let err = ParseError::new("boom", Position::new(0, 1, 1), "x");
        assert!(err.message.contains("ParseError:"));
        assert!(err.message.contains("at line"));
        assert!(err.message.contains('^'));
    }
}
