//! Lexer error type.
//!
//! Mirrors the teacher's `LexError` shape (`ori_lexer/src/lex_error.rs`) but
//! trimmed to what FHIRPath's lexical grammar actually needs: a `kind` plus
//! the position it occurred at. The parser (which owns the full source text
//! and the diagnostic formatter) turns this into a `fhirpath_diagnostic::ParseError`.

use fhirpath_ir::Position;
use std::fmt;

/// What went wrong while scanning a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedString,
    UnterminatedComment,
    UnterminatedQuotedIdentifier,
    InvalidEscapeSequence,
    InvalidUnicodeEscapeSequence,
    DoubleQuotedString,
    /// A digit run glued directly to identifier characters with no
    /// whitespace and no recognized `L`/`l` suffix (e.g. `123Labs`).
    InvalidNumberSuffix,
    /// `%` followed by a digit or whitespace.
    InvalidEnvVariable,
    /// A byte that starts no valid token (and isn't inside a string/comment).
    UnexpectedCharacter(char),
}

impl LexErrorKind {
    /// The fixed message text spec.md §4.3/§7 associates with each lexical
    /// error kind.
    pub fn message(&self) -> String {
        match self {
            LexErrorKind::UnterminatedString => "Unterminated string literal".to_string(),
            LexErrorKind::UnterminatedComment => "Unterminated comment".to_string(),
            LexErrorKind::UnterminatedQuotedIdentifier => {
                "Unterminated quoted identifier".to_string()
            }
            LexErrorKind::InvalidEscapeSequence => "Invalid escape sequence".to_string(),
            LexErrorKind::InvalidUnicodeEscapeSequence => {
                "Invalid Unicode escape sequence".to_string()
            }
            LexErrorKind::DoubleQuotedString => {
                "Double-quoted strings are not allowed".to_string()
            }
            LexErrorKind::InvalidNumberSuffix => {
                "Invalid character immediately following a number".to_string()
            }
            LexErrorKind::InvalidEnvVariable => {
                "Expected an identifier or quoted string after `%`".to_string()
            }
            LexErrorKind::UnexpectedCharacter(c) => format!("Unexpected character '{c}'"),
        }
    }
}

/// A lexical failure, located in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

impl LexError {
    pub fn new(kind: LexErrorKind, position: Position) -> Self {
        LexError { kind, position }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind.message(), self.position)
    }
}

impl std::error::Error for LexError {}
