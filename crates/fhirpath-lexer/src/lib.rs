//! The FHIRPath tokenizer.
//!
//! Turns source text into a stream of [`Token`]s with source positions
//! attached, one lexeme at a time. Keywords are always tokenized as their
//! dedicated [`TokenKind`] (`is`, `div`, `and`, ...); the parser re-reads
//! them as plain identifiers in the contexts where FHIRPath allows that
//! (spec §4.1 "Context-sensitive reclassification") — this crate carries no
//! parser state.
//!
//! Grounded in the two-stage raw/cook split of the teacher's
//! `ori_lexer_core` + `ori_lexer` crates, collapsed into one crate here since
//! nothing else in this project needs raw (uncooked) tokens.

mod classes;
mod cursor;
mod datetime_lit;
mod keywords;
mod lex_error;
mod number_lit;
mod string_lit;

pub use datetime_lit::{is_valid_date, is_valid_datetime, is_valid_time};
pub use lex_error::{LexError, LexErrorKind};

use classes::{is_ident_continue, is_ident_start};
use cursor::Cursor;
use fhirpath_ir::{Position, Token, TokenKind};
use tracing::trace;

/// Scans FHIRPath source text into tokens, one at a time, with one token of
/// lookahead.
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    peeked: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Tokenizer {
            cursor: Cursor::new(source),
            peeked: None,
        }
    }

    /// Restarts scanning over a new source string, discarding any lookahead.
    pub fn reset(&mut self, source: &'a str) {
        self.cursor = Cursor::new(source);
        self.peeked = None;
    }

    /// Consumes and returns the next token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if let Some(tok) = self.peeked.take() {
            return Ok(tok);
        }
        self.scan_token()
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token, LexError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.scan_token()?);
        }
        Ok(self.peeked.as_ref().expect("just populated"))
    }

    fn scan_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;
        let start_pos = self.cursor.position();

        if self.cursor.is_eof() {
            return Ok(Token::new(TokenKind::Eof, "", start_pos));
        }

        let b = self.cursor.current();
        trace!(byte = b, ?start_pos, "scanning token");

        let tok = match b {
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b',' => self.single(TokenKind::Comma),
            b'.' => self.single(TokenKind::Dot),
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'*' => self.single(TokenKind::Star),
            b'/' => self.single(TokenKind::Slash),
            b'&' => self.single(TokenKind::Amp),
            b'|' => self.single(TokenKind::Pipe),
            b'~' => self.single(TokenKind::Equivalence),
            b'=' => self.single(TokenKind::Equals),
            b'!' => return self.scan_bang(start_pos),
            b'<' => return Ok(self.scan_angle(b'<', TokenKind::LessThan, TokenKind::LessEquals, start_pos)),
            b'>' => {
                return Ok(self.scan_angle(b'>', TokenKind::GreaterThan, TokenKind::GreaterEquals, start_pos))
            }
            b'0'..=b'9' => return number_lit::scan_number(&mut self.cursor, start_pos).map_err(|k| self.err(k, start_pos)),
            b'@' => {
                self.cursor.advance();
                return Ok(datetime_lit::scan_date_time(&mut self.cursor, start_pos));
            }
            b'\'' => return self.scan_string(start_pos),
            b'"' => return Err(self.err(LexErrorKind::DoubleQuotedString, start_pos)),
            b'`' => return self.scan_quoted_identifier(start_pos),
            b'$' => return self.scan_variable(start_pos),
            b'%' => return self.scan_env_variable(start_pos),
            _ if is_ident_start(b) => return Ok(self.scan_identifier(start_pos)),
            _ => {
                let ch = self.cursor.source()[self.cursor.pos()..]
                    .chars()
                    .next()
                    .unwrap_or('\u{FFFD}');
                return Err(self.err(LexErrorKind::UnexpectedCharacter(ch), start_pos));
            }
        };
        Ok(tok)
    }

    fn err(&self, kind: LexErrorKind, position: Position) -> LexError {
        LexError::new(kind, position)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let pos = self.cursor.position();
        let start = self.cursor.pos();
        self.cursor.advance();
        let text = self.cursor.slice_from(start).to_string();
        Token::new(kind, text, pos)
    }

    fn scan_bang(&mut self, start_pos: Position) -> Result<Token, LexError> {
        self.cursor.advance(); // consume '!'
        match self.cursor.current() {
            b'=' => {
                self.cursor.advance();
                Ok(Token::new(TokenKind::NotEquals, "!=", start_pos))
            }
            b'~' => {
                self.cursor.advance();
                Ok(Token::new(TokenKind::NotEquivalence, "!~", start_pos))
            }
            _ => Err(self.err(LexErrorKind::UnexpectedCharacter('!'), start_pos)),
        }
    }

    fn scan_angle(&mut self, ch: u8, plain: TokenKind, with_eq: TokenKind, start_pos: Position) -> Token {
        self.cursor.advance(); // consume '<' or '>'
        if self.cursor.current() == b'=' {
            self.cursor.advance();
            Token::new(with_eq, format!("{}=", ch as char), start_pos)
        } else {
            Token::new(plain, (ch as char).to_string(), start_pos)
        }
    }

    fn scan_identifier(&mut self, start_pos: Position) -> Token {
        let start = self.cursor.pos();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice_from(start).to_string();
        let kind = keywords::lookup(&text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, start_pos)
    }

    fn scan_string(&mut self, start_pos: Position) -> Result<Token, LexError> {
        self.cursor.advance(); // consume opening '
        let value = string_lit::scan_string_body(&mut self.cursor, b'\'').map_err(|k| self.err(k, start_pos))?;
        Ok(Token::new(TokenKind::String, value, start_pos))
    }

    fn scan_quoted_identifier(&mut self, start_pos: Position) -> Result<Token, LexError> {
        self.cursor.advance(); // consume opening `
        let value =
            string_lit::scan_quoted_identifier_body(&mut self.cursor).map_err(|k| self.err(k, start_pos))?;
        Ok(Token::new(TokenKind::QuotedIdentifier, value, start_pos))
    }

    fn scan_variable(&mut self, start_pos: Position) -> Result<Token, LexError> {
        self.cursor.advance(); // consume '$'
        if !is_ident_start(self.cursor.current()) {
            return Err(self.err(LexErrorKind::UnexpectedCharacter('$'), start_pos));
        }
        let start = self.cursor.pos();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice_from(start).to_string();
        Ok(Token::new(TokenKind::Variable, text, start_pos))
    }

    fn scan_env_variable(&mut self, start_pos: Position) -> Result<Token, LexError> {
        self.cursor.advance(); // consume '%'
        match self.cursor.current() {
            b'\'' => {
                let value = self.scan_raw_quoted(b'\'').map_err(|k| self.err(k, start_pos))?;
                Ok(Token::new(TokenKind::EnvVariable, value, start_pos))
            }
            b'"' => {
                let value = self.scan_raw_quoted(b'"').map_err(|k| self.err(k, start_pos))?;
                Ok(Token::new(TokenKind::EnvVariable, value, start_pos))
            }
            b if is_ident_start(b) => {
                let start = self.cursor.pos();
                self.cursor.eat_while(is_ident_continue);
                let text = self.cursor.slice_from(start).to_string();
                Ok(Token::new(TokenKind::EnvVariable, text, start_pos))
            }
            _ => Err(self.err(LexErrorKind::InvalidEnvVariable, start_pos)),
        }
    }

    /// Scans a quoted run, returning the raw source text *including* its
    /// surrounding quotes, without interpreting escapes — spec §4.1's
    /// `%`-variable form preserves the original quoting verbatim in `value`.
    fn scan_raw_quoted(&mut self, quote: u8) -> Result<String, LexErrorKind> {
        let start = self.cursor.pos();
        self.cursor.advance(); // consume opening quote
        loop {
            if self.cursor.is_eof() {
                return Err(LexErrorKind::UnterminatedString);
            }
            let b = self.cursor.current();
            if b == b'\\' {
                self.cursor.advance();
                if self.cursor.is_eof() {
                    return Err(LexErrorKind::UnterminatedString);
                }
                self.cursor.advance();
                continue;
            }
            self.cursor.advance();
            if b == quote {
                break;
            }
        }
        Ok(self.cursor.slice_from(start).to_string())
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.cursor.advance();
                }
                b'/' if self.cursor.peek_at(1) == b'/' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.eat_until_newline_or_eof();
                }
                b'/' if self.cursor.peek_at(1) == b'*' => {
                    let start_pos = self.cursor.position();
                    self.cursor.advance();
                    self.cursor.advance();
                    match self.cursor.find("*/") {
                        Some(offset) => {
                            for _ in 0..offset + 2 {
                                self.cursor.advance();
                            }
                        }
                        None => {
                            while !self.cursor.is_eof() {
                                self.cursor.advance();
                            }
                            return Err(self.err(LexErrorKind::UnterminatedComment, start_pos));
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }
}

/// Tokenizes an entire source string, stopping at (and including) `Eof`.
/// Convenience wrapper for tests and tools that don't need streaming.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = tokenizer.next_token()?;
        let is_eof = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if is_eof {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn member_access_chain() {
        assert_eq!(
            kinds("Patient.name.given"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn arithmetic_with_precedence_tokens() {
        assert_eq!(
            kinds("1 + 2 * 3"),
            vec![
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Star,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_tokenize_as_their_own_kind() {
        assert_eq!(
            kinds("a or b implies c"),
            vec![
                TokenKind::Identifier,
                TokenKind::Or,
                TokenKind::Identifier,
                TokenKind::Implies,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn is_and_dotted_type_specifier() {
        let toks = tokenize("value is FHIR.Observation").unwrap();
        assert_eq!(
            toks.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Identifier,
                TokenKind::Is,
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn empty_braces_are_two_structural_tokens() {
        assert_eq!(kinds("{}"), vec![TokenKind::LBrace, TokenKind::RBrace, TokenKind::Eof]);
    }

    #[test]
    fn quantity_literal() {
        let toks = tokenize("5 'mg'").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Quantity);
        assert_eq!(toks[0].value, "5 'mg'");
    }

    #[test]
    fn long_number_literal() {
        let toks = tokenize("12345L").unwrap();
        assert_eq!(toks[0].kind, TokenKind::LongNumber);
        assert_eq!(toks[0].value, "12345");
    }

    #[test]
    fn function_call_paren_is_separate_from_identifier() {
        assert_eq!(
            kinds("Patient.name("),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn double_dot_is_two_dot_tokens() {
        assert_eq!(
            kinds("Patient..name"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_a_lex_error() {
        let err = tokenize("'unterminated").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn double_quoted_string_rejected() {
        let err = tokenize("\"abc\"").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::DoubleQuotedString);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut t = Tokenizer::new("a.b");
        let first = t.peek().unwrap().clone();
        assert_eq!(first.kind, TokenKind::Identifier);
        let consumed = t.next_token().unwrap();
        assert_eq!(consumed, first);
        assert_eq!(t.next_token().unwrap().kind, TokenKind::Dot);
    }

    #[test]
    fn line_comments_are_skipped() {
        assert_eq!(
            kinds("a // comment\n.b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn block_comments_are_skipped() {
        assert_eq!(
            kinds("a /* skip\nme */ .b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn variable_and_env_variable() {
        let toks = tokenize("$this + %us-zip").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Variable);
        assert_eq!(toks[0].value, "this");
        // %us-zip: '-' is not an identifier char, so only "us" is consumed.
        assert_eq!(toks[2].kind, TokenKind::EnvVariable);
        assert_eq!(toks[2].value, "us");
    }

    #[test]
    fn quoted_env_variable_keeps_its_quotes() {
        let toks = tokenize("%\"vs-name\"").unwrap();
        assert_eq!(toks[0].kind, TokenKind::EnvVariable);
        assert_eq!(toks[0].value, "\"vs-name\"");

        let toks = tokenize("%'my constant'").unwrap();
        assert_eq!(toks[0].value, "'my constant'");
    }
}
