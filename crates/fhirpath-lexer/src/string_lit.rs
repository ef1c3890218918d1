//! Escape processing for single-quoted strings and back-tick quoted
//! identifiers.
//!
//! FHIRPath strings escape with a backslash (`\n`, `\uXXXX`, ...); quoted
//! identifiers instead double an embedded backtick. Both are handled here
//! since they share the "scan until unescaped delimiter" shape.

use crate::cursor::Cursor;
use crate::lex_error::LexErrorKind;

/// Reads one (possibly multi-byte) character at the cursor and advances past
/// it, without relying on `unsafe` UTF-8 slicing.
fn next_char(cursor: &mut Cursor) -> char {
    let rest = &cursor.source()[cursor.pos()..];
    let ch = rest.chars().next().unwrap_or('\u{FFFD}');
    for _ in 0..ch.len_utf8() {
        cursor.advance();
    }
    ch
}

/// Scans a quoted string body for the given delimiter (`'` for ordinary
/// strings, `"` for the env-variable `%"..."` form). Assumes the opening
/// delimiter has already been consumed; consumes the closing one.
pub(crate) fn scan_string_body(cursor: &mut Cursor, delimiter: u8) -> Result<String, LexErrorKind> {
    let mut out = String::new();
    loop {
        if cursor.is_eof() {
            return Err(LexErrorKind::UnterminatedString);
        }
        let b = cursor.current();
        if b == delimiter {
            cursor.advance();
            return Ok(out);
        }
        match b {
            b'\\' => {
                cursor.advance();
                match cursor.current() {
                    b'\'' => {
                        out.push('\'');
                        cursor.advance();
                    }
                    b'"' => {
                        out.push('"');
                        cursor.advance();
                    }
                    b'`' => {
                        out.push('`');
                        cursor.advance();
                    }
                    b'\\' => {
                        out.push('\\');
                        cursor.advance();
                    }
                    b'/' => {
                        out.push('/');
                        cursor.advance();
                    }
                    b'n' => {
                        out.push('\n');
                        cursor.advance();
                    }
                    b'r' => {
                        out.push('\r');
                        cursor.advance();
                    }
                    b't' => {
                        out.push('\t');
                        cursor.advance();
                    }
                    b'f' => {
                        out.push('\x0C');
                        cursor.advance();
                    }
                    b'u' => {
                        cursor.advance();
                        let mut hex = String::with_capacity(4);
                        for _ in 0..4 {
                            let h = cursor.current();
                            if h.is_ascii_hexdigit() {
                                hex.push(h as char);
                                cursor.advance();
                            } else {
                                return Err(LexErrorKind::InvalidUnicodeEscapeSequence);
                            }
                        }
                        let code = u32::from_str_radix(&hex, 16)
                            .map_err(|_| LexErrorKind::InvalidUnicodeEscapeSequence)?;
                        let ch = char::from_u32(code)
                            .ok_or(LexErrorKind::InvalidUnicodeEscapeSequence)?;
                        out.push(ch);
                    }
                    0 => return Err(LexErrorKind::UnterminatedString),
                    _ => return Err(LexErrorKind::InvalidEscapeSequence),
                }
            }
            0 => return Err(LexErrorKind::UnterminatedString),
            _ => out.push(next_char(cursor)),
        }
    }
}

/// Scans a backtick-quoted identifier body. Assumes the opening `` ` `` has
/// already been consumed; consumes the closing `` ` ``. `` `` `` inside the
/// identifier is an escaped literal backtick.
pub(crate) fn scan_quoted_identifier_body(cursor: &mut Cursor) -> Result<String, LexErrorKind> {
    let mut out = String::new();
    loop {
        if cursor.is_eof() {
            return Err(LexErrorKind::UnterminatedQuotedIdentifier);
        }
        let b = cursor.current();
        if b == b'`' {
            if cursor.peek_at(1) == b'`' {
                out.push('`');
                cursor.advance();
                cursor.advance();
                continue;
            }
            cursor.advance();
            return Ok(out);
        }
        out.push(next_char(cursor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(src: &str) -> Result<String, LexErrorKind> {
        let mut c = Cursor::new(src);
        c.advance(); // opening delimiter
        scan_string_body(&mut c, b'\'')
    }

    #[test]
    fn plain_string() {
        assert_eq!(scan("'hello'").unwrap(), "hello");
    }

    #[test]
    fn escapes_are_unescaped() {
        assert_eq!(scan(r"'a\nb'").unwrap(), "a\nb");
        assert_eq!(scan(r"'A'").unwrap(), "A");
    }

    #[test]
    fn unterminated_string_errors() {
        assert_eq!(scan("'abc"), Err(LexErrorKind::UnterminatedString));
    }

    #[test]
    fn invalid_escape_errors() {
        assert_eq!(scan(r"'\q'"), Err(LexErrorKind::InvalidEscapeSequence));
    }

    #[test]
    fn quoted_identifier_doubling() {
        let mut c = Cursor::new("`a``b`");
        c.advance();
        assert_eq!(scan_quoted_identifier_body(&mut c).unwrap(), "a`b");
    }
}
