//! Date/time literal scanning and shape validation.
//!
//! The tokenizer is deliberately permissive here: it captures whatever
//! digit/separator text follows `@` and classifies it as `Date`, `DateTime`,
//! or `Time` by shape alone, per the Open Question resolution in
//! `SPEC_FULL.md` ("@invalid-date is reported at parse time"). The
//! `is_valid_*` functions below are used by the parser's literal handler,
//! not by the tokenizer itself.

use crate::cursor::Cursor;
use fhirpath_ir::{Position, Token, TokenKind};

/// Scans the text following an already-consumed `@` and produces a
/// `Date`/`DateTime`/`Time` token without validating its shape.
pub(crate) fn scan_date_time(cursor: &mut Cursor, start_pos: Position) -> Token {
    let start = cursor.pos();
    cursor.eat_while(|b| {
        b.is_ascii_digit() || matches!(b, b'-' | b':' | b'.' | b'T' | b'Z' | b'+')
    });
    let text = cursor.slice_from(start).to_string();
    let kind = classify(&text);
    Token::new(kind, text, start_pos)
}

fn classify(text: &str) -> TokenKind {
    if text.starts_with('T') {
        TokenKind::Time
    } else if text.contains('T') {
        TokenKind::DateTime
    } else {
        TokenKind::Date
    }
}

fn is_digits(s: &str, n: usize) -> bool {
    s.len() == n && s.bytes().all(|b| b.is_ascii_digit())
}

/// `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`.
pub fn is_valid_date(text: &str) -> bool {
    match text.split('-').collect::<Vec<_>>().as_slice() {
        [y] => is_digits(y, 4),
        [y, m] => is_digits(y, 4) && is_digits(m, 2),
        [y, m, d] => is_digits(y, 4) && is_digits(m, 2) && is_digits(d, 2),
        _ => false,
    }
}

fn strip_timezone(s: &str) -> &str {
    if let Some(stripped) = s.strip_suffix('Z') {
        return stripped;
    }
    if s.len() >= 6 {
        let tail = &s[s.len() - 6..];
        let mut bytes = tail.bytes();
        let sign = bytes.next();
        if matches!(sign, Some(b'+') | Some(b'-')) && tail.as_bytes()[3] == b':' {
            return &s[..s.len() - 6];
        }
    }
    s
}

fn is_valid_time_of_day(s: &str) -> bool {
    let s = strip_timezone(s);
    if s.is_empty() {
        return true;
    }
    match s.split(':').collect::<Vec<_>>().as_slice() {
        [hh] => is_digits(hh, 2),
        [hh, mm] => is_digits(hh, 2) && is_digits(mm, 2),
        [hh, mm, ss] => {
            is_digits(hh, 2)
                && is_digits(mm, 2)
                && match ss.split_once('.') {
                    Some((sec, frac)) => {
                        is_digits(sec, 2) && !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit())
                    }
                    None => is_digits(ss, 2),
                }
        }
        _ => false,
    }
}

/// `YYYY-MM-DDThh:mm:ss.fff(Z|+hh:mm|-hh:mm)?`, with everything after the
/// date part optional.
pub fn is_valid_datetime(text: &str) -> bool {
    match text.split_once('T') {
        Some((date_part, rest)) => is_valid_date(date_part) && is_valid_time_of_day(rest),
        None => false,
    }
}

/// `Thh:mm:ss.fff`, with everything after the hour optional.
pub fn is_valid_time(text: &str) -> bool {
    match text.strip_prefix('T') {
        Some(rest) => is_valid_time_of_day(rest),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_by_shape() {
        let mut c = Cursor::new("2024-01-01");
        assert_eq!(scan_date_time(&mut c, Position::START).kind, TokenKind::Date);

        let mut c = Cursor::new("2024-01-01T10:00:00Z");
        assert_eq!(
            scan_date_time(&mut c, Position::START).kind,
            TokenKind::DateTime
        );

        let mut c = Cursor::new("T14:30");
        assert_eq!(scan_date_time(&mut c, Position::START).kind, TokenKind::Time);
    }

    #[test]
    fn validates_date_shapes() {
        assert!(is_valid_date("2024"));
        assert!(is_valid_date("2024-01"));
        assert!(is_valid_date("2024-01-15"));
        assert!(!is_valid_date("24-1-1"));
        assert!(!is_valid_date(""));
    }

    #[test]
    fn validates_datetime_shapes() {
        assert!(is_valid_datetime("2024-01-15T10:30:00.123Z"));
        assert!(is_valid_datetime("2024-01-15T10:30:00+05:00"));
        assert!(is_valid_datetime("2024-01-15T"));
        assert!(!is_valid_datetime("2024-01-15"));
        assert!(!is_valid_datetime("garbage"));
    }

    #[test]
    fn validates_time_shapes() {
        assert!(is_valid_time("T14:30:00"));
        assert!(is_valid_time("T14"));
        assert!(!is_valid_time("14:30"));
    }
}
