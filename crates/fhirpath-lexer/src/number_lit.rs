//! Number and quantity scanning (spec §4.1 Number/Long number/Quantity literals).

use crate::classes::{is_ident_continue, is_ident_start};
use crate::cursor::Cursor;
use crate::keywords::is_calendar_unit;
use crate::lex_error::LexErrorKind;
use fhirpath_ir::{Position, Token, TokenKind};

/// Scans a `NUMBER`, `LONG_NUMBER`, or `QUANTITY` token starting at a digit.
/// Assumes the cursor is positioned on the first digit.
pub(crate) fn scan_number(cursor: &mut Cursor, start_pos: Position) -> Result<Token, LexErrorKind> {
    let start = cursor.pos();
    cursor.eat_while(|b| b.is_ascii_digit());

    let mut is_decimal = false;
    if cursor.current() == b'.' && cursor.peek_at(1).is_ascii_digit() {
        cursor.advance();
        cursor.eat_while(|b| b.is_ascii_digit());
        is_decimal = true;
    }

    let number_text = cursor.slice_from(start).to_string();
    let mut kind = TokenKind::Number;

    if !is_decimal && matches!(cursor.current(), b'L' | b'l') && !is_ident_continue(cursor.peek_at(1)) {
        cursor.advance();
        kind = TokenKind::LongNumber;
    }

    if kind == TokenKind::Number {
        if let Some(quantity) = try_merge_quantity(cursor, &number_text, start_pos) {
            return Ok(quantity);
        }
    }

    // A digit run glued directly to identifier characters, with no
    // whitespace and no recognized suffix (`L` or a calendar unit, both
    // already handled above), is a tokenization error (spec §4.1, e.g.
    // `123Labs`).
    if is_ident_start(cursor.current()) {
        cursor.eat_while(is_ident_continue);
        return Err(LexErrorKind::InvalidNumberSuffix);
    }

    Ok(Token::new(kind, number_text, start_pos))
}

/// Looks ahead (via a cheap `Cursor` copy) for a quantity unit following the
/// number — zero or more spaces, then a quoted unit or a calendar-duration
/// word (spec §4.1: "after optional spaces"). Commits the main cursor only
/// if a unit is actually found; a number followed by an unrelated word is
/// left untouched so the word tokenizes on its own next call.
fn try_merge_quantity(cursor: &mut Cursor, number_text: &str, start_pos: Position) -> Option<Token> {
    let mut lookahead = *cursor;
    while lookahead.current() == b' ' {
        lookahead.advance();
    }

    if lookahead.current() == b'\'' {
        let unit_start = lookahead.pos();
        lookahead.advance();
        loop {
            if lookahead.is_eof() {
                return None;
            }
            if lookahead.current() == b'\'' {
                lookahead.advance();
                break;
            }
            lookahead.advance();
        }
        let unit_text = lookahead.slice_from(unit_start);
        let value = format!("{number_text} {unit_text}");
        *cursor = lookahead;
        return Some(Token::new(TokenKind::Quantity, value, start_pos));
    }

    if is_ident_start(lookahead.current()) {
        let word_start = lookahead.pos();
        lookahead.eat_while(is_ident_continue);
        let word = lookahead.slice_from(word_start);
        if is_calendar_unit(word) {
            let value = format!("{number_text} {word}");
            *cursor = lookahead;
            return Some(Token::new(TokenKind::Quantity, value, start_pos));
        }
    }

    None
}
