//! A safe byte cursor over the source text.
//!
//! Grounded in the teacher's `ori_lexer_core::cursor::Cursor` (peek/peek2/
//! advance/eat_while/slice), but without the sentinel-byte trick or the
//! `unsafe { from_utf8_unchecked }` slicing it uses for speed — this crate
//! denies `unsafe_code`, and FHIRPath expressions are short enough that the
//! bounds-checked byte access here costs nothing that matters.
//!
//! `column` is a byte count from the start of the current line, not a
//! Unicode grapheme count. FHIRPath source outside of string/comment bodies
//! is ASCII, so this only under-counts columns for tokens that follow
//! multi-byte content earlier on the same line.

use fhirpath_ir::Position;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Cursor {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn source(&self) -> &'a str {
        self.source
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub(crate) fn current(&self) -> u8 {
        self.peek_at(0)
    }

    pub(crate) fn peek_at(&self, n: usize) -> u8 {
        self.source.as_bytes().get(self.pos + n).copied().unwrap_or(0)
    }

    pub(crate) fn position(&self) -> Position {
        Position::new(self.pos as u32, self.line, self.column)
    }

    /// Advances one byte, returning the byte consumed (0 at EOF).
    pub(crate) fn advance(&mut self) -> u8 {
        let b = self.current();
        if b != 0 {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        b
    }

    pub(crate) fn eat_while(&mut self, mut pred: impl FnMut(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.advance();
        }
    }

    /// The text from `start` (a byte offset previously read from `pos()`) up
    /// to the cursor's current position.
    pub(crate) fn slice_from(&self, start: usize) -> &'a str {
        self.source.get(start..self.pos).unwrap_or("")
    }

    /// Advances past the rest of the current line (not consuming the `\n`
    /// itself), using `memchr` to find it in one pass.
    pub(crate) fn eat_until_newline_or_eof(&mut self) {
        let rest = &self.source.as_bytes()[self.pos..];
        let skip = memchr::memchr(b'\n', rest).unwrap_or(rest.len());
        self.pos += skip;
        self.column += skip as u32;
    }

    /// Advances past `needle` (inclusive) if found before EOF; returns
    /// whether it was found. Does not cross a found needle's newlines count
    /// incorrectly: block comments containing newlines fall back to
    /// per-byte advancing via the caller when `needle` isn't found on the
    /// remaining single line, so this is only used when the content has
    /// already been confirmed not to matter for line tracking (comments),
    /// and any newlines inside are counted byte-by-byte by the caller.
    pub(crate) fn find(&self, needle: &str) -> Option<usize> {
        let rest = &self.source.as_bytes()[self.pos..];
        memchr::memmem::find(rest, needle.as_bytes())
    }
}
