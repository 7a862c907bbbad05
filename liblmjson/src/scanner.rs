//! Character scanner.
//!
//! The scanner owns the cursor over the source text. It tracks the current
//! character (`None` once the input is exhausted), offers look-ahead, and
//! skips insignificant text:
//! - whitespace and control characters (anything up to U+0020)
//! - `#` and `//` line comments
//! - `/* ... */` block comments (not nested; an unclosed one runs to the end)

use crate::error::{ErrorKind, ParseContext, ParseError, Result};

/// Cursor state for a single parse.
pub struct Scanner<'a> {
    chars: Vec<char>,
    pos: usize,
    ch: Option<char>,
    ctx: &'a ParseContext,
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned on the first character of `source`.
    pub fn new(source: &str, ctx: &'a ParseContext) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let ch = chars.first().copied();
        Self {
            chars,
            pos: 0,
            ch,
            ctx,
        }
    }

    /// The current character, or `None` at end of input.
    pub fn current(&self) -> Option<char> {
        self.ch
    }

    /// Consume the current character and return the next one.
    pub fn advance(&mut self) -> Option<char> {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
        self.ch = self.chars.get(self.pos).copied();
        self.ch
    }

    /// Consume the current character, which must be `expected`.
    pub fn expect(&mut self, expected: char) -> Result<Option<char>> {
        if self.ch != Some(expected) {
            return Err(self.error(ErrorKind::ExpectedCharacterMismatch {
                expected,
                found: self.ch,
            }));
        }
        Ok(self.advance())
    }

    /// The `n` characters after the current one, without consuming them.
    ///
    /// When fewer remain, a soft peek returns what is left and a hard peek
    /// fails with [`ErrorKind::PrematureEnd`].
    pub fn peek(&self, n: usize, soft: bool) -> Result<&[char]> {
        let start = (self.pos + 1).min(self.chars.len());
        let end = start + n;
        if end > self.chars.len() {
            if !soft {
                return Err(self.error(ErrorKind::PrematureEnd {
                    needed: n,
                    after: self.ch,
                }));
            }
            return Ok(&self.chars[start..]);
        }
        Ok(&self.chars[start..end])
    }

    /// The character at `offset` from the cursor, `None` when out of range.
    pub fn peek_at(&self, offset: isize) -> Option<char> {
        let idx = self.pos as isize + offset;
        if idx < 0 {
            return None;
        }
        self.chars.get(idx as usize).copied()
    }

    /// Skip whitespace and comments until significant text or end of input.
    pub fn skip_insignificant(&mut self) {
        while self.ch.is_some() {
            while matches!(self.ch, Some(c) if c <= ' ') {
                self.advance();
            }
            match self.ch {
                Some('#') => self.skip_line(),
                Some('/') if matches!(self.peek(1, true), Ok(['/'])) => self.skip_line(),
                Some('/') if matches!(self.peek(1, true), Ok(['*'])) => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    /// Skip up to (not past) the next newline.
    fn skip_line(&mut self) {
        while matches!(self.ch, Some(c) if c != '\n') {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance();
        self.advance();
        while let Some(c) = self.ch {
            if c == '*' && self.peek_at(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    /// Character offset of the current character.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Build a diagnostic for a failure at the current offset.
    pub fn error(&self, kind: ErrorKind) -> ParseError {
        self.error_at(kind, self.pos)
    }

    /// Build a diagnostic for a failure at an earlier `offset`.
    pub fn error_at(&self, kind: ErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, &self.chars, offset, self.ctx)
    }
}
