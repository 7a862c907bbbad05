//! Value parser.
//!
//! A recursive-descent grammar over the [`Scanner`]:
//! - Compounds: objects and arrays, both tolerating a trailing comma
//! - Strings: double-quoted with JSON escapes, and backtick multiline literals
//! - Scalars: numbers, `true`, `false`, `null`
//!
//! Every production skips insignificant text before it dispatches, and the
//! first violation aborts the whole parse.

use crate::error::{ErrorKind, Result};
use crate::scanner::Scanner;
use crate::value::{Map, Value};

/// How many arrays and objects may enclose one another.
pub const MAX_DEPTH: usize = 512;

/// Parse a complete document: one value and nothing significant after it.
pub fn parse_root(s: &mut Scanner<'_>) -> Result<Value> {
    let value = parse_value(s, 0)?;
    s.skip_insignificant();
    if s.current().is_some() {
        return Err(s.error(ErrorKind::TrailingContent));
    }
    Ok(value)
}

/// Parse a single value enclosed by `depth` arrays and objects.
fn parse_value(s: &mut Scanner<'_>, depth: usize) -> Result<Value> {
    s.skip_insignificant();
    match s.current() {
        Some('{') => {
            let depth = nested(s, depth)?;
            parse_object(s, depth)
        }
        Some('[') => {
            let depth = nested(s, depth)?;
            parse_array(s, depth)
        }
        Some('"') => parse_string(s).map(Value::String),
        Some('`') => parse_multiline_string(s).map(Value::String),
        Some('-' | '0'..='9') => parse_number(s),
        _ => parse_word(s),
    }
}

// ============================================================================
// Compounds
// ============================================================================

/// Depth of a container opening at the cursor; fails on the opener past
/// [`MAX_DEPTH`].
fn nested(s: &Scanner<'_>, depth: usize) -> Result<usize> {
    if depth >= MAX_DEPTH {
        return Err(s.error(ErrorKind::NestingTooDeep));
    }
    Ok(depth + 1)
}

fn parse_object(s: &mut Scanner<'_>, depth: usize) -> Result<Value> {
    let mut members = Map::new();

    s.expect('{')?;
    s.skip_insignificant();
    while s.current().is_some() {
        // Also reached after a trailing comma.
        if s.current() == Some('}') {
            s.advance();
            return Ok(Value::Object(members));
        }
        let key = parse_string(s)?;
        s.skip_insignificant();
        s.expect(':')?;
        if members.contains_key(&key) {
            return Err(s.error(ErrorKind::DuplicateKey(key)));
        }
        let value = parse_value(s, depth)?;
        members.insert(key, value);
        s.skip_insignificant();
        if s.current() == Some('}') {
            s.advance();
            return Ok(Value::Object(members));
        }
        s.expect(',')?;
        s.skip_insignificant();
    }
    Err(s.error(ErrorKind::UnterminatedObject))
}

fn parse_array(s: &mut Scanner<'_>, depth: usize) -> Result<Value> {
    let mut items = Vec::new();

    s.expect('[')?;
    s.skip_insignificant();
    while s.current().is_some() {
        if s.current() == Some(']') {
            s.advance();
            return Ok(Value::Array(items));
        }
        items.push(parse_value(s, depth)?);
        s.skip_insignificant();
        if s.current() == Some(']') {
            s.advance();
            return Ok(Value::Array(items));
        }
        s.expect(',')?;
        s.skip_insignificant();
    }
    Err(s.error(ErrorKind::UnterminatedArray))
}

// ============================================================================
// Strings
// ============================================================================

/// Parse a double-quoted string.
///
/// Content is collected as UTF-16 code units so that a pair of `\uXXXX`
/// escapes can spell a supplementary character. Each unit remembers the
/// offset it came from, so an unpaired surrogate is reported at its escape.
fn parse_string(s: &mut Scanner<'_>) -> Result<String> {
    if s.current() != Some('"') {
        return Err(s.error(ErrorKind::UnterminatedString));
    }

    let mut units: Vec<u16> = Vec::new();
    let mut origins: Vec<usize> = Vec::new();
    let mut buf = [0u16; 2];
    while let Some(ch) = s.advance() {
        let origin = s.offset();
        match ch {
            '"' => {
                let text = decode_units(&units)
                    .map_err(|i| s.error_at(ErrorKind::UnterminatedString, origins[i]))?;
                s.advance();
                return Ok(text);
            }
            '\\' => {
                let unit = match s.advance() {
                    Some('u') => parse_code_unit(s)?,
                    Some(esc) => match unescape(esc) {
                        Some(c) => c as u16,
                        None => return Err(s.error(ErrorKind::UnterminatedString)),
                    },
                    None => break,
                };
                units.push(unit);
                origins.push(origin);
            }
            _ => {
                let encoded = ch.encode_utf16(&mut buf);
                origins.extend(std::iter::repeat(origin).take(encoded.len()));
                units.extend_from_slice(encoded);
            }
        }
    }
    Err(s.error(ErrorKind::UnterminatedString))
}

/// Decode UTF-16 units, or return the index of the first unpaired surrogate.
fn decode_units(units: &[u16]) -> std::result::Result<String, usize> {
    let mut text = String::with_capacity(units.len());
    let mut at = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) => {
                text.push(c);
                at += c.len_utf16();
            }
            Err(_) => return Err(at),
        }
    }
    Ok(text)
}

/// Map a single-character escape to the character it stands for.
fn unescape(esc: char) -> Option<char> {
    match esc {
        '"' => Some('"'),
        '\\' => Some('\\'),
        '/' => Some('/'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

/// Decode the four hex digits of a `\u` escape into one UTF-16 code unit.
fn parse_code_unit(s: &mut Scanner<'_>) -> Result<u16> {
    let mut unit: u16 = 0;
    for _ in 0..4 {
        let digit = s
            .advance()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| s.error(ErrorKind::UnterminatedString))?;
        unit = unit * 16 + digit as u16;
    }
    Ok(unit)
}

/// Parse a backtick-delimited multiline string.
///
/// The strip width is the number of characters that precede the opening
/// backtick on its own line. Each content line loses up to that many leading
/// whitespace characters, carriage returns are dropped, and a single newline
/// right before the closing backtick is removed.
fn parse_multiline_string(s: &mut Scanner<'_>) -> Result<String> {
    s.expect('`')?;
    let indent = opening_indent(s);

    // Text on the opening line starts after any inline whitespace.
    while matches!(s.current(), Some(c) if is_inline_space(c)) {
        s.advance();
    }
    if s.current() == Some('\n') {
        s.advance();
        skip_indent(s, indent);
    }

    let mut text = String::new();
    loop {
        match s.current() {
            None => return Err(s.error(ErrorKind::UnterminatedMultilineString)),
            Some('`') => {
                s.advance();
                if text.ends_with('\n') {
                    text.pop();
                }
                return Ok(text);
            }
            Some('\n') => {
                text.push('\n');
                s.advance();
                skip_indent(s, indent);
            }
            Some('\r') => {
                s.advance();
            }
            Some(c) => {
                text.push(c);
                s.advance();
            }
        }
    }
}

/// Count the characters between the previous newline (or start of text) and
/// the opening backtick. The cursor sits just past the backtick.
fn opening_indent(s: &Scanner<'_>) -> usize {
    let mut indent = 0;
    while let Some(c) = s.peek_at(-2 - indent as isize) {
        if c == '\n' {
            break;
        }
        indent += 1;
    }
    indent
}

fn skip_indent(s: &mut Scanner<'_>, indent: usize) {
    let mut skip = indent;
    while skip > 0 && matches!(s.current(), Some(c) if is_inline_space(c)) {
        s.advance();
        skip -= 1;
    }
}

fn is_inline_space(c: char) -> bool {
    c <= ' ' && c != '\n'
}

// ============================================================================
// Scalars
// ============================================================================

/// Parse a number literal.
///
/// The literal text is collected leniently (`-`, digits, fraction, exponent)
/// and then converted; anything that does not yield a finite float fails.
fn parse_number(s: &mut Scanner<'_>) -> Result<Value> {
    let mut literal = String::new();

    if s.current() == Some('-') {
        literal.push('-');
        s.advance();
    }
    push_digits(s, &mut literal);
    if s.current() == Some('.') {
        literal.push('.');
        s.advance();
        push_digits(s, &mut literal);
    }
    if let Some(e @ ('e' | 'E')) = s.current() {
        literal.push(e);
        s.advance();
        if let Some(sign @ ('-' | '+')) = s.current() {
            literal.push(sign);
            s.advance();
        }
        push_digits(s, &mut literal);
    }

    match literal.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Value::Number(n)),
        _ => Err(s.error(ErrorKind::NumericOverflow(literal))),
    }
}

fn push_digits(s: &mut Scanner<'_>, literal: &mut String) {
    while let Some(c @ '0'..='9') = s.current() {
        literal.push(c);
        s.advance();
    }
}

/// Parse `true`, `false`, or `null`.
fn parse_word(s: &mut Scanner<'_>) -> Result<Value> {
    match s.current() {
        Some('t') => {
            expect_word(s, "true")?;
            Ok(Value::Bool(true))
        }
        Some('f') => {
            expect_word(s, "false")?;
            Ok(Value::Bool(false))
        }
        Some('n') => {
            expect_word(s, "null")?;
            Ok(Value::Null)
        }
        other => Err(s.error(ErrorKind::UnexpectedCharacter(other))),
    }
}

fn expect_word(s: &mut Scanner<'_>, word: &str) -> Result<()> {
    for c in word.chars() {
        s.expect(c)?;
    }
    Ok(())
}
