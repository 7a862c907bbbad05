//! Error types and diagnostics for LMJSON parsing.
//!
//! Every grammar violation is reported through [`ParseError::new`], which
//! resolves the failing offset to a line and column and renders a pointer
//! snippet of the offending source line.

use thiserror::Error;

/// Result type for LMJSON parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }
}

/// What went wrong, independent of where.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A character that cannot start any value.
    #[error("Unexpected '{}'", show(.0))]
    UnexpectedCharacter(Option<char>),

    /// A required punctuation or literal character was not found.
    #[error("Expected '{expected}' instead of '{}'", show(.found))]
    ExpectedCharacterMismatch {
        expected: char,
        found: Option<char>,
    },

    /// A hard look-ahead ran past the end of input.
    #[error("Ended prematurely: expected at least {needed} characters after \"{}\"", show(.after))]
    PrematureEnd { needed: usize, after: Option<char> },

    /// An object key appeared twice.
    #[error("Duplicate key '{0}'")]
    DuplicateKey(String),

    /// A number literal that does not convert to a finite float. Carries the
    /// literal text.
    #[error("Number is Infinity/NaN")]
    NumericOverflow(String),

    /// A quoted string that is unterminated or holds an invalid escape.
    #[error("Bad string")]
    UnterminatedString,

    /// A backtick string without its closing backtick.
    #[error("Bad multiline string")]
    UnterminatedMultilineString,

    /// An array still open at end of input.
    #[error("Bad array")]
    UnterminatedArray,

    /// An object still open at end of input.
    #[error("Bad object")]
    UnterminatedObject,

    /// Significant text after the top-level value.
    #[error("Syntax error")]
    TrailingContent,

    /// Arrays and objects nested deeper than the parser allows.
    #[error("Nesting too deep")]
    NestingTooDeep,
}

fn show(ch: &Option<char>) -> String {
    ch.map(String::from).unwrap_or_default()
}

fn file_suffix(filename: &Option<String>) -> String {
    match filename {
        Some(name) => format!(" of <{}>", name),
        None => String::new(),
    }
}

/// A fatal parse diagnostic.
///
/// Line and column are 1-based. The snippet is two lines: the source line
/// holding the failure, then a caret under the failing column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {line}:{column}{}", file_suffix(.filename))]
pub struct ParseError {
    kind: ErrorKind,
    offset: usize,
    line: usize,
    column: usize,
    snippet: String,
    filename: Option<String>,
}

impl ParseError {
    /// Create a diagnostic for a failure at `offset` (a character index into
    /// `source`, clamped to its length).
    pub(crate) fn new(kind: ErrorKind, source: &[char], offset: usize, ctx: &ParseContext) -> Self {
        let offset = offset.min(source.len());
        let (line, line_start) = locate(source, offset);
        let column = offset - line_start + 1;
        let snippet = render_snippet(source, line_start, column);
        tracing::debug!(kind = %kind, line, column, "lmjson parse failed");
        Self {
            kind,
            offset,
            line,
            column,
            snippet,
            filename: ctx.filename.clone(),
        }
    }

    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Zero-based character offset of the failure.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line of the failure.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the failure.
    pub fn column(&self) -> usize {
        self.column
    }

    /// The offending source line followed by a caret line.
    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    /// The filename given to the parse, if any.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Full report: the message line, then the indented snippet.
    pub fn render(&self) -> String {
        let mut out = self.to_string();
        for line in self.snippet.lines() {
            out.push_str("\n    ");
            out.push_str(line);
        }
        out
    }
}

/// Returns the 1-based line holding `offset` and the offset where that line
/// starts.
fn locate(source: &[char], offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut line_start = 0;
    for (i, &c) in source[..offset].iter().enumerate() {
        if c == '\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    (line, line_start)
}

fn render_snippet(source: &[char], line_start: usize, column: usize) -> String {
    let mut text: String = source[line_start..]
        .iter()
        .take_while(|&&c| c != '\n')
        .collect();
    if text.ends_with('\r') {
        text.pop();
    }
    format!("{}\n{}^", text, " ".repeat(column - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_locate() {
        let src = chars("ab\ncd\n\nef");
        assert_eq!(locate(&src, 0), (1, 0));
        assert_eq!(locate(&src, 2), (1, 0));
        assert_eq!(locate(&src, 3), (2, 3));
        assert_eq!(locate(&src, 4), (2, 3));
        assert_eq!(locate(&src, 6), (3, 6));
        assert_eq!(locate(&src, 8), (4, 7));
    }

    #[test]
    fn test_line_and_column() {
        let src = chars("{\n  \"a\": tru\n}");
        let ctx = ParseContext::default();
        // Offset of the closing '\n' after "tru".
        let err = ParseError::new(ErrorKind::TrailingContent, &src, 12, &ctx);
        assert_eq!(err.line(), 2);
        assert_eq!(err.column(), 11);
        assert_eq!(err.snippet(), "  \"a\": tru\n          ^");
    }

    #[test]
    fn test_offset_clamped_to_end() {
        let src = chars("[1,");
        let ctx = ParseContext::default();
        let err = ParseError::new(ErrorKind::UnterminatedArray, &src, 99, &ctx);
        assert_eq!(err.offset(), 3);
        assert_eq!((err.line(), err.column()), (1, 4));
        assert_eq!(err.snippet(), "[1,\n   ^");
    }

    #[test]
    fn test_carriage_return_trimmed_from_snippet() {
        let src = chars("1 2\r\n");
        let ctx = ParseContext::default();
        let err = ParseError::new(ErrorKind::TrailingContent, &src, 2, &ctx);
        assert_eq!(err.snippet(), "1 2\n  ^");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ErrorKind::UnexpectedCharacter(Some('x')).to_string(),
            "Unexpected 'x'"
        );
        assert_eq!(ErrorKind::UnexpectedCharacter(None).to_string(), "Unexpected ''");
        assert_eq!(
            ErrorKind::ExpectedCharacterMismatch {
                expected: ':',
                found: Some('1')
            }
            .to_string(),
            "Expected ':' instead of '1'"
        );
        assert_eq!(
            ErrorKind::PrematureEnd {
                needed: 3,
                after: Some('a')
            }
            .to_string(),
            "Ended prematurely: expected at least 3 characters after \"a\""
        );
        assert_eq!(
            ErrorKind::DuplicateKey("a".into()).to_string(),
            "Duplicate key 'a'"
        );
        assert_eq!(
            ErrorKind::NumericOverflow("1e999".into()).to_string(),
            "Number is Infinity/NaN"
        );
        assert_eq!(ErrorKind::NestingTooDeep.to_string(), "Nesting too deep");
    }

    #[test]
    fn test_display_and_render() {
        let src = chars("[1 2]");
        let ctx = ParseContext::new(Some("doc.lmjson"));
        let err = ParseError::new(
            ErrorKind::ExpectedCharacterMismatch {
                expected: ',',
                found: Some('2'),
            },
            &src,
            3,
            &ctx,
        );
        assert_eq!(
            err.to_string(),
            "Expected ',' instead of '2' at line 1:4 of <doc.lmjson>"
        );
        assert_eq!(err.filename(), Some("doc.lmjson"));
        assert_eq!(
            err.render(),
            "Expected ',' instead of '2' at line 1:4 of <doc.lmjson>\n    [1 2]\n       ^"
        );
    }
}
