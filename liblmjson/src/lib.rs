//! LMJSON parser implementation.
//!
//! LMJSON is JSON with a few affordances for hand-written documents:
//! `#`, `//` and `/* */` comments, trailing commas in arrays and objects,
//! and backtick-delimited multiline strings. Duplicate object keys are an
//! error rather than an overwrite.
//!
//! # Parsing Pipeline
//!
//! 1. **Scanner**: Walks the source one character at a time, with look-ahead
//!    and skipping of whitespace and comments.
//!
//! 2. **Value Parser**: Recursive descent over the scanner into a [`Value`].
//!
//! 3. **Reviver** (optional): A bottom-up pass letting a callback replace or
//!    remove members of the parsed tree.
//!
//! Any grammar violation stops the parse with a [`ParseError`] that carries
//! the line, column and a pointer snippet of the failure. Arrays and objects
//! may nest at most [`MAX_DEPTH`] levels deep.

mod error;
mod parser;
mod reviver;
mod scanner;
mod value;

pub use error::{ErrorKind, ParseError, Result};
pub use parser::MAX_DEPTH;
pub use reviver::{revive, Key, Revived};
pub use value::{Map, Value};

use error::ParseContext;
use scanner::Scanner;

/// Parse an LMJSON document from a string.
///
/// # Example
///
/// ```
/// use liblmjson::parse;
///
/// let value = parse("{\"a\": [1, 2,], // note\n}").unwrap();
/// assert_eq!(value.get("a").unwrap().as_array().unwrap().len(), 2);
/// ```
pub fn parse(input: &str) -> Result<Value> {
    parse_with_filename(input, None)
}

/// Parse an LMJSON document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Value> {
    let ctx = ParseContext::new(filename);
    tracing::trace!(
        filename = filename.unwrap_or("<input>"),
        len = input.len(),
        "parsing lmjson document"
    );
    let mut scanner = Scanner::new(input, &ctx);
    parser::parse_root(&mut scanner)
}

/// Parse an LMJSON document, then pass every member through `reviver`.
///
/// Returns `Ok(None)` if the reviver removes the root value.
///
/// # Example
///
/// ```
/// use liblmjson::{parse_with_reviver, Key, Revived};
///
/// let value = parse_with_reviver("{\"a\": 1, \"b\": 2}", |key, value| {
///     if key == Key::Name("b") {
///         Revived::Remove
///     } else {
///         Revived::Keep(value)
///     }
/// })
/// .unwrap()
/// .unwrap();
/// assert!(value.get("b").is_none());
/// ```
pub fn parse_with_reviver<F>(input: &str, reviver: F) -> Result<Option<Value>>
where
    F: FnMut(Key<'_>, Value) -> Revived,
{
    let value = parse(input)?;
    Ok(revive(value, reviver))
}
