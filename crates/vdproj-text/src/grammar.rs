//! Line grammar of the vdproj text format.
//!
//! Every significant line is one of:
//!
//! ```text
//! "<name>"
//! "<name>" = "<digits>:<value>"
//! "<value type>:<value>"
//! {
//! }
//! ```
//!
//! Names and values are quoted strings where `\"` and `\\` are the only
//! escapes (`([^"\\]|\\.)*`). [`classify`] only recognizes the shape of a
//! line; captured text is returned still escaped.

use vdproj_common::memchr::memchr2;
use vdproj_common::{Error, Result};

/// A classified vdproj line. Captures borrow from the line and are still escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `"name"` or `"name" = "type:value"`.
    Element {
        name: &'a str,
        value: Option<(&'a str, &'a str)>,
    },
    /// `"type:value"` without a key.
    Keyless { value_type: &'a str, value: &'a str },
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// Nothing but whitespace.
    Empty,
}

/// Classify a single line. Surrounding whitespace is ignored.
///
/// `number` is the 1-based line number used in error messages.
pub fn classify(number: usize, line: &str) -> Result<Line<'_>> {
    let line = line.trim();

    // Quoted forms take priority over braces.
    if line.starts_with('"') {
        return classify_element(number, line);
    }

    match line {
        "" => Ok(Line::Empty),
        "{" => Ok(Line::OpenBrace),
        "}" => Ok(Line::CloseBrace),
        _ => Err(Error::malformed_line(
            number,
            format!("expected a quoted element, `{{` or `}}`, got {:?}", line),
        )),
    }
}

fn classify_element(number: usize, line: &str) -> Result<Line<'_>> {
    let (name, rest) = split_quoted(line)
        .ok_or_else(|| Error::malformed_line(number, "unterminated quoted name"))?;

    if rest.is_empty() {
        if let Some((value_type, value)) = split_keyless(name) {
            return Ok(Line::Keyless { value_type, value });
        }
        return Ok(Line::Element { name, value: None });
    }

    let assigned = rest
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(|| Error::malformed_line(number, format!("unexpected {:?} after name", rest)))?
        .trim_start();

    let (content, tail) = split_quoted(assigned)
        .ok_or_else(|| Error::malformed_line(number, "expected a quoted value after `=`"))?;

    if !tail.is_empty() {
        return Err(Error::malformed_line(
            number,
            format!("unexpected {:?} after value", tail),
        ));
    }

    let (value_type, value) = split_typed_value(content).ok_or_else(|| {
        Error::malformed_line(
            number,
            format!("value {:?} does not start with a numeric type tag", content),
        )
    })?;

    Ok(Line::Element {
        name,
        value: Some((value_type, value)),
    })
}

/// Split a leading quoted string off `text`.
///
/// Returns the escaped content between the quotes and whatever follows the
/// closing quote, or `None` if `text` does not start with a complete quoted string.
fn split_quoted(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'"') {
        return None;
    }

    let mut pos = 1;
    while pos < bytes.len() {
        let at = pos + memchr2(b'\\', b'"', &bytes[pos..])?;
        if bytes[at] == b'"' {
            return Some((&text[1..at], &text[at + 1..]));
        }
        // A backslash escapes whatever byte follows; continuation bytes are never `"` or `\`.
        pos = at + 2;
    }

    None
}

/// `<digits>:<value>` as used on the right-hand side of `=`.
fn split_typed_value(content: &str) -> Option<(&str, &str)> {
    let (value_type, value) = content.split_once(':')?;
    if value_type.is_empty() || !value_type.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((value_type, value))
}

/// Keyless entries are name-only lines with a colon and no quote characters at all.
fn split_keyless(name: &str) -> Option<(&str, &str)> {
    if name.contains('"') {
        return None;
    }
    name.split_once(':')
}
