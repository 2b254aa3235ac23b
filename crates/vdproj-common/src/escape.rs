//! Backslash escaping for vdproj quoted strings.
//!
//! Only two characters are escaped inside a vdproj string: `\` becomes `\\`
//! and `"` becomes `\"`. Everything else, line breaks included, is written
//! verbatim, so values containing line breaks cannot be represented in the
//! line-oriented format.
//!
//! [`unescape`] is a single left-to-right pass: `\\` and `\"` collapse to one
//! character, while a backslash before any other character (or at the very
//! end) is kept as is. This makes it total and the exact inverse of
//! [`escape`] for every input.

use std::borrow::Cow;

/// Escape `value` for use between the quotes of a vdproj string.
///
/// # Example
///
/// ```
/// use vdproj_common::escape::escape;
///
/// assert_eq!(escape(r#"C:\Temp\"x""#), r#"C:\\Temp\\\"x\""#);
/// assert_eq!(escape("plain"), "plain");
/// ```
pub fn escape(value: &str) -> Cow<'_, str> {
    let Some(first) = memchr::memchr2(b'\\', b'"', value.as_bytes()) else {
        return Cow::Borrowed(value);
    };

    let mut escaped = String::with_capacity(value.len() + 8);
    escaped.push_str(&value[..first]);
    for c in value[first..].chars() {
        if c == '\\' || c == '"' {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    Cow::Owned(escaped)
}

/// Reverse [`escape`].
pub fn unescape(value: &str) -> Cow<'_, str> {
    let Some(first) = memchr::memchr(b'\\', value.as_bytes()) else {
        return Cow::Borrowed(value);
    };

    let mut unescaped = String::with_capacity(value.len());
    unescaped.push_str(&value[..first]);

    let mut chars = value[first..].chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }

        match chars.peek() {
            Some(&next @ ('\\' | '"')) => {
                unescaped.push(next);
                chars.next();
            }
            _ => unescaped.push('\\'),
        }
    }

    Cow::Owned(unescaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_borrows_when_clean() {
        assert!(matches!(escape("ProductName"), Cow::Borrowed(_)));
        assert!(matches!(unescape("ProductName"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape(r#"We"ird"#), r#"We\"ird"#);
        assert_eq!(escape(r"C:\Program Files\"), r"C:\\Program Files\\");
        assert_eq!(escape(r#"\""#), r#"\\\""#);
    }

    #[test]
    fn test_escape_leaves_other_characters() {
        assert_eq!(escape("a\tb\r\nc"), "a\tb\r\nc");
        assert_eq!(escape("{EDC2488A}:x"), "{EDC2488A}:x");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"We\"ird"#), r#"We"ird"#);
        assert_eq!(unescape(r"C:\\Temp\\"), r"C:\Temp\");
        assert_eq!(unescape(r#"\\\""#), r#"\""#);
    }

    #[test]
    fn test_unescape_keeps_unknown_sequences() {
        assert_eq!(unescape(r"a\nb"), r"a\nb");
        assert_eq!(unescape(r"trailing\"), r"trailing\");
    }

    #[test]
    fn test_roundtrip_adversarial() {
        for value in [
            r"\",
            r"\\",
            r#"\""#,
            r#""\"#,
            r#"odd\\\"#,
            r#"\\"\\"\"#,
            "ünïcödé \\ \"",
        ] {
            assert_eq!(unescape(&escape(value)), value, "value {:?}", value);
        }
    }
}
