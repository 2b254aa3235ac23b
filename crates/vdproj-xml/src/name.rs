//! Reversible mapping between vdproj keys and XML local names.
//!
//! vdproj keys are arbitrary text (`{3C67513D-01DD-4637-8A68-80971EB9504F}`,
//! `We"ird`, names with spaces or leading digits) while XML element names must
//! be NCNames. Every character that may not appear at its position is written
//! as `_xHHHH_` (or `_xHHHHHHHH_` above U+FFFF), the scheme used by .NET's
//! `XmlConvert.EncodeLocalName`. An underscore followed by `x` and four hex
//! digits is escaped itself, even without the closing `_`, since the next
//! character may be written as an escape and supply one.
//!
//! Two names need special treatment: the empty key, which has no XML form and
//! is written as [`EMPTY_NAME`], and the key `NoKeyEntry`, which would collide
//! with the tag used for keyless entries and gets its first letter escaped.

use std::borrow::Cow;

use vdproj_common::{Error, Result, NO_KEY_ENTRY};

/// XML name standing for the empty key. Names a code point outside Unicode,
/// so no real character ever encodes to it.
pub const EMPTY_NAME: &str = "_x00110000_";

/// Encode a raw vdproj key as an XML local name.
///
/// # Example
///
/// ```
/// use vdproj_xml::name::{decode_name, encode_name};
///
/// assert_eq!(encode_name("ProductName"), "ProductName");
/// assert_eq!(encode_name("{EDC2488A}"), "_x007B_EDC2488A_x007D_");
/// assert_eq!(decode_name("_x007B_EDC2488A_x007D_").unwrap(), "{EDC2488A}");
/// ```
pub fn encode_name(raw: &str) -> Cow<'_, str> {
    if raw.is_empty() {
        return Cow::Borrowed(EMPTY_NAME);
    }
    if raw == NO_KEY_ENTRY {
        return Cow::Owned(format!("_x{:04X}_{}", 'N' as u32, &NO_KEY_ENTRY[1..]));
    }
    if raw
        .char_indices()
        .all(|(i, c)| is_allowed(i, c) && !(c == '_' && looks_like_escape(&raw[i..])))
    {
        return Cow::Borrowed(raw);
    }

    let mut encoded = String::with_capacity(raw.len() + 16);
    for (i, c) in raw.char_indices() {
        if c == '_' && looks_like_escape(&raw[i..]) {
            encoded.push_str("_x005F_");
        } else if is_allowed(i, c) {
            encoded.push(c);
        } else {
            push_escape(&mut encoded, c);
        }
    }

    Cow::Owned(encoded)
}

/// Decode an XML local name produced by [`encode_name`] back into the raw key.
///
/// Fails with [`Error::InvalidXmlName`] if an escape sequence does not name a
/// Unicode scalar value.
pub fn decode_name(name: &str) -> Result<Cow<'_, str>> {
    if name == EMPTY_NAME {
        return Ok(Cow::Borrowed(""));
    }
    if !name.contains("_x") {
        return Ok(Cow::Borrowed(name));
    }

    let mut decoded = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(at) = rest.find('_') {
        decoded.push_str(&rest[..at]);
        rest = &rest[at..];

        match parse_escape(rest) {
            Some((code, len)) => {
                let c = char::from_u32(code).ok_or_else(|| Error::InvalidXmlName {
                    name: name.to_string(),
                    reason: format!("escape {} is not a Unicode scalar value", &rest[..len]),
                })?;
                decoded.push(c);
                rest = &rest[len..];
            }
            None => {
                decoded.push('_');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);

    Ok(Cow::Owned(decoded))
}

/// Parse `_xHHHH_` or `_xHHHHHHHH_` at the start of `text`.
///
/// Returns the code point and the length of the sequence.
fn parse_escape(text: &str) -> Option<(u32, usize)> {
    let digits = text.strip_prefix("_x")?;
    [8usize, 4].into_iter().find_map(|width| {
        let hex = digits.get(..width)?;
        if digits.as_bytes().get(width) != Some(&b'_') || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let code = u32::from_str_radix(hex, 16).ok()?;
        Some((code, width + 3))
    })
}

/// `_x` followed by at least four hex digits.
fn looks_like_escape(text: &str) -> bool {
    text.strip_prefix("_x")
        .and_then(|digits| digits.get(..4))
        .is_some_and(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn push_escape(out: &mut String, c: char) {
    let code = c as u32;
    let width = if code <= 0xFFFF { 4 } else { 8 };
    out.push_str(&format!("_x{:0width$X}_", code, width = width));
}

#[inline]
fn is_allowed(index: usize, c: char) -> bool {
    if index == 0 {
        is_name_start_char(c)
    } else {
        is_name_char(c)
    }
}

/// NCName start character (XML 1.0 `NameStartChar` without `:`).
fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

/// NCName character (XML 1.0 `NameChar` without `:`).
fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}
