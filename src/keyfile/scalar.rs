// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Scalar value grammars: bounded integers, hardware addresses, byte
//! blobs and strict base64.
//!
//! These are the leaf codecs; they know nothing about settings or the
//! warning pipeline. Callers translate their errors into warnings.

use std::fmt::Write as _;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValueError {
    #[error("empty value")]
    Empty,
    #[error("value {0} out of range [{1}, {2}]")]
    OutOfRange(String, u64, u64),
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("invalid hardware address {0:?}")]
    BadMac(String),
    #[error("hardware address {0:?} has wrong length (expected {1} bytes)")]
    BadMacLength(String, usize),
    #[error("invalid base64: {0}")]
    BadBase64(String),
}

/// Base-10 parse with inclusive bounds. Surrounding whitespace is
/// tolerated, signs and other bases are not.
pub fn parse_bounded_u64(s: &str, min: u64, max: u64) -> Result<u64, ValueError> {
    let t = s.trim();
    if t.is_empty() {
        return Err(ValueError::Empty);
    }
    let v = t
        .parse::<u64>()
        .map_err(|_| ValueError::NotANumber(t.to_string()))?;
    if v < min || v > max {
        return Err(ValueError::OutOfRange(t.to_string(), min, max));
    }
    Ok(v)
}

/// Reserved values of the cloned-MAC property that pass through without
/// being hardware addresses.
pub const CLONED_MAC_SPECIAL: &[&str] = &["preserve", "permanent", "random", "stable"];

pub fn is_special_cloned_mac(s: &str) -> bool {
    CLONED_MAC_SPECIAL.contains(&s)
}

/// Parses a hardware address from either of its accepted encodings:
/// colon-separated hex bytes, or the legacy semicolon-separated decimal
/// list. `expected_len` constrains the byte count when given.
pub fn parse_mac(s: &str, expected_len: Option<usize>) -> Result<Vec<u8>, ValueError> {
    let t = s.trim().trim_end_matches(';');
    if t.is_empty() {
        return Err(ValueError::Empty);
    }

    let bytes = if t.contains(':') {
        t.split(':')
            .map(|seg| {
                if seg.is_empty() || seg.len() > 2 {
                    return Err(ValueError::BadMac(s.to_string()));
                }
                u8::from_str_radix(seg, 16).map_err(|_| ValueError::BadMac(s.to_string()))
            })
            .collect::<Result<Vec<u8>, _>>()?
    } else {
        t.split(';')
            .map(|seg| {
                seg.trim()
                    .parse::<u8>()
                    .map_err(|_| ValueError::BadMac(s.to_string()))
            })
            .collect::<Result<Vec<u8>, _>>()?
    };

    if let Some(want) = expected_len
        && bytes.len() != want
    {
        return Err(ValueError::BadMacLength(s.to_string(), want));
    }
    Ok(bytes)
}

/// Canonical hardware-address encoding: colon-separated uppercase hex.
pub fn format_mac(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(':');
        }
        let _ = write!(out, "{b:02X}");
    }
    out
}

/// Decodes a byte blob from its string form.
///
/// A value consisting only of whitespace, digits and `;` that reparses as
/// a list of 0–255 integers is the legacy integer-list form. Anything
/// else is taken as raw string bytes; `unescape_semicolon` resolves `\;`
/// sequences, `zero_terminate` appends a trailing NUL to string-form
/// data.
pub fn blob_from_string(
    raw: &str,
    zero_terminate: bool,
    unescape_semicolon: bool,
) -> Bytes {
    if raw.is_empty() {
        return Bytes::new();
    }

    if raw
        .chars()
        .all(|c| c.is_ascii_whitespace() || c.is_ascii_digit() || c == ';')
        && let Some(bytes) = parse_legacy_byte_list(raw)
    {
        return Bytes::from(bytes);
    }

    let mut out: Vec<u8> = Vec::with_capacity(raw.len() + 1);
    if unescape_semicolon {
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' && chars.peek() == Some(&';') {
                chars.next();
                out.push(b';');
            } else {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    } else {
        out.extend_from_slice(raw.as_bytes());
    }
    if zero_terminate {
        out.push(0);
    }
    Bytes::from(out)
}

fn parse_legacy_byte_list(raw: &str) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let mut saw_digit = false;
    for piece in raw.split(';') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        saw_digit = true;
        out.push(piece.parse::<u8>().ok()?);
    }
    saw_digit.then_some(out)
}

/// Whether every byte is printable ASCII, i.e. safe to write back as a
/// plain string.
pub fn is_printable_ascii(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|b| (0x20..0x7f).contains(b))
}

/// Escapes `;` for string values that would otherwise collide with the
/// store's list separator.
pub fn escape_semicolons(s: &str) -> String {
    s.replace(';', "\\;")
}

/// Strict base64: length a multiple of four, the standard alphabet only,
/// `=` padding only at the very end. Inputs a permissive decoder would
/// accept (whitespace, missing padding, mid-stream `=`) are rejected.
pub fn decode_base64_strict(s: &str) -> Result<Vec<u8>, ValueError> {
    if s.is_empty() || s.len() % 4 != 0 {
        return Err(ValueError::BadBase64("length not a multiple of 4".into()));
    }
    let trimmed = s.trim_end_matches('=');
    if s.len() - trimmed.len() > 2 {
        return Err(ValueError::BadBase64("too much padding".into()));
    }
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
    {
        return Err(ValueError::BadBase64("character outside alphabet".into()));
    }
    STANDARD
        .decode(s)
        .map_err(|e| ValueError::BadBase64(e.to_string()))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_integer_accepts_whitespace() {
        assert_eq!(parse_bounded_u64(" 42 ", 0, u64::from(u32::MAX)).expect("42"), 42);
        assert!(parse_bounded_u64("", 0, 10).is_err());
        assert!(parse_bounded_u64("11", 0, 10).is_err());
        assert!(parse_bounded_u64("-1", 0, 10).is_err());
    }

    #[test]
    fn mac_both_encodings() {
        let colon = parse_mac("00:11:22:aa:bb:cc", Some(6)).expect("colon form");
        let legacy = parse_mac("0;17;34;170;187;204;", Some(6)).expect("legacy form");
        assert_eq!(colon, legacy);
        assert_eq!(format_mac(&colon), "00:11:22:AA:BB:CC");
    }

    #[test]
    fn mac_length_is_enforced() {
        assert!(parse_mac("00:11:22:aa:bb", Some(6)).is_err());
        assert!(parse_mac("00:11:22:aa:bb", None).is_ok());
    }

    #[test]
    fn blob_legacy_list() {
        let b = blob_from_string("104;105;", false, false);
        assert_eq!(&b[..], b"hi");
    }

    #[test]
    fn blob_string_with_escaped_semicolon() {
        let b = blob_from_string("my\\;net", false, true);
        assert_eq!(&b[..], b"my;net");
    }

    #[test]
    fn blob_out_of_range_list_is_raw_string() {
        // "300" does not fit a byte, so the whole value is string data.
        let b = blob_from_string("300;", false, false);
        assert_eq!(&b[..], b"300;");
    }

    #[test]
    fn base64_is_strict() {
        assert_eq!(decode_base64_strict("aGVsbG8=").expect("valid"), b"hello");
        assert!(decode_base64_strict("aGVsbG8").is_err());
        assert!(decode_base64_strict("aGVs bG8=").is_err());
        assert!(decode_base64_strict("aG=sbG8=").is_err());
        assert!(decode_base64_strict("").is_err());
    }
}
