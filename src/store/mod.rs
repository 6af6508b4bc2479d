// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Low-level INI store for keyfile text.
//!
//! Groups and keys are kept in insertion order; values are stored in their
//! escaped on-disk form and (un)escaped by the typed accessors. The store
//! knows nothing about settings or properties; it only offers the
//! group/key surface the codec drives.

use std::fmt::Write as _;

use thiserror::Error;

/// String lists use `;` as the element separator, escapable as `\;`.
pub const LIST_SEPARATOR: char = ';';

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("group {0:?} not found")]
    GroupNotFound(String),
    #[error("key {key:?} not found in group {group:?}")]
    KeyNotFound { group: String, key: String },
    #[error("invalid value for {group:?}/{key:?}: {reason}")]
    InvalidValue {
        group: String,
        key: String,
        reason: String,
    },
    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Entry {
    key: String,
    /// Raw value text, still carrying keyfile escapes.
    value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Group {
    name: String,
    entries: Vec<Entry>,
}

/// An in-memory keyfile: ordered groups of ordered `key=value` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyfileStore {
    groups: Vec<Group>,
}

impl KeyfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses keyfile text. Comment lines (`#` or `;`) and blank lines are
    /// skipped. A duplicate group header re-opens the existing group; a
    /// duplicate key within a group is kept as an additional occurrence so
    /// that enumeration reports it again (last occurrence wins on lookup).
    pub fn parse(text: &str) -> Result<Self, StoreError> {
        let mut store = Self::new();
        let mut current: Option<usize> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim_end_matches('\r');
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';')
            {
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| StoreError::Parse {
                    line: idx + 1,
                    reason: "unterminated group header".to_string(),
                })?;
                if name.is_empty() {
                    return Err(StoreError::Parse {
                        line: idx + 1,
                        reason: "empty group name".to_string(),
                    });
                }
                current = Some(store.ensure_group(name));
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| StoreError::Parse {
                line: idx + 1,
                reason: "expected `key=value`".to_string(),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(StoreError::Parse {
                    line: idx + 1,
                    reason: "empty key".to_string(),
                });
            }
            let gi = current.ok_or_else(|| StoreError::Parse {
                line: idx + 1,
                reason: "entry before any group header".to_string(),
            })?;
            store.groups[gi].entries.push(Entry {
                key: key.to_string(),
                value: value.trim_start().to_string(),
            });
        }

        Ok(store)
    }

    /// Renders the store back to keyfile text, groups and keys in insertion
    /// order.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}]", group.name);
            for entry in &group.entries {
                let _ = writeln!(out, "{}={}", entry.key, entry.value);
            }
        }
        out
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g.name == group)
    }

    /// Key occurrences of a group in insertion order. Duplicate keys appear
    /// once per occurrence; the relative order of duplicates is whatever the
    /// input carried (implementation-defined for consumers).
    pub fn keys(&self, group: &str) -> Vec<&str> {
        self.group(group)
            .map(|g| g.entries.iter().map(|e| e.key.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn has_key(&self, group: &str, key: &str) -> Result<bool, StoreError> {
        let g = self
            .group(group)
            .ok_or_else(|| StoreError::GroupNotFound(group.to_string()))?;
        Ok(g.entries.iter().any(|e| e.key == key))
    }

    /// Raw (still escaped) value of the last occurrence of `key`.
    pub fn raw_value(&self, group: &str, key: &str) -> Option<&str> {
        self.group(group)?
            .entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    // ── typed getters ──────────────────────────────────────────────────

    pub fn get_string(&self, group: &str, key: &str) -> Result<String, StoreError> {
        let raw = self.require(group, key)?;
        Ok(unescape_value(raw))
    }

    pub fn get_integer(&self, group: &str, key: &str) -> Result<i32, StoreError> {
        let raw = self.require(group, key)?;
        raw.trim()
            .parse::<i32>()
            .map_err(|e| self.invalid(group, key, &format!("not a 32-bit integer: {e}")))
    }

    pub fn get_int64(&self, group: &str, key: &str) -> Result<i64, StoreError> {
        let raw = self.require(group, key)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|e| self.invalid(group, key, &format!("not a 64-bit integer: {e}")))
    }

    pub fn get_boolean(&self, group: &str, key: &str) -> Result<bool, StoreError> {
        let raw = self.require(group, key)?;
        match raw.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(self.invalid(group, key, &format!("not a boolean: {other:?}"))),
        }
    }

    pub fn get_string_list(
        &self,
        group: &str,
        key: &str,
    ) -> Result<Vec<String>, StoreError> {
        let raw = self.require(group, key)?;
        Ok(split_list(raw).into_iter().map(|s| unescape_value(&s)).collect())
    }

    pub fn get_integer_list(
        &self,
        group: &str,
        key: &str,
    ) -> Result<Vec<i32>, StoreError> {
        let raw = self.require(group, key)?;
        let mut out = Vec::new();
        for piece in raw.split(LIST_SEPARATOR) {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            out.push(piece.parse::<i32>().map_err(|e| {
                self.invalid(group, key, &format!("bad list element {piece:?}: {e}"))
            })?);
        }
        Ok(out)
    }

    // ── typed setters ──────────────────────────────────────────────────

    pub fn set_raw(&mut self, group: &str, key: &str, value: &str) {
        let gi = self.ensure_group(group);
        self.groups[gi].entries.push(Entry {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    pub fn set_string(&mut self, group: &str, key: &str, value: &str) {
        let escaped = escape_value(value, false);
        self.set_raw(group, key, &escaped);
    }

    pub fn set_integer(&mut self, group: &str, key: &str, value: i32) {
        self.set_raw(group, key, &value.to_string());
    }

    pub fn set_int64(&mut self, group: &str, key: &str, value: i64) {
        self.set_raw(group, key, &value.to_string());
    }

    pub fn set_uint64(&mut self, group: &str, key: &str, value: u64) {
        self.set_raw(group, key, &value.to_string());
    }

    pub fn set_boolean(&mut self, group: &str, key: &str, value: bool) {
        self.set_raw(group, key, if value { "true" } else { "false" });
    }

    pub fn set_string_list(&mut self, group: &str, key: &str, values: &[String]) {
        let mut raw = String::new();
        for v in values {
            raw.push_str(&escape_value(v, true));
            raw.push(LIST_SEPARATOR);
        }
        self.set_raw(group, key, &raw);
    }

    pub fn set_uint_list(&mut self, group: &str, key: &str, values: &[u32]) {
        let mut raw = String::new();
        for v in values {
            let _ = write!(raw, "{v}{LIST_SEPARATOR}");
        }
        self.set_raw(group, key, &raw);
    }

    pub fn set_byte_list(&mut self, group: &str, key: &str, values: &[u8]) {
        let mut raw = String::new();
        for v in values {
            let _ = write!(raw, "{v}{LIST_SEPARATOR}");
        }
        self.set_raw(group, key, &raw);
    }

    // ── internals ──────────────────────────────────────────────────────

    fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn ensure_group(&mut self, name: &str) -> usize {
        if let Some(i) = self.groups.iter().position(|g| g.name == name) {
            return i;
        }
        self.groups.push(Group {
            name: name.to_string(),
            entries: Vec::new(),
        });
        self.groups.len() - 1
    }

    fn require(&self, group: &str, key: &str) -> Result<&str, StoreError> {
        let g = self
            .group(group)
            .ok_or_else(|| StoreError::GroupNotFound(group.to_string()))?;
        g.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
            .ok_or_else(|| StoreError::KeyNotFound {
                group: group.to_string(),
                key: key.to_string(),
            })
    }

    fn invalid(&self, group: &str, key: &str, reason: &str) -> StoreError {
        StoreError::InvalidValue {
            group: group.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Unescapes a raw keyfile value: `\s` `\t` `\n` `\r` `\\`. Escape
/// sequences the store does not define (for example `\;`, which only list
/// parsing consumes) are kept verbatim for higher layers.
pub fn unescape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    out
}

/// Escapes a value for storage. Leading space, control characters and
/// backslashes always need escaping; `in_list` additionally escapes the
/// list separator.
pub fn escape_value(value: &str, in_list: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            ' ' if i == 0 => out.push_str("\\s"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            LIST_SEPARATOR if in_list => out.push_str("\\;"),
            _ => out.push(c),
        }
    }
    out
}

/// Splits a raw list value on unescaped `;`, dropping the customary
/// trailing empty element. `\;` within an element is resolved here; the
/// remaining escapes are left for [`unescape_value`].
fn split_list(raw: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut cur = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    if next == LIST_SEPARATOR {
                        cur.push(LIST_SEPARATOR);
                    } else {
                        cur.push('\\');
                        cur.push(next);
                    }
                } else {
                    cur.push('\\');
                }
            },
            LIST_SEPARATOR => pieces.push(std::mem::take(&mut cur)),
            _ => cur.push(c),
        }
    }
    if !cur.is_empty() {
        pieces.push(cur);
    }
    pieces
}

/// Encodes a key name so that it only contains `[A-Za-z0-9-]`; every other
/// byte becomes a `\xNN` hex escape.
pub fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' {
            out.push(b as char);
        } else {
            let _ = write!(out, "\\x{b:02x}");
        }
    }
    out
}

/// Reverses [`encode_key`]. Malformed escapes are kept verbatim.
pub fn decode_key(key: &str) -> String {
    let mut out = Vec::with_capacity(key.len());
    let bytes = key.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\'
            && i + 3 < bytes.len()
            && bytes[i + 1] == b'x'
            && let Ok(hex) = std::str::from_utf8(&bytes[i + 2..i + 4])
            && let Ok(v) = u8::from_str_radix(hex, 16)
        {
            out.push(v);
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_render_round_trip() {
        let text = "[connection]\nid=home\ntype=802-3-ethernet\n\n[ipv4]\nmethod=auto\n";
        let store = KeyfileStore::parse(text).expect("parse");
        assert_eq!(store.groups().collect::<Vec<_>>(), ["connection", "ipv4"]);
        assert_eq!(store.get_string("connection", "id").expect("id"), "home");
        assert_eq!(store.to_text(), text);
    }

    #[test]
    fn string_escapes() {
        let mut store = KeyfileStore::new();
        store.set_string("g", "k", " spaced\tand\nmore\\");
        let rendered = store.to_text();
        let back = KeyfileStore::parse(&rendered).expect("parse");
        assert_eq!(back.get_string("g", "k").expect("k"), " spaced\tand\nmore\\");
    }

    #[test]
    fn list_separator_escaping() {
        let mut store = KeyfileStore::new();
        store.set_string_list(
            "g",
            "k",
            &["plain".to_string(), "with;semi".to_string()],
        );
        let back = KeyfileStore::parse(&store.to_text()).expect("parse");
        assert_eq!(
            back.get_string_list("g", "k").expect("list"),
            ["plain", "with;semi"]
        );
    }

    #[test]
    fn unknown_escape_is_kept() {
        let store = KeyfileStore::parse("[g]\nk=my\\;net\n").expect("parse");
        assert_eq!(store.get_string("g", "k").expect("k"), "my\\;net");
    }

    #[test]
    fn duplicate_key_lookup_takes_last() {
        let store = KeyfileStore::parse("[g]\nk=first\nk=second\n").expect("parse");
        assert_eq!(store.get_string("g", "k").expect("k"), "second");
        assert_eq!(store.keys("g"), ["k", "k"]);
    }

    #[test]
    fn key_encoding() {
        assert_eq!(encode_key("plain-key"), "plain-key");
        assert_eq!(encode_key("a b.c"), "a\\x20b\\x2ec");
        assert_eq!(decode_key("a\\x20b\\x2ec"), "a b.c");
    }

    #[test]
    fn boolean_forms() {
        let store =
            KeyfileStore::parse("[g]\na=true\nb=0\nc=yes\n").expect("parse");
        assert!(store.get_boolean("g", "a").expect("a"));
        assert!(!store.get_boolean("g", "b").expect("b"));
        assert!(store.get_boolean("g", "c").is_err());
    }
}
