//! Ordered header blocks and header value parsing.

use crate::error::{BraidError, Result};
use bytes::{BufMut, Bytes, BytesMut};
use indexmap::IndexMap;
use std::time::Duration;

/// An insertion-ordered set of header fields.
///
/// Names are stored lower-cased. Inserting a name that is already present
/// replaces its value but keeps its original position, so layering caller
/// overrides on top of defaults never reorders the block.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct HeaderBlock(IndexMap<String, String>);

impl HeaderBlock {
    #[must_use]
    pub fn new() -> Self {
        HeaderBlock(IndexMap::new())
    }

    /// Set a header, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.0
            .insert(name.as_ref().to_ascii_lowercase(), value.into())
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(&name.to_ascii_lowercase())
    }

    /// Layer `overrides` on top of this block. Values from `overrides` win.
    pub fn merge(&mut self, overrides: &HeaderBlock) {
        for (name, value) in overrides.iter() {
            self.insert(name, value);
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append this block in wire form: `name: value\r\n` per field, then a
    /// blank line.
    pub fn write_to(&self, buffer: &mut BytesMut) {
        for (name, value) in self.iter() {
            write_header(buffer, name, value);
        }
        buffer.put_slice(b"\r\n");
    }

    /// This block in wire form.
    #[must_use]
    pub fn to_wire(&self) -> Bytes {
        let mut buffer = BytesMut::new();
        self.write_to(&mut buffer);
        buffer.freeze()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderBlock {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut block = HeaderBlock::new();
        block.extend(iter);
        block
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for HeaderBlock {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K: AsRef<str>, V: Into<String>, const N: usize> From<[(K, V); N]> for HeaderBlock {
    fn from(fields: [(K, V); N]) -> Self {
        fields.into_iter().collect()
    }
}

fn write_header(buffer: &mut BytesMut, key: &str, value: &str) {
    buffer.put_slice(key.as_bytes());
    buffer.put_slice(b": ");
    buffer.put_slice(ascii_ify(value).as_bytes());
    buffer.put_slice(b"\r\n");
}

/// Escape everything outside printable ASCII as `\uXXXX`.
///
/// Header values must not carry raw newlines or non-ASCII bytes; a version
/// token containing `\r\n` would otherwise end the header block early.
pub fn ascii_ify(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        let code = c as u32;
        if (0x20..=0x7E).contains(&code) {
            result.push(c);
        } else {
            result.push_str(&format!("\\u{:04x}", code));
        }
    }
    result
}

/// Parse a `Heartbeats` header value.
///
/// Accepts `"30s"`, `"1.5s"`, `"500ms"` and a bare number of seconds.
pub fn parse_heartbeat(value: &str) -> Result<Duration> {
    let trimmed = value.trim();
    let invalid = || BraidError::HeaderParse(format!("Invalid heartbeat: {}", value));

    if let Some(ms_str) = trimmed.strip_suffix("ms") {
        return ms_str
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| invalid());
    }
    let secs_str = trimmed.strip_suffix('s').unwrap_or(trimmed).trim();
    let secs: f64 = secs_str.parse().map_err(|_| invalid())?;
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position_on_override() {
        let mut block = HeaderBlock::from([
            ("cache-control", "no-cache"),
            ("connection", "keep-alive"),
        ]);
        block.insert("Cache-Control", "no-store");
        block.insert("x-extra", "1");

        let fields: Vec<_> = block.iter().collect();
        assert_eq!(
            fields,
            vec![
                ("cache-control", "no-store"),
                ("connection", "keep-alive"),
                ("x-extra", "1"),
            ]
        );
    }

    #[test]
    fn test_merge_overrides_win() {
        let mut defaults = HeaderBlock::from([("patch-type", "full-snapshot")]);
        let overrides = HeaderBlock::from([("Patch-Type", "merge-object"), ("peer", "abc")]);
        defaults.merge(&overrides);

        assert_eq!(defaults.get("patch-type"), Some("merge-object"));
        assert_eq!(defaults.get("PEER"), Some("abc"));
        assert_eq!(defaults.len(), 2);
    }

    #[test]
    fn test_wire_format() {
        let block = HeaderBlock::new()
            .with("content-length", "3")
            .with("version", "v1");
        assert_eq!(
            &block.to_wire()[..],
            b"content-length: 3\r\nversion: v1\r\n\r\n"
        );
    }

    #[test]
    fn test_empty_block_is_blank_line() {
        assert_eq!(&HeaderBlock::new().to_wire()[..], b"\r\n");
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let block = HeaderBlock::new().with("zeta", "1").with("alpha", "2");
        assert_eq!(
            serde_json::to_string(&block).unwrap(),
            r#"{"zeta":"1","alpha":"2"}"#
        );
    }

    #[test]
    fn test_remove() {
        let mut block = HeaderBlock::from([("a", "1"), ("b", "2"), ("c", "3")]);
        assert_eq!(block.remove("B"), Some("2".to_string()));
        let names: Vec<_> = block.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_ascii_ify() {
        assert_eq!(ascii_ify("test 123"), "test 123");
        assert_eq!(ascii_ify("héllo"), "h\\u00e9llo");
        assert_eq!(ascii_ify("a\r\nb"), "a\\u000d\\u000ab");
    }

    #[test]
    fn test_wire_escapes_values() {
        let block = HeaderBlock::new().with("version", "v1\r\ninjected: yes");
        assert_eq!(
            &block.to_wire()[..],
            b"version: v1\\u000d\\u000ainjected: yes\r\n\r\n"
        );
    }

    #[test]
    fn test_parse_heartbeat() {
        assert_eq!(parse_heartbeat("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_heartbeat("30").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_heartbeat("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_heartbeat(" 1.5s ").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_heartbeat_invalid() {
        assert!(parse_heartbeat("soon").is_err());
        assert!(parse_heartbeat("-1s").is_err());
        assert!(parse_heartbeat("").is_err());
    }
}
