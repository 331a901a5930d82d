//! Shared XML attribute parsing utilities for the layout reader.
//!
//! Missing attributes are `None`. An attribute that is present but does not
//! parse is logged once and then treated as missing, so one bad field never
//! aborts a whole layout.

use std::str::FromStr;

use quick_xml::events::BytesStart;

/// Extract a string attribute value by key.
///
/// Returns `None` if the attribute is missing or not valid UTF-8.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(|s| s.to_string());
        }
    }
    None
}

/// Extract and parse an attribute, warning when it is present but malformed.
pub fn attr_parsed<T: FromStr>(e: &BytesStart, key: &[u8]) -> Option<T> {
    let raw = attr_string(e, key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(
                element = %local_name_string(e),
                attribute = %String::from_utf8_lossy(key),
                value = %raw,
                "skipping malformed attribute"
            );
            None
        }
    }
}

/// Extract a `usize` attribute value by key.
pub fn attr_usize(e: &BytesStart, key: &[u8]) -> Option<usize> {
    attr_parsed(e, key)
}

/// Extract an `i64` attribute value by key.
pub fn attr_i64(e: &BytesStart, key: &[u8]) -> Option<i64> {
    attr_parsed(e, key)
}

/// Extract a boolean attribute value by key.
///
/// Recognizes `"1"`, `"true"` as true; `"0"`, `"false"` as false. Anything
/// else is logged and treated as missing.
pub fn attr_bool(e: &BytesStart, key: &[u8]) -> Option<bool> {
    let raw = attr_string(e, key)?;
    match raw.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => {
            tracing::warn!(
                element = %local_name_string(e),
                attribute = %String::from_utf8_lossy(key),
                value = %raw,
                "skipping malformed boolean"
            );
            None
        }
    }
}

/// Extract a boolean attribute with a default value.
pub fn attr_bool_default(e: &BytesStart, key: &[u8], default: bool) -> bool {
    attr_bool(e, key).unwrap_or(default)
}

/// Get the local element name as an owned string.
///
/// Returns empty string if not valid UTF-8.
#[inline]
pub fn local_name_string(e: &BytesStart) -> String {
    let bytes = e.local_name();
    std::str::from_utf8(bytes.as_ref())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn make_start(xml: &str) -> BytesStart<'_> {
        // Strip < and > / /> to get just the tag content
        let content = xml
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();
        BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()))
    }

    #[test]
    fn test_attr_string() {
        let e = make_start(r#"<span r="3" c="1" />"#);
        assert_eq!(attr_string(&e, b"r"), Some("3".to_string()));
        assert_eq!(attr_string(&e, b"missing"), None);
    }

    #[test]
    fn test_attr_usize() {
        let e = make_start(r#"<region rows="12" />"#);
        assert_eq!(attr_usize(&e, b"rows"), Some(12));
        assert_eq!(attr_usize(&e, b"missing"), None);
    }

    #[test]
    fn test_attr_i64_negative() {
        let e = make_start(r#"<rowBinding row="0" binding="-1" />"#);
        assert_eq!(attr_i64(&e, b"binding"), Some(-1));
    }

    #[test]
    fn test_attr_bool() {
        let e = make_start(r#"<region visible="false" virtual="1" />"#);
        assert_eq!(attr_bool(&e, b"visible"), Some(false));
        assert_eq!(attr_bool(&e, b"virtual"), Some(true));
        assert!(attr_bool_default(&e, b"missing", true));
    }

    #[test]
    #[traced_test]
    fn test_malformed_number_is_logged() {
        let e = make_start(r#"<rowHeight row="two" height="5" />"#);
        assert_eq!(attr_usize(&e, b"row"), None);
        assert_eq!(attr_usize(&e, b"height"), Some(5));
        assert!(logs_contain("skipping malformed attribute"));
    }

    #[test]
    fn test_local_name_string() {
        let e = make_start(r#"<tableLayout columns="2" />"#);
        assert_eq!(local_name_string(&e), "tableLayout");
    }
}
