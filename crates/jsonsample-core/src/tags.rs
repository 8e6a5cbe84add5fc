//! Field annotation parsing.
//!
//! Annotations follow the Go struct tag convention: whitespace-separated
//! `key:"value"` entries. Only the `json` entry matters here; other entries
//! are skipped even when they are not well formed.

use crate::declarations::RawTag;
use crate::error::{Error, Result};

const JSON_KEY: &str = "json";

/// Value of the `json` entry, `Ok(None)` when the tag has none.
///
/// When the entry appears more than once the last one wins.
pub fn lookup_json(tag: &RawTag) -> Result<Option<String>> {
    let mut rest = tag.text.as_str();
    let mut found = None;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(found);
        }

        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == ':')
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = &rest[key_end..];

        let Some(value) = rest.strip_prefix(':') else {
            if key == JSON_KEY {
                return Err(malformed(tag, "expected ':' after json"));
            }
            continue;
        };

        if !value.starts_with('"') {
            let bare_end = value.find(char::is_whitespace).unwrap_or(value.len());
            if key == JSON_KEY {
                return Err(malformed(
                    tag,
                    format!("json value {:?} must be quoted", &value[..bare_end]),
                ));
            }
            rest = &value[bare_end..];
            continue;
        }

        let Some(end) = closing_quote(value) else {
            if key == JSON_KEY {
                return Err(malformed(tag, "unterminated json value"));
            }
            return Ok(found);
        };
        if key == JSON_KEY {
            found = Some(unescape(&value[1..end]));
        }
        rest = &value[end + 1..];
    }
}

/// First comma-separated component of the `json` value, if non-empty.
pub fn json_key_override(tag: &RawTag) -> Result<Option<String>> {
    let value = lookup_json(tag)?;
    Ok(value
        .as_deref()
        .and_then(|value| value.split(',').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string))
}

/// Byte index of the quote closing the string that starts at `quoted[0]`.
fn closing_quote(quoted: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in quoted.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Resolves backslash escapes of an interpreted string body.
pub(crate) fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn malformed(tag: &RawTag, message: impl Into<String>) -> Error {
    Error::MalformedTag {
        position: tag.position,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Position;

    fn tag(text: &str) -> RawTag {
        RawTag {
            text: text.to_string(),
            position: Position::new(1, 1),
        }
    }

    #[test]
    fn finds_json_among_other_entries() {
        let value = lookup_json(&tag(r#"yaml:"y" json:"name,omitempty" db:"n""#)).expect("tag");
        assert_eq!(value.as_deref(), Some("name,omitempty"));
    }

    #[test]
    fn quoted_values_may_contain_spaces() {
        let value = lookup_json(&tag(r#"doc:"a b c" json:"x""#)).expect("tag");
        assert_eq!(value.as_deref(), Some("x"));
    }

    #[test]
    fn missing_json_entry_is_none() {
        assert_eq!(lookup_json(&tag(r#"yaml:"y""#)).expect("tag"), None);
        assert_eq!(lookup_json(&tag("")).expect("tag"), None);
    }

    #[test]
    fn override_uses_first_component_only_when_non_empty() {
        assert_eq!(
            json_key_override(&tag(r#"json:"custom_key,omitempty""#)).expect("tag"),
            Some("custom_key".to_string())
        );
        assert_eq!(
            json_key_override(&tag(r#"json:",omitempty""#)).expect("tag"),
            None
        );
    }

    #[test]
    fn unquoted_json_value_is_malformed() {
        let err = lookup_json(&tag("json:name")).expect_err("malformed");
        assert!(matches!(err, Error::MalformedTag { .. }));
    }

    #[test]
    fn unterminated_json_value_is_malformed() {
        let err = lookup_json(&tag(r#"json:"name"#)).expect_err("malformed");
        assert!(matches!(err, Error::MalformedTag { .. }));
    }

    #[test]
    fn malformed_foreign_entries_are_skipped() {
        let value = lookup_json(&tag(r#"xml:bare json:"ok""#)).expect("tag");
        assert_eq!(value.as_deref(), Some("ok"));
    }
}
