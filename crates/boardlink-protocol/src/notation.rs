//! The object/array notation embedded in `SVR` lines.
//!
//! Objects look like `{KEY: "value", OTHER: "value"}`: bare uppercase keys,
//! double-quoted string values, comma separated. They are close to JSON but
//! not JSON (the keys are unquoted), so they get a small hand parser here.
//!
//! Arrays look like `["a", "b"]`, which *is* valid JSON, so those go through
//! `serde_json`.
//!
//! The parser accepts fields in any order and any amount of whitespace
//! around the punctuation. Inside a quoted value, `\"` and `\\` are
//! unescaped. An unquoted value runs to the next `,` or `}`.

use std::iter::Peekable;
use std::str::Chars;

use crate::ProtocolError;

/// The key/value pairs of one parsed object, in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    kind: &'static str,
    entries: Vec<(String, String)>,
}

impl Fields {
    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value for `key` or a `MissingField` error.
    pub fn require(&self, key: &'static str) -> Result<&str, ProtocolError> {
        self.get(key).ok_or(ProtocolError::MissingField {
            kind: self.kind,
            field: key,
        })
    }

    /// Returns the value for `key`, or `""` when absent.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Parses the value for `key` as a number.
    pub fn require_number<T: std::str::FromStr>(
        &self,
        key: &'static str,
    ) -> Result<T, ProtocolError> {
        let raw = self.require(key)?;
        raw.trim().parse().map_err(|_| ProtocolError::InvalidNumber {
            field: key,
            value: raw.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a `{KEY: "value", ...}` object.
///
/// `kind` names the message being parsed and only shows up in errors.
pub fn parse_object(kind: &'static str, text: &str) -> Result<Fields, ProtocolError> {
    let malformed = |reason: &str| ProtocolError::MalformedPayload {
        kind,
        reason: reason.to_string(),
    };

    let mut chars = text.trim().chars().peekable();
    if chars.next() != Some('{') {
        return Err(malformed("expected '{'"));
    }

    let mut fields = Fields {
        kind,
        entries: Vec::new(),
    };

    skip_whitespace(&mut chars);
    if chars.peek() == Some(&'}') {
        chars.next();
        return finish(chars, fields, malformed);
    }

    loop {
        skip_whitespace(&mut chars);
        let key = read_key(&mut chars);
        if key.is_empty() {
            return Err(malformed("empty key"));
        }
        if chars.next() != Some(':') {
            return Err(malformed("expected ':' after key"));
        }

        skip_whitespace(&mut chars);
        let value = if chars.peek() == Some(&'"') {
            chars.next();
            read_quoted(&mut chars).ok_or_else(|| malformed("unterminated string"))?
        } else {
            read_bare(&mut chars)
        };
        fields.entries.push((key, value));

        skip_whitespace(&mut chars);
        match chars.next() {
            Some(',') => continue,
            Some('}') => return finish(chars, fields, malformed),
            _ => return Err(malformed("expected ',' or '}'")),
        }
    }
}

/// Parses a `["a", "b"]` array of strings.
pub fn parse_list(text: &str) -> Result<Vec<String>, ProtocolError> {
    serde_json::from_str(text.trim()).map_err(ProtocolError::List)
}

fn finish(
    mut rest: Peekable<Chars<'_>>,
    fields: Fields,
    malformed: impl Fn(&str) -> ProtocolError,
) -> Result<Fields, ProtocolError> {
    skip_whitespace(&mut rest);
    if rest.next().is_some() {
        return Err(malformed("trailing characters after '}'"));
    }
    Ok(fields)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn read_key(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut key = String::new();
    while let Some(c) = chars.next_if(|c| *c != ':' && *c != ',' && *c != '}') {
        key.push(c);
    }
    key.trim().to_string()
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut value = String::new();
    loop {
        match chars.next()? {
            '"' => return Some(value),
            '\\' => value.push(chars.next()?),
            c => value.push(c),
        }
    }
}

fn read_bare(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut value = String::new();
    while let Some(c) = chars.next_if(|c| *c != ',' && *c != '}') {
        value.push(c);
    }
    value.trim().to_string()
}
