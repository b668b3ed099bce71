//! Transport encoding of form state.
//!
//! A record travels to and from the persistence collaborator as a flat,
//! ordered map of field name to scalar value. Tag lists are joined into one
//! delimited string and sub-record lists are embedded as JSON text.

use super::collection::{SubRecord, reassign_ids};
use crate::config::DEFAULT_COUNTRY_CODE;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scalar as understood by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransportValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Serialized form state: field name to value, in stable key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportPayload(BTreeMap<String, TransportValue>);

impl TransportPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: TransportValue) {
        self.0.insert(key.to_string(), value);
    }

    pub fn insert_text(&mut self, key: &str, value: impl Into<String>) {
        self.insert(key, TransportValue::Text(value.into()));
    }

    pub fn insert_int(&mut self, key: &str, value: i64) {
        self.insert(key, TransportValue::Integer(value));
    }

    pub fn insert_opt_int(&mut self, key: &str, value: Option<i64>) {
        self.insert(key, value.map_or(TransportValue::Null, TransportValue::Integer));
    }

    pub fn insert_opt_float(&mut self, key: &str, value: Option<f64>) {
        self.insert(key, value.map_or(TransportValue::Null, TransportValue::Float));
    }

    pub fn insert_opt_text(&mut self, key: &str, value: Option<&str>) {
        self.insert(
            key,
            value.map_or(TransportValue::Null, |v| TransportValue::Text(v.to_string())),
        );
    }

    pub fn insert_bool(&mut self, key: &str, value: bool) {
        self.insert(key, TransportValue::Bool(value));
    }

    pub fn get(&self, key: &str) -> Option<&TransportValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text value; numbers are rendered, nulls are absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            TransportValue::Text(s) => Some(s.clone()),
            TransportValue::Integer(i) => Some(i.to_string()),
            TransportValue::Float(f) => Some(f.to_string()),
            TransportValue::Bool(b) => Some(b.to_string()),
            TransportValue::Null => None,
        }
    }

    /// Text value or an empty string.
    pub fn text_or_default(&self, key: &str) -> String {
        self.text(key).unwrap_or_default()
    }

    /// Integer value; numeric strings are accepted since some endpoints
    /// return every column as text.
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            TransportValue::Integer(i) => Some(*i),
            TransportValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            TransportValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            TransportValue::Float(f) => Some(*f),
            TransportValue::Integer(i) => Some(*i as f64),
            TransportValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean value; accepts `1`/`0` and `"true"`/`"false"`.
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            TransportValue::Bool(b) => Some(*b),
            TransportValue::Integer(i) => Some(*i != 0),
            TransportValue::Text(s) => match s.trim() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TransportValue)> {
        self.0.iter()
    }
}

/// Transport settings shared by every schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    pub tag_delimiter: String,
    /// Prefix replacing a leading `0` when phone numbers are normalised
    pub country_code: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            tag_delimiter: ",".to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}

/// A structured field that could not be decoded and was replaced by its
/// empty default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub field: String,
    pub message: String,
}

/// Joins tags with `delimiter`. A delimiter inside a tag becomes a space, so
/// every tag reads back from [`split_tags`] as exactly one tag.
pub fn join_tags(tags: &[String], delimiter: &str) -> String {
    if delimiter.is_empty() {
        return tags.join(delimiter);
    }
    tags.iter()
        .map(|t| {
            t.replace(delimiter, " ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(delimiter)
}

pub fn split_tags(raw: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        let tag = raw.trim();
        return if tag.is_empty() { Vec::new() } else { vec![tag.to_string()] };
    }
    raw.split(delimiter)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Encodes sub-records as JSON text. Client ids are not part of the encoding.
pub fn encode_records<T: SubRecord + Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// Decodes JSON text into sub-records with fresh client ids.
///
/// Missing or blank input is an empty list. Malformed input also yields an
/// empty list, plus a [`ParseWarning`]; it is never a blocking error.
pub fn decode_records<T: SubRecord + DeserializeOwned>(
    field: &str,
    raw: Option<&str>,
) -> (Vec<T>, Option<ParseWarning>) {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return (Vec::new(), None);
    };

    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(mut records) => {
            reassign_ids(&mut records);
            (records, None)
        }
        Err(e) => {
            tracing::warn!(
                "[Transport] malformed '{}' collection, using empty list: {}",
                field,
                e
            );
            (
                Vec::new(),
                Some(ParseWarning {
                    field: field.to_string(),
                    message: e.to_string(),
                }),
            )
        }
    }
}

/// Collects decoded collections and their warnings during hydration.
#[derive(Debug)]
pub struct PayloadReader<'a> {
    payload: &'a TransportPayload,
    warnings: Vec<ParseWarning>,
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a TransportPayload) -> Self {
        Self {
            payload,
            warnings: Vec::new(),
        }
    }

    pub fn payload(&self) -> &'a TransportPayload {
        self.payload
    }

    pub fn records<T: SubRecord + DeserializeOwned>(&mut self, key: &str) -> Vec<T> {
        let raw = self.payload().text(key);
        let (records, warning) = decode_records(key, raw.as_deref());
        self.warnings.extend(warning);
        records
    }

    pub fn tags(&self, key: &str, delimiter: &str) -> Vec<String> {
        split_tags(&self.payload().text_or_default(key), delimiter)
    }

    pub fn finish(self) -> Vec<ParseWarning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_scalar_reads() {
        let mut p = TransportPayload::new();
        p.insert_text("year", "2012");
        p.insert_int("published", 1);
        p.insert("missing", TransportValue::Null);
        assert_eq!(p.int("year"), Some(2012));
        assert_eq!(p.bool("published"), Some(true));
        assert_eq!(p.text("missing"), None);
        assert_eq!(p.text_or_default("absent"), "");
    }

    #[test]
    fn tags_split_and_join() {
        let tags = split_tags(" reuni, ,akbar ,2024", ",");
        assert_eq!(tags, vec!["reuni", "akbar", "2024"]);
        assert_eq!(join_tags(&tags, ","), "reuni,akbar,2024");
    }

    #[test]
    fn delimiter_inside_a_tag_does_not_split_it() {
        let tags = vec!["Jakarta, Indonesia".to_string(), "reuni".to_string()];
        let joined = join_tags(&tags, ",");
        assert_eq!(joined, "Jakarta Indonesia,reuni");
        assert_eq!(split_tags(&joined, ","), vec!["Jakarta Indonesia", "reuni"]);

        let joined = join_tags(&["a;b".to_string(), ";".to_string()], ";");
        assert_eq!(split_tags(&joined, ";"), vec!["a b"]);
    }

    #[test]
    fn payload_serializes_as_flat_object() {
        let mut p = TransportPayload::new();
        p.insert_text("title", "Reuni");
        p.insert_int("summary_length", 150);
        p.insert_bool("featured", false);
        p.insert_opt_int("category", None);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "category": null,
                "featured": false,
                "summary_length": 150,
                "title": "Reuni"
            })
        );
        let back: TransportPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
