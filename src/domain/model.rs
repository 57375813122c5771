use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// The four collections managed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Blogs,
    Highlights,
    StudyMaterials,
    Messages,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Blogs => "blogs",
            Collection::Highlights => "highlights",
            Collection::StudyMaterials => "study-materials",
            Collection::Messages => "messages",
        }
    }

    /// Field holding the store-assigned creation time, used for ordering.
    pub fn timestamp_field(&self) -> &'static str {
        match self {
            Collection::StudyMaterials => "uploadedAt",
            _ => "createdAt",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<FieldValue>),
    Map(Fields),
}

pub type Fields = BTreeMap<String, FieldValue>;

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Lenient text rendering for fields that other writers may have stored as numbers.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Double(d) => Some(d.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Array(values.into_iter().map(FieldValue::String).collect())
    }
}

/// A raw document as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Missing or non-text fields read as the empty string.
    pub fn text(&self, key: &str) -> String {
        self.fields
            .get(key)
            .and_then(FieldValue::to_text)
            .unwrap_or_default()
    }

    pub fn text_list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(FieldValue::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn date(&self, key: &str) -> RecordDate {
        RecordDate(self.fields.get(key).and_then(FieldValue::as_timestamp))
    }
}

/// Store-assigned timestamp of a record. Renders as `June 1, 2024`, or `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RecordDate(pub Option<DateTime<Utc>>);

impl RecordDate {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.0
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ts) => write!(f, "{}", ts.format("%B %-d, %Y")),
            None => f.write_str("Unknown"),
        }
    }
}
