//! Conversion between [`FieldValue`] and the typed JSON values of the Firestore REST API.

use crate::domain::model::{Document, FieldValue, Fields};
use crate::utils::error::{AdminError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Bool(b) => json!({ "booleanValue": b }),
        // 64-bit integers travel as strings.
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(ts) => {
            json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
        FieldValue::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        FieldValue::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

pub fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

pub fn decode_value(value: &Value) -> Result<FieldValue> {
    let obj = value
        .as_object()
        .ok_or_else(|| decode_error(format!("expected typed value object, got {}", value)))?;

    let Some((kind, inner)) = obj.iter().next() else {
        return Err(decode_error("empty typed value".to_string()));
    };

    let decoded = match kind.as_str() {
        "nullValue" => FieldValue::Null,
        "booleanValue" => FieldValue::Bool(inner.as_bool().unwrap_or_default()),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            FieldValue::Integer(
                parsed.ok_or_else(|| decode_error(format!("bad integerValue {}", inner)))?,
            )
        }
        "doubleValue" => {
            let parsed = match inner {
                Value::Number(n) => n.as_f64(),
                // NaN and Infinity arrive as strings.
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };
            FieldValue::Double(
                parsed.ok_or_else(|| decode_error(format!("bad doubleValue {}", inner)))?,
            )
        }
        "timestampValue" => {
            let raw = inner.as_str().unwrap_or_default();
            let ts = DateTime::parse_from_rfc3339(raw)
                .map_err(|e| decode_error(format!("bad timestampValue '{}': {}", raw, e)))?;
            FieldValue::Timestamp(ts.with_timezone(&Utc))
        }
        "stringValue" | "referenceValue" | "bytesValue" => {
            FieldValue::String(inner.as_str().unwrap_or_default().to_string())
        }
        "arrayValue" => {
            let items = match inner.get("values").and_then(Value::as_array) {
                Some(values) => values.iter().map(decode_value).collect::<Result<Vec<_>>>()?,
                None => Vec::new(),
            };
            FieldValue::Array(items)
        }
        "mapValue" => match inner.get("fields").and_then(Value::as_object) {
            Some(fields) => FieldValue::Map(decode_fields(fields)?),
            None => FieldValue::Map(Fields::new()),
        },
        other => {
            tracing::warn!(kind = other, "Unsupported field type, reading as null");
            FieldValue::Null
        }
    };

    Ok(decoded)
}

pub fn decode_fields(fields: &Map<String, Value>) -> Result<Fields> {
    fields
        .iter()
        .map(|(key, value)| -> Result<(String, FieldValue)> {
            Ok((key.clone(), decode_value(value)?))
        })
        .collect()
}

/// Builds a [`Document`] from a REST document resource (`name` + `fields`).
pub fn decode_document(resource: &Value) -> Result<Document> {
    let name = resource
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| decode_error("document has no name".to_string()))?;
    let id = name.rsplit('/').next().unwrap_or(name).to_string();

    let fields = match resource.get("fields").and_then(Value::as_object) {
        Some(fields) => decode_fields(fields)?,
        None => Fields::new(),
    };

    Ok(Document::new(id, fields))
}

fn decode_error(message: String) -> AdminError {
    AdminError::Decode { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_document_resource() {
        let resource = json!({
            "name": "projects/demo/databases/(default)/documents/blogs/abc123",
            "fields": {
                "title": { "stringValue": "Hello" },
                "views": { "integerValue": "42" },
                "hashtags": { "arrayValue": { "values": [
                    { "stringValue": "a" },
                    { "stringValue": "b" }
                ] } },
                "empty": { "arrayValue": {} },
                "createdAt": { "timestampValue": "2024-06-01T10:00:00.123456Z" }
            },
            "createTime": "2024-06-01T10:00:00.123456Z"
        });

        let doc = decode_document(&resource).unwrap();

        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.text("title"), "Hello");
        assert_eq!(doc.fields["views"], FieldValue::Integer(42));
        assert_eq!(doc.text_list("hashtags"), vec!["a", "b"]);
        assert_eq!(doc.fields["empty"], FieldValue::Array(vec![]));
        assert_eq!(doc.date("createdAt").to_string(), "June 1, 2024");
    }

    #[test]
    fn test_encode_uses_typed_wrappers() {
        let mut fields = Fields::new();
        fields.insert("n".to_string(), FieldValue::Integer(7));
        fields.insert(
            "tags".to_string(),
            FieldValue::from(vec!["x".to_string()]),
        );
        fields.insert(
            "at".to_string(),
            FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
        );

        let encoded = Value::Object(encode_fields(&fields));

        assert_eq!(encoded["n"], json!({ "integerValue": "7" }));
        assert_eq!(
            encoded["tags"],
            json!({ "arrayValue": { "values": [{ "stringValue": "x" }] } })
        );
        assert_eq!(
            encoded["at"],
            json!({ "timestampValue": "2024-01-02T03:04:05.000000Z" })
        );
    }

    #[test]
    fn test_bad_timestamp_is_a_decode_error() {
        let value = json!({ "timestampValue": "yesterday" });
        assert!(matches!(decode_value(&value), Err(AdminError::Decode { .. })));
    }
}
