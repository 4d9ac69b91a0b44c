// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conversions between DynamoDB attribute values and exporter types.
//!
//! Items become text records: strings as-is, numbers as their decimal text,
//! booleans as `true`/`false`, binary as standard base64. Nulls and
//! collection types are not exported.
//!
//! The scan cursor (`LastEvaluatedKey`) is carried as a JSON object of
//! `{"<attr>": {"S"|"N"|"B": "<text>"}}` so callers only ever see a string.

use crate::domain::entities::Record;
use crate::domain::errors::{ExportError, Result};
use crate::ports::scan_port::Cursor;
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use base64::{engine::general_purpose, Engine as _};
use log::trace;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Renders a scalar attribute as text.
pub fn attribute_text(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::S(s) => Some(s.clone()),
        AttributeValue::N(n) => Some(n.clone()),
        AttributeValue::Bool(b) => Some(b.to_string()),
        AttributeValue::B(b) => Some(general_purpose::STANDARD.encode(b.as_ref())),
        _ => None,
    }
}

pub fn item_to_record(item: &HashMap<String, AttributeValue>) -> Record {
    let mut attributes = BTreeMap::new();
    for (name, value) in item {
        match attribute_text(value) {
            Some(text) => {
                attributes.insert(name.clone(), text);
            }
            None => trace!("Skipping non-scalar attribute {}", name),
        }
    }
    Record::new(attributes)
}

fn cursor_error(table: &str, reason: String) -> ExportError {
    ExportError::RetrievalError {
        table: table.to_string(),
        reason,
    }
}

/// Wraps a `LastEvaluatedKey` into an opaque cursor.
pub fn encode_cursor(table: &str, key: &HashMap<String, AttributeValue>) -> Result<Cursor> {
    // Sorted so equal keys always produce equal tokens.
    let sorted: BTreeMap<&String, &AttributeValue> = key.iter().collect();
    let mut map = Map::new();
    for (name, value) in sorted {
        let encoded = match value {
            AttributeValue::S(s) => json!({ "S": s }),
            AttributeValue::N(n) => json!({ "N": n }),
            AttributeValue::B(b) => json!({ "B": general_purpose::STANDARD.encode(b.as_ref()) }),
            other => {
                return Err(cursor_error(
                    table,
                    format!("unsupported key attribute type for {}: {:?}", name, other),
                ))
            }
        };
        map.insert(name.clone(), encoded);
    }
    Ok(Cursor::from_token(Value::Object(map).to_string()))
}

/// Recovers the `ExclusiveStartKey` from a cursor issued by [`encode_cursor`].
pub fn decode_cursor(table: &str, cursor: &Cursor) -> Result<HashMap<String, AttributeValue>> {
    let value: Value = serde_json::from_str(cursor.token())
        .map_err(|e| cursor_error(table, format!("malformed scan cursor: {}", e)))?;
    let Value::Object(map) = value else {
        return Err(cursor_error(table, "scan cursor is not an object".to_string()));
    };

    let mut key = HashMap::with_capacity(map.len());
    for (name, typed) in map {
        let (kind, text) = typed
            .as_object()
            .filter(|o| o.len() == 1)
            .and_then(|o| o.iter().next())
            .and_then(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .ok_or_else(|| cursor_error(table, format!("malformed cursor attribute {}", name)))?;

        let attr = match kind.as_str() {
            "S" => AttributeValue::S(text),
            "N" => AttributeValue::N(text),
            "B" => {
                let bytes = general_purpose::STANDARD.decode(text).map_err(|e| {
                    cursor_error(table, format!("bad binary cursor attribute {}: {}", name, e))
                })?;
                AttributeValue::B(Blob::new(bytes))
            }
            other => {
                return Err(cursor_error(
                    table,
                    format!("unknown cursor attribute type {} for {}", other, name),
                ))
            }
        };
        key.insert(name, attr);
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_to_record() {
        let item = HashMap::from([
            ("UUID".to_string(), AttributeValue::S("abc".into())),
            ("Count".to_string(), AttributeValue::N("42.5".into())),
            ("Active".to_string(), AttributeValue::Bool(true)),
            ("Raw".to_string(), AttributeValue::B(Blob::new(vec![0u8, 255]))),
            ("Gone".to_string(), AttributeValue::Null(true)),
            ("Tags".to_string(), AttributeValue::Ss(vec!["x".into()])),
        ]);
        let record = item_to_record(&item);
        assert_eq!(record.get("UUID"), Some("abc"));
        assert_eq!(record.get("Count"), Some("42.5"));
        assert_eq!(record.get("Active"), Some("true"));
        assert_eq!(record.get("Raw"), Some("AP8="));
        assert_eq!(record.get("Gone"), None);
        assert_eq!(record.get("Tags"), None);
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_cursor_survives_encode_decode() {
        let key = HashMap::from([
            ("UUID".to_string(), AttributeValue::S("id-\"42\"".into())),
            ("Seq".to_string(), AttributeValue::N("7".into())),
            ("Bin".to_string(), AttributeValue::B(Blob::new(b"\x01\x02".to_vec()))),
        ]);
        let cursor = encode_cursor("t", &key).unwrap();
        assert_eq!(decode_cursor("t", &cursor).unwrap(), key);
    }

    #[test]
    fn test_cursor_token_is_deterministic() {
        let a = HashMap::from([
            ("a".to_string(), AttributeValue::S("1".into())),
            ("b".to_string(), AttributeValue::N("2".into())),
        ]);
        let b = a.clone();
        assert_eq!(encode_cursor("t", &a).unwrap(), encode_cursor("t", &b).unwrap());
        assert_eq!(
            encode_cursor("t", &a).unwrap().token(),
            r#"{"a":{"S":"1"},"b":{"N":"2"}}"#
        );
    }

    #[test]
    fn test_unsupported_key_type() {
        let key = HashMap::from([("k".to_string(), AttributeValue::Bool(true))]);
        assert!(matches!(
            encode_cursor("t", &key),
            Err(ExportError::RetrievalError { .. })
        ));
    }

    #[test]
    fn test_malformed_cursor() {
        for token in ["not json", "[1]", r#"{"k":"S"}"#, r#"{"k":{"X":"1"}}"#] {
            let res = decode_cursor("t", &Cursor::from_token(token));
            assert!(res.is_err(), "token {} should be rejected", token);
        }
    }
}
