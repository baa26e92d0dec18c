//! The schema-less record model.
//!
//! A record is an ordered mapping from field name to value plus the
//! system-assigned identifier. The core enforces nothing about the field
//! set beyond the identifier: callers pass whatever clinical attributes
//! they like (`Age`, `BP`, `Heart Disease`, ...) and get them back
//! unchanged. Type safety lives at the boundary: values are a small tagged
//! union rather than arbitrary store-native types.

use crate::record_id::RecordId;
use mongodb::bson::{Bson, Document};
use std::collections::BTreeMap;

/// A single field value: integer, floating-point, or text.
///
/// These are the three value shapes the record model supports. Serialises
/// untagged, so JSON output reads like a plain document
/// (`{"Age": 54, "ST depression": 0.5, "Heart Disease": "Presence"}`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Converts this value to its BSON wire form.
    pub(crate) fn to_bson(&self) -> Bson {
        match self {
            FieldValue::Int(v) => Bson::Int64(*v),
            FieldValue::Float(v) => Bson::Double(*v),
            FieldValue::Text(v) => Bson::String(v.clone()),
        }
    }

    /// Converts a BSON value read from the store.
    ///
    /// The store is schema-less, so a document written by another client may
    /// hold types outside the model. Decoding stays total: anything that is
    /// not an integer, double or string is coerced to its text rendering and
    /// logged.
    pub(crate) fn from_bson(value: Bson) -> Self {
        match value {
            Bson::Int32(v) => FieldValue::Int(i64::from(v)),
            Bson::Int64(v) => FieldValue::Int(v),
            Bson::Double(v) => FieldValue::Float(v),
            Bson::String(v) => FieldValue::Text(v),
            other => {
                tracing::warn!("coercing unsupported stored value to text: {other}");
                FieldValue::Text(other.to_string())
            }
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// An ordered mapping from field name to value.
///
/// Deterministically ordered by key; no cross-field invariants.
pub type Fields = BTreeMap<String, FieldValue>;

/// One persisted record: the identifier plus its domain attributes.
///
/// The identifier is held apart from the field map in the typed model and
/// mapped to the store's `_id` key at the backend boundary. In JSON the
/// record flattens back to the stored document shape:
/// `{"_id": "65f1...", "Age": 54, ...}`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: Fields,
}

/// Renders a field map as a BSON document, without an `_id`.
pub(crate) fn fields_to_document(fields: &Fields) -> Document {
    let mut document = Document::new();
    for (name, value) in fields {
        document.insert(name.clone(), value.to_bson());
    }
    document
}

/// Reads a stored document back into a field map, dropping the `_id` key
/// (the identifier travels separately as [`RecordId`]).
pub(crate) fn document_to_fields(mut document: Document) -> Fields {
    document.remove("_id");
    document
        .into_iter()
        .map(|(name, value)| (name, FieldValue::from_bson(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> Fields {
        Fields::from([
            ("Age".to_string(), FieldValue::Int(54)),
            ("ST depression".to_string(), FieldValue::Float(0.5)),
            (
                "Heart Disease".to_string(),
                FieldValue::Text("Presence".to_string()),
            ),
        ])
    }

    #[test]
    fn test_field_value_bson_round_trip() {
        for value in [
            FieldValue::Int(54),
            FieldValue::Float(0.5),
            FieldValue::Text("Presence".to_string()),
        ] {
            let bson = value.to_bson();
            assert_eq!(FieldValue::from_bson(bson), value);
        }
    }

    #[test]
    fn test_from_bson_widens_int32() {
        assert_eq!(FieldValue::from_bson(Bson::Int32(7)), FieldValue::Int(7));
    }

    #[test]
    fn test_from_bson_coerces_unsupported_types_to_text() {
        let coerced = FieldValue::from_bson(Bson::Boolean(true));
        assert!(matches!(coerced, FieldValue::Text(_)));
    }

    #[test]
    fn test_fields_to_document_preserves_values() {
        let document = fields_to_document(&sample_fields());

        assert_eq!(document.get_i64("Age").unwrap(), 54);
        assert_eq!(document.get_f64("ST depression").unwrap(), 0.5);
        assert_eq!(document.get_str("Heart Disease").unwrap(), "Presence");
    }

    #[test]
    fn test_document_to_fields_drops_id_key() {
        let mut document = fields_to_document(&sample_fields());
        document.insert("_id", mongodb::bson::oid::ObjectId::new());

        let fields = document_to_fields(document);

        assert!(!fields.contains_key("_id"));
        assert_eq!(fields, sample_fields());
    }

    #[test]
    fn test_record_serialises_to_flat_json() {
        let record = Record {
            id: crate::RecordId::parse("65f1a2b3c4d5e6f708192a3b").unwrap(),
            fields: sample_fields(),
        };

        let json = serde_json::to_value(&record).expect("record should serialise");

        assert_eq!(json["_id"], "65f1a2b3c4d5e6f708192a3b");
        assert_eq!(json["Age"], 54);
        assert_eq!(json["ST depression"], 0.5);
        assert_eq!(json["Heart Disease"], "Presence");
    }

    #[test]
    fn test_field_value_untagged_deserialisation() {
        let age: FieldValue = serde_json::from_str("54").unwrap();
        let depression: FieldValue = serde_json::from_str("0.5").unwrap();
        let disease: FieldValue = serde_json::from_str("\"Presence\"").unwrap();

        assert_eq!(age, FieldValue::Int(54));
        assert_eq!(depression, FieldValue::Float(0.5));
        assert_eq!(disease, FieldValue::Text("Presence".to_string()));
    }
}
