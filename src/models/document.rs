use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unique document identifier
pub type DocumentId = String;

/// Reserved field carrying the document id
pub const ID_FIELD: &str = "id";

/// Reserved field recording which field was tokenized when the document was
/// added. Absent on documents that were stored without an indexable field.
pub const INDEXED_FIELD_META: &str = "_indexedField";

/// A schemaless JSON document: an id plus arbitrary fields.
///
/// Serializes transparently as the underlying JSON object, so the reserved
/// fields travel with the document through storage and the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a JSON value; only objects qualify as documents.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn id(&self) -> Option<&str> {
        self.fields.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.fields
            .insert(ID_FIELD.to_string(), Value::String(id.into()));
    }

    /// Key-field name recorded at index time, if the document was indexed.
    pub fn indexed_field(&self) -> Option<&str> {
        self.fields.get(INDEXED_FIELD_META).and_then(Value::as_str)
    }

    pub fn set_indexed_field(&mut self, field: &str) {
        self.fields.insert(
            INDEXED_FIELD_META.to_string(),
            Value::String(field.to_string()),
        );
    }

    pub fn clear_indexed_field(&mut self) {
        self.fields.remove(INDEXED_FIELD_META);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Text content of `name` for indexing. Strings index as-is, numbers and
    /// booleans as their string form; null, arrays and objects count as
    /// present but carry no token content.
    pub fn field_text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => Some(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_objects_are_documents() {
        assert!(Document::from_value(json!({"a": 1})).is_some());
        assert!(Document::from_value(json!("just a string")).is_none());
        assert!(Document::from_value(json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_id_roundtrip() {
        let mut doc = Document::from_value(json!({"text": "hello"})).unwrap();
        assert!(doc.id().is_none());

        doc.set_id("doc-1");
        assert_eq!(doc.id(), Some("doc-1"));
        assert_eq!(doc.into_value()["id"], json!("doc-1"));
    }

    #[test]
    fn test_indexed_field_metadata() {
        let mut doc = Document::from_value(json!({"title": "abc"})).unwrap();
        assert!(doc.indexed_field().is_none());

        doc.set_indexed_field("title");
        assert_eq!(doc.indexed_field(), Some("title"));

        doc.clear_indexed_field();
        assert!(doc.indexed_field().is_none());
    }

    #[test]
    fn test_field_text_coercion() {
        let doc = Document::from_value(json!({
            "text": "Hello World",
            "count": 42,
            "active": true,
            "missing_value": null,
            "nested": {"x": 1},
        }))
        .unwrap();

        assert_eq!(doc.field_text("text").as_deref(), Some("Hello World"));
        assert_eq!(doc.field_text("count").as_deref(), Some("42"));
        assert_eq!(doc.field_text("active").as_deref(), Some("true"));
        assert_eq!(doc.field_text("missing_value").as_deref(), Some(""));
        assert_eq!(doc.field_text("nested").as_deref(), Some(""));
        assert_eq!(doc.field_text("absent"), None);
    }

    #[test]
    fn test_transparent_serialization() {
        let value = json!({"id": "x", "text": "hello"});
        let doc = Document::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), value);
    }
}
