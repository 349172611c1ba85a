//! Schemaless documents and the filters used to select them.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::id::DocumentId;

/// Key under which a document's id is exposed to clients.
pub const ID_FIELD: &str = "_id";

/// A stored JSON object plus its store-assigned id.
///
/// Serializes as a single flat object: `{"_id": "...", ...body}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Document {
    /// Build a document, dropping any client-supplied `_id` from the body.
    pub fn new(id: DocumentId, body: Map<String, Value>) -> Self {
        Self {
            id,
            body: strip_id(body),
        }
    }

    /// Keep only the named top-level fields. `_id` is always kept.
    ///
    /// ```
    /// use cardoctor_domain::document::Document;
    /// use cardoctor_domain::id::DocumentId;
    /// use serde_json::json;
    ///
    /// let body = json!({"title": "Oil change", "price": 20, "description": "long"});
    /// let doc = Document::new(DocumentId::generate(), body.as_object().unwrap().clone());
    /// let projected = doc.project(&["title", "price", "img"]);
    /// assert_eq!(projected.body.len(), 2);
    /// assert!(projected.body.get("description").is_none());
    /// ```
    pub fn project(&self, fields: &[&str]) -> Document {
        let body = fields
            .iter()
            .filter_map(|field| {
                self.body
                    .get(*field)
                    .map(|value| ((*field).to_owned(), value.clone()))
            })
            .collect();
        Document { id: self.id, body }
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.body.get(name).and_then(Value::as_str)
    }
}

/// Remove the reserved `_id` key; ids are owned by the store.
pub fn strip_id(mut body: Map<String, Value>) -> Map<String, Value> {
    body.remove(ID_FIELD);
    body
}

/// Selection applied to a collection scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    /// Top-level string field equals the given value.
    FieldEq { field: String, value: String },
}

impl Filter {
    pub fn field_eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::FieldEq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::FieldEq { field, value } => document.field_str(field) == Some(value.as_str()),
        }
    }
}
