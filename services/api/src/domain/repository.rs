#![allow(async_fn_in_trait)]

use serde_json::{Map, Value};

use cardoctor_core::error::AppError;
use cardoctor_domain::document::{Document, Filter};
use cardoctor_domain::id::DocumentId;
use cardoctor_domain::outcome::{DeleteResult, InsertOneResult, UpdateResult};

/// One named collection of schemaless documents.
pub trait DocumentCollection: Send + Sync {
    /// Documents matching `filter`, in insertion order.
    async fn find(&self, filter: &Filter) -> Result<Vec<Document>, AppError>;

    async fn find_one(&self, id: DocumentId) -> Result<Option<Document>, AppError>;

    /// Store `body` under a fresh id. A client-supplied `_id` is ignored.
    async fn insert_one(&self, body: Map<String, Value>) -> Result<InsertOneResult, AppError>;

    /// Merge `fields` into the document's top level (`$set`). No upsert.
    async fn set_fields(
        &self,
        id: DocumentId,
        fields: Map<String, Value>,
    ) -> Result<UpdateResult, AppError>;

    async fn delete_one(&self, id: DocumentId) -> Result<DeleteResult, AppError>;
}
