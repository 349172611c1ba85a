use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde_json::{Map, Value};

use cardoctor_api_schema::documents;
use cardoctor_core::error::AppError;
use cardoctor_domain::collection::Collection;
use cardoctor_domain::document::{Document, Filter, strip_id};
use cardoctor_domain::id::DocumentId;
use cardoctor_domain::outcome::{DeleteResult, InsertOneResult, UpdateResult};

use crate::domain::repository::DocumentCollection;

/// A collection backed by rows of the `documents` table.
#[derive(Clone)]
pub struct DbCollection {
    pub db: Arc<DatabaseConnection>,
    pub collection: Collection,
}

impl DbCollection {
    fn in_collection(&self) -> SimpleExpr {
        documents::Column::Collection.eq(self.collection.as_str())
    }
}

/// `doc ->> field = value`
fn field_eq(field: &str, value: &str) -> SimpleExpr {
    Expr::expr(Expr::col(documents::Column::Doc).cast_json_field(field)).eq(value)
}

impl DocumentCollection for DbCollection {
    async fn find(&self, filter: &Filter) -> Result<Vec<Document>, AppError> {
        let mut query = documents::Entity::find().filter(self.in_collection());
        if let Filter::FieldEq { field, value } = filter {
            query = query.filter(field_eq(field, value));
        }
        let models = query
            .order_by_asc(documents::Column::CreatedAt)
            .order_by_asc(documents::Column::Id)
            .all(&*self.db)
            .await
            .with_context(|| format!("find {}", self.collection))?;
        Ok(models.into_iter().map(document_from_model).collect())
    }

    async fn find_one(&self, id: DocumentId) -> Result<Option<Document>, AppError> {
        let model = documents::Entity::find_by_id(id.0)
            .filter(self.in_collection())
            .one(&*self.db)
            .await
            .with_context(|| format!("find one {}", self.collection))?;
        Ok(model.map(document_from_model))
    }

    async fn insert_one(&self, body: Map<String, Value>) -> Result<InsertOneResult, AppError> {
        let id = DocumentId::generate();
        documents::ActiveModel {
            id: Set(id.0),
            collection: Set(self.collection.as_str().to_owned()),
            doc: Set(Value::Object(strip_id(body))),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await
        .with_context(|| format!("insert into {}", self.collection))?;
        Ok(InsertOneResult::new(id))
    }

    async fn set_fields(
        &self,
        id: DocumentId,
        fields: Map<String, Value>,
    ) -> Result<UpdateResult, AppError> {
        let patch = Value::Object(strip_id(fields));
        let res = documents::Entity::update_many()
            .col_expr(
                documents::Column::Doc,
                Expr::col(documents::Column::Doc).concatenate(patch),
            )
            .filter(documents::Column::Id.eq(id.0))
            .filter(self.in_collection())
            .exec(&*self.db)
            .await
            .with_context(|| format!("update {}", self.collection))?;
        Ok(UpdateResult::matched(res.rows_affected))
    }

    async fn delete_one(&self, id: DocumentId) -> Result<DeleteResult, AppError> {
        let res = documents::Entity::delete_many()
            .filter(documents::Column::Id.eq(id.0))
            .filter(self.in_collection())
            .exec(&*self.db)
            .await
            .with_context(|| format!("delete from {}", self.collection))?;
        Ok(DeleteResult::deleted(res.rows_affected))
    }
}

fn document_from_model(model: documents::Model) -> Document {
    let body = match model.doc {
        Value::Object(body) => body,
        // Rows are only written by `insert_one`, which always stores an object.
        _ => Map::new(),
    };
    Document::new(DocumentId(model.id), body)
}
