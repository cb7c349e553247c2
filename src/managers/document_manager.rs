use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::{full_update, updated};
use crate::error::DataAccessError;
use crate::models::document::{self, Column as DocumentColumn, Entity as Document};

pub struct DocumentManager;

impl DocumentManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_document: document::ActiveModel,
    ) -> Result<document::Model, DataAccessError> {
        new_document
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create document", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        document_id: i32,
    ) -> Result<Option<document::Model>, DataAccessError> {
        Document::find_by_id(document_id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find document by id", e))
    }

    pub async fn find_by_type<C: ConnectionTrait>(
        db: &C,
        document_type: &str,
    ) -> Result<Vec<document::Model>, DataAccessError> {
        Document::find()
            .filter(DocumentColumn::DocumentType.eq(document_type))
            .order_by_desc(DocumentColumn::DateAdded)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find documents by type", e))
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<document::Model>, DataAccessError> {
        Document::find()
            .order_by_asc(DocumentColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find all documents", e))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        document: document::Model,
    ) -> Result<Option<document::Model>, DataAccessError> {
        let active_model: document::ActiveModel = document.into();
        updated(full_update(active_model).update(db).await, "update document")
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, document_id: i32) -> Result<bool, DataAccessError> {
        Document::delete_by_id(document_id)
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("delete document", e))
    }
}
