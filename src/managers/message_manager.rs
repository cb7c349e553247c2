use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::{full_update, updated};
use crate::error::DataAccessError;
use crate::models::message::{self, Column as MessageColumn, Entity as Message};

pub struct MessageManager;

impl MessageManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_message: message::ActiveModel,
    ) -> Result<message::Model, DataAccessError> {
        new_message
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create message", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        message_id: i32,
    ) -> Result<Option<message::Model>, DataAccessError> {
        Message::find_by_id(message_id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find message by id", e))
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> Result<Vec<message::Model>, DataAccessError> {
        Message::find()
            .filter(MessageColumn::Email.eq(email))
            .order_by_asc(MessageColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find messages by email", e))
    }

    pub async fn find_by_status<C: ConnectionTrait>(
        db: &C,
        status: &str,
    ) -> Result<Vec<message::Model>, DataAccessError> {
        Message::find()
            .filter(MessageColumn::Status.eq(status))
            .order_by_asc(MessageColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find messages by status", e))
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<message::Model>, DataAccessError> {
        Message::find()
            .order_by_asc(MessageColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find all messages", e))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        message: message::Model,
    ) -> Result<Option<message::Model>, DataAccessError> {
        let active_model: message::ActiveModel = message.into();
        updated(full_update(active_model).update(db).await, "update message")
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, message_id: i32) -> Result<bool, DataAccessError> {
        Message::delete_by_id(message_id)
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("delete message", e))
    }
}
