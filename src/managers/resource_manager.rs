use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::{full_update, updated};
use crate::error::DataAccessError;
use crate::models::resource::{self, Column as ResourceColumn, Entity as Resource};

pub struct ResourceManager;

impl ResourceManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_resource: resource::ActiveModel,
    ) -> Result<resource::Model, DataAccessError> {
        new_resource
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create resource", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        resource_id: i32,
    ) -> Result<Option<resource::Model>, DataAccessError> {
        Resource::find_by_id(resource_id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find resource by id", e))
    }

    pub async fn find_by_name<C: ConnectionTrait>(
        db: &C,
        name: &str,
    ) -> Result<Option<resource::Model>, DataAccessError> {
        Resource::find()
            .filter(ResourceColumn::Name.eq(name))
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find resource by name", e))
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<resource::Model>, DataAccessError> {
        Resource::find()
            .order_by_asc(ResourceColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find all resources", e))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        resource: resource::Model,
    ) -> Result<Option<resource::Model>, DataAccessError> {
        let active_model: resource::ActiveModel = resource.into();
        updated(full_update(active_model).update(db).await, "update resource")
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, resource_id: i32) -> Result<bool, DataAccessError> {
        Resource::delete_by_id(resource_id)
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("delete resource", e))
    }
}
