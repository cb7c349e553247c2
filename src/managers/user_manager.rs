use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::{full_update, updated};
use crate::error::DataAccessError;
use crate::models::users::{self, Column as UserColumn, Entity as User};

pub struct UserManager;

impl UserManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_user: users::ActiveModel,
    ) -> Result<users::Model, DataAccessError> {
        new_user
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create user", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
    ) -> Result<Option<users::Model>, DataAccessError> {
        User::find_by_id(user_id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find user by id", e))
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> Result<Option<users::Model>, DataAccessError> {
        User::find()
            .filter(UserColumn::Email.eq(email))
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find user by email", e))
    }

    pub async fn find_by_role_id<C: ConnectionTrait>(
        db: &C,
        role_id: i32,
    ) -> Result<Vec<users::Model>, DataAccessError> {
        User::find()
            .filter(UserColumn::RoleId.eq(role_id))
            .order_by_asc(UserColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find users by role", e))
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<users::Model>, DataAccessError> {
        User::find()
            .order_by_asc(UserColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find all users", e))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        user: users::Model,
    ) -> Result<Option<users::Model>, DataAccessError> {
        let active_model: users::ActiveModel = user.into();
        updated(full_update(active_model).update(db).await, "update user")
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<bool, DataAccessError> {
        User::delete_by_id(user_id)
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("delete user", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::test_support::{seed_role, seed_user};

    #[tokio::test]
    async fn test_find_by_email_and_role() {
        let db = test_connection().await;
        let admin = seed_role(&db, "Admin").await;
        let user = seed_user(&db, admin.id, "admin@asso.fr", "Secr3t!pass").await;

        let found = UserManager::find_by_email(&db, "admin@asso.fr").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(found.password_hash.starts_with("pbkdf2:sha256:"));
        assert!(UserManager::find_by_email(&db, "nobody@asso.fr").await.unwrap().is_none());
        assert_eq!(UserManager::find_by_role_id(&db, admin.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = test_connection().await;
        let admin = seed_role(&db, "Admin").await;
        let user = seed_user(&db, admin.id, "admin@asso.fr", "Secr3t!pass").await;

        let mut duplicate: users::ActiveModel = user.into();
        duplicate.id = sea_orm::ActiveValue::NotSet;
        assert!(UserManager::create(&db, duplicate).await.is_err());
    }

    #[tokio::test]
    async fn test_update_password_hash() {
        let db = test_connection().await;
        let admin = seed_role(&db, "Admin").await;
        let mut user = seed_user(&db, admin.id, "admin@asso.fr", "Secr3t!pass").await;

        user.password_hash = "pbkdf2:sha256:1$AA$AA".to_string();
        let saved = UserManager::update(&db, user.clone()).await.unwrap().unwrap();
        assert_eq!(saved.password_hash, "pbkdf2:sha256:1$AA$AA");
        assert!(UserManager::delete(&db, user.id).await.unwrap());
    }
}
