use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::{full_update, updated};
use crate::error::DataAccessError;
use crate::models::role::{self, Column as RoleColumn, Entity as Role};

/// Nom du rôle réservé aux comptes administrateurs
pub const ADMIN_ROLE: &str = "Admin";
/// Rôle des adhésions entreprises (logo obligatoire)
pub const PARTNER_ROLE: &str = "Partenaire";

pub struct RoleManager;

impl RoleManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_role: role::ActiveModel,
    ) -> Result<role::Model, DataAccessError> {
        new_role
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create role", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        role_id: i32,
    ) -> Result<Option<role::Model>, DataAccessError> {
        Role::find_by_id(role_id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find role by id", e))
    }

    pub async fn find_by_name<C: ConnectionTrait>(
        db: &C,
        name: &str,
    ) -> Result<Option<role::Model>, DataAccessError> {
        Role::find()
            .filter(RoleColumn::Name.eq(name))
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find role by name", e))
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<role::Model>, DataAccessError> {
        Role::find()
            .order_by_asc(RoleColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find all roles", e))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        role: role::Model,
    ) -> Result<Option<role::Model>, DataAccessError> {
        let active_model: role::ActiveModel = role.into();
        updated(full_update(active_model).update(db).await, "update role")
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, role_id: i32) -> Result<bool, DataAccessError> {
        Role::delete_by_id(role_id)
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("delete role", e))
    }
}

/// Rôles proposés dans le formulaire d'adhésion: tous sauf Admin
pub fn membership_roles(roles: Vec<role::Model>) -> Vec<role::Model> {
    roles
        .into_iter()
        .filter(|role| !role.name.eq_ignore_ascii_case(ADMIN_ROLE))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::test_support::seed_role;
    use sea_orm::Set;

    #[tokio::test]
    async fn test_role_crud() {
        let db = test_connection().await;

        let admin = RoleManager::create(&db, role::ActiveModel {
            name: Set("Admin".to_string()),
            description: Set(Some("Administrateur".to_string())),
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(admin.id > 0);

        let found = RoleManager::find_by_name(&db, "Admin").await.unwrap().unwrap();
        assert_eq!(found.id, admin.id);

        let mut renamed = found.clone();
        renamed.description = None;
        let updated = RoleManager::update(&db, renamed).await.unwrap().unwrap();
        assert_eq!(updated.description, None);

        assert!(RoleManager::delete(&db, admin.id).await.unwrap());
        assert!(!RoleManager::delete(&db, admin.id).await.unwrap());
        assert!(RoleManager::find_by_id(&db, admin.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_role_returns_none() {
        let db = test_connection().await;
        let ghost = role::Model { id: 999, name: "Fantôme".to_string(), description: None };
        assert!(RoleManager::update(&db, ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_membership_roles_exclude_admin() {
        let db = test_connection().await;
        seed_role(&db, "Admin").await;
        seed_role(&db, "Membre").await;
        seed_role(&db, "Partenaire").await;

        let roles = membership_roles(RoleManager::find_all(&db).await.unwrap());
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Membre", "Partenaire"]);
    }
}
