use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::{full_update, updated};
use crate::error::DataAccessError;
use crate::models::membership::{self, Column as MembershipColumn, Entity as Membership};

pub struct MembershipManager;

impl MembershipManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_membership: membership::ActiveModel,
    ) -> Result<membership::Model, DataAccessError> {
        new_membership
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create membership", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        membership_id: i32,
    ) -> Result<Option<membership::Model>, DataAccessError> {
        Membership::find_by_id(membership_id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find membership by id", e))
    }

    /// Recherche exacte par email (sert aussi de contrôle d'unicité à l'adhésion)
    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> Result<Option<membership::Model>, DataAccessError> {
        Membership::find()
            .filter(MembershipColumn::Email.eq(email))
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find membership by email", e))
    }

    pub async fn find_by_phone<C: ConnectionTrait>(
        db: &C,
        phone: &str,
    ) -> Result<Option<membership::Model>, DataAccessError> {
        Membership::find()
            .filter(MembershipColumn::Phone.eq(phone))
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find membership by phone", e))
    }

    pub async fn find_by_role_id<C: ConnectionTrait>(
        db: &C,
        role_id: i32,
    ) -> Result<Vec<membership::Model>, DataAccessError> {
        Membership::find()
            .filter(MembershipColumn::RoleId.eq(role_id))
            .order_by_asc(MembershipColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find memberships by role", e))
    }

    pub async fn find_all<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<membership::Model>, DataAccessError> {
        Membership::find()
            .order_by_asc(MembershipColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find all memberships", e))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        membership: membership::Model,
    ) -> Result<Option<membership::Model>, DataAccessError> {
        let active_model: membership::ActiveModel = membership.into();
        updated(full_update(active_model).update(db).await, "update membership")
    }

    pub async fn delete<C: ConnectionTrait>(
        db: &C,
        membership_id: i32,
    ) -> Result<bool, DataAccessError> {
        Membership::delete_by_id(membership_id)
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("delete membership", e))
    }
}
