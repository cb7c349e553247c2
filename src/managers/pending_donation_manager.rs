use chrono::NaiveDateTime;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::error::DataAccessError;
use crate::models::pending_donation::{self, Column as PendingColumn, Entity as PendingDonation};

pub struct PendingDonationManager;

impl PendingDonationManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        pending: pending_donation::ActiveModel,
    ) -> Result<pending_donation::Model, DataAccessError> {
        pending
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create pending donation", e))
    }

    pub async fn find_by_nonce<C: ConnectionTrait>(
        db: &C,
        nonce: &str,
    ) -> Result<Option<pending_donation::Model>, DataAccessError> {
        PendingDonation::find()
            .filter(PendingColumn::Nonce.eq(nonce))
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find pending donation by nonce", e))
    }

    /// Rattache l'id du checkout intent HelloAsso une fois celui-ci créé
    pub async fn attach_checkout_intent<C: ConnectionTrait>(
        db: &C,
        pending_id: i32,
        checkout_intent_id: &str,
    ) -> Result<bool, DataAccessError> {
        PendingDonation::update_many()
            .col_expr(PendingColumn::CheckoutIntentId, Expr::value(checkout_intent_id))
            .filter(PendingColumn::Id.eq(pending_id))
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("attach checkout intent", e))
    }

    /// Consomme le nonce. Renvoie false s'il a déjà été utilisé:
    /// le filtre used = false rend l'opération sûre face à deux retours simultanés.
    pub async fn mark_used<C: ConnectionTrait>(
        db: &C,
        pending_id: i32,
    ) -> Result<bool, DataAccessError> {
        PendingDonation::update_many()
            .col_expr(PendingColumn::Used, Expr::value(true))
            .filter(PendingColumn::Id.eq(pending_id))
            .filter(PendingColumn::Used.eq(false))
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("mark pending donation used", e))
    }

    /// Supprime les formulaires expirés jamais revenus de HelloAsso
    pub async fn delete_expired<C: ConnectionTrait>(
        db: &C,
        now: NaiveDateTime,
    ) -> Result<u64, DataAccessError> {
        PendingDonation::delete_many()
            .filter(PendingColumn::ExpiresAt.lt(now))
            .exec(db)
            .await
            .map(|result| result.rows_affected)
            .map_err(|e| DataAccessError::log("delete expired pending donations", e))
    }
}
