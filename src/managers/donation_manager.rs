use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::{full_update, updated};
use crate::error::DataAccessError;
use crate::models::donation::{self, Column as DonationColumn, Entity as Donation};

pub struct DonationManager;

impl DonationManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_donation: donation::ActiveModel,
    ) -> Result<donation::Model, DataAccessError> {
        new_donation
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create donation", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        donation_id: i32,
    ) -> Result<Option<donation::Model>, DataAccessError> {
        Donation::find_by_id(donation_id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find donation by id", e))
    }

    /// Identifiant du paiement chez le prestataire (PaymentIntent ou checkout intent)
    pub async fn find_by_payment_reference<C: ConnectionTrait>(
        db: &C,
        payment_reference: &str,
    ) -> Result<Option<donation::Model>, DataAccessError> {
        Donation::find()
            .filter(DonationColumn::PaymentReference.eq(payment_reference))
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find donation by payment reference", e))
    }

    pub async fn find_by_membership_id<C: ConnectionTrait>(
        db: &C,
        membership_id: i32,
    ) -> Result<Vec<donation::Model>, DataAccessError> {
        Donation::find()
            .filter(DonationColumn::MembershipId.eq(membership_id))
            .order_by_desc(DonationColumn::DonationDate)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find donations by membership", e))
    }

    /// Dons du plus récent au plus ancien
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<donation::Model>, DataAccessError> {
        Donation::find()
            .order_by_desc(DonationColumn::DonationDate)
            .order_by_desc(DonationColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find all donations", e))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        donation: donation::Model,
    ) -> Result<Option<donation::Model>, DataAccessError> {
        let active_model: donation::ActiveModel = donation.into();
        updated(full_update(active_model).update(db).await, "update donation")
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, donation_id: i32) -> Result<bool, DataAccessError> {
        Donation::delete_by_id(donation_id)
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("delete donation", e))
    }
}
