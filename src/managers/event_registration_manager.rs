use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use super::{full_update, updated};
use crate::error::DataAccessError;
use crate::models::event_registration::{
    self, Column as RegistrationColumn, Entity as EventRegistration,
};

pub struct EventRegistrationManager;

impl EventRegistrationManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_registration: event_registration::ActiveModel,
    ) -> Result<event_registration::Model, DataAccessError> {
        new_registration
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create event registration", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        registration_id: i32,
    ) -> Result<Option<event_registration::Model>, DataAccessError> {
        EventRegistration::find_by_id(registration_id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find event registration by id", e))
    }

    pub async fn find_by_event_id<C: ConnectionTrait>(
        db: &C,
        event_id: i32,
    ) -> Result<Vec<event_registration::Model>, DataAccessError> {
        EventRegistration::find()
            .filter(RegistrationColumn::EventId.eq(event_id))
            .order_by_asc(RegistrationColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find registrations by event", e))
    }

    pub async fn find_by_membership_id<C: ConnectionTrait>(
        db: &C,
        membership_id: i32,
    ) -> Result<Vec<event_registration::Model>, DataAccessError> {
        EventRegistration::find()
            .filter(RegistrationColumn::MembershipId.eq(membership_id))
            .order_by_asc(RegistrationColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find registrations by membership", e))
    }

    /// Inscription existante d'un membre à un événement précis
    pub async fn find_by_event_and_membership<C: ConnectionTrait>(
        db: &C,
        event_id: i32,
        membership_id: i32,
    ) -> Result<Option<event_registration::Model>, DataAccessError> {
        EventRegistration::find()
            .filter(RegistrationColumn::EventId.eq(event_id))
            .filter(RegistrationColumn::MembershipId.eq(membership_id))
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find registration by event and membership", e))
    }

    pub async fn count_by_event_id<C: ConnectionTrait>(
        db: &C,
        event_id: i32,
    ) -> Result<u64, DataAccessError> {
        EventRegistration::find()
            .filter(RegistrationColumn::EventId.eq(event_id))
            .count(db)
            .await
            .map_err(|e| DataAccessError::log("count registrations by event", e))
    }

    pub async fn find_all<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<event_registration::Model>, DataAccessError> {
        EventRegistration::find()
            .order_by_asc(RegistrationColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find all event registrations", e))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        registration: event_registration::Model,
    ) -> Result<Option<event_registration::Model>, DataAccessError> {
        let active_model: event_registration::ActiveModel = registration.into();
        updated(full_update(active_model).update(db).await, "update event registration")
    }

    pub async fn delete<C: ConnectionTrait>(
        db: &C,
        registration_id: i32,
    ) -> Result<bool, DataAccessError> {
        EventRegistration::delete_by_id(registration_id)
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("delete event registration", e))
    }
}
