use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::{full_update, updated, EventRegistrationManager};
use crate::error::DataAccessError;
use crate::models::event::{self, Column as EventColumn, Entity as Event};

pub struct EventManager;

impl EventManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_event: event::ActiveModel,
    ) -> Result<event::Model, DataAccessError> {
        new_event
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create event", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        event_id: i32,
    ) -> Result<Option<event::Model>, DataAccessError> {
        Event::find_by_id(event_id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find event by id", e))
    }

    pub async fn find_by_end_date<C: ConnectionTrait>(
        db: &C,
        end_date: NaiveDateTime,
    ) -> Result<Option<event::Model>, DataAccessError> {
        Event::find()
            .filter(EventColumn::EndDate.eq(end_date))
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find event by end date", e))
    }

    /// Événement dont la date de début est la plus récente (page d'accueil)
    pub async fn find_latest<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Option<event::Model>, DataAccessError> {
        Event::find()
            .order_by_desc(EventColumn::StartDate)
            .order_by_desc(EventColumn::Id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find latest event", e))
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<event::Model>, DataAccessError> {
        Event::find()
            .order_by_asc(EventColumn::StartDate)
            .order_by_asc(EventColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find all events", e))
    }

    /// Places restantes = capacité - inscriptions existantes (jamais stocké)
    pub async fn remaining_seats<C: ConnectionTrait>(
        db: &C,
        event: &event::Model,
    ) -> Result<i64, DataAccessError> {
        let registered = EventRegistrationManager::count_by_event_id(db, event.id).await?;
        Ok(i64::from(event.seats_available) - registered as i64)
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        event: event::Model,
    ) -> Result<Option<event::Model>, DataAccessError> {
        let active_model: event::ActiveModel = event.into();
        updated(full_update(active_model).update(db).await, "update event")
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, event_id: i32) -> Result<bool, DataAccessError> {
        Event::delete_by_id(event_id)
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("delete event", e))
    }
}
