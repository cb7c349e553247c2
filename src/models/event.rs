use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub start_date: DateTime,
    pub end_date: DateTime,
    pub location: String,
    pub organizer: String,

    // Capacité statique, jamais décrémentée.
    // Places restantes = seats_available - nombre d'inscriptions (calculé à la demande)
    pub seats_available: i32,

    pub image: Option<String>,
    pub video: Option<String>, // URL YouTube au format embed
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event_registration::Entity")]
    EventRegistration,
}

impl Related<super::event_registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventRegistration.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
