use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Statut attribué à un message reçu via le formulaire de contact
pub const STATUS_NEW: &str = "Nouveau";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: String, // étiquette libre: "Nouveau", "Lu", "Traité", ...
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
