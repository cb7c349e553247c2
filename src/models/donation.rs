use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub membership_id: Option<i32>, // NULL si don anonyme ou non-membre
    pub amount: f64,                // en euros (unités majeures)
    pub donation_date: DateTime,
    pub message: Option<String>,
    pub anonymous: bool,
    pub last_name: Option<String>,
    pub first_name: Option<String>,

    // Identifiant du paiement chez le prestataire (payment intent Stripe
    // ou checkout intent HelloAsso). Empêche d'enregistrer deux fois le même don.
    #[serde(skip_serializing)]
    pub payment_reference: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::membership::Entity",
        from = "Column::MembershipId",
        to = "super::membership::Column::Id"
    )]
    Membership,
}

impl Related<super::membership::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Membership.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
