// ============================================================================
// MODÈLE : MEMBERSHIPS
// ============================================================================
//
// Description:
//   Adhésion d'un membre ou d'un partenaire de l'association.
//   Distinct d'un User (compte de connexion admin).
//
// Points d'attention:
//   - L'email est unique en pratique, mais l'unicité est vérifiée par
//     l'application (MembershipManager::find_by_email), pas par la BD
//   - logo / company_name ne sont renseignés que pour les partenaires
//   - Pas de suppression dans les parcours observés (création seulement)
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "memberships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub civility: String,
    pub role_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub created_at: DateTime,
    pub logo: Option<String>, // chemin du fichier uploadé
    pub company_name: Option<String>,
    pub membership_fee: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,

    #[sea_orm(has_many = "super::event_registration::Entity")]
    EventRegistration,

    #[sea_orm(has_many = "super::donation::Entity")]
    Donation,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::event_registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventRegistration.def()
    }
}

impl Related<super::donation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
