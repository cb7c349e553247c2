// ============================================================================
// MODÈLE : PENDING DONATIONS
// ============================================================================
//
// Description:
//   Formulaire de don mis de côté pendant la redirection vers HelloAsso.
//   Remplace les données de session: l'état est stocké côté serveur et
//   retrouvé grâce au nonce transmis dans l'URL de retour.
//
// Colonnes de la table pending_donations:
//   - id (INTEGER, PRIMARY KEY)
//   - nonce (VARCHAR, UNIQUE, NOT NULL) - UUID v4
//   - checkout_intent_id (VARCHAR, NULL) - id renvoyé par HelloAsso
//   - amount (DOUBLE, NOT NULL) - en euros
//   - anonymous, is_member (BOOLEAN)
//   - membership_email, first_name, last_name, message (NULL)
//   - expires_at (TIMESTAMP, NOT NULL) - created_at + 1 heure
//   - used (BOOLEAN, DEFAULT FALSE)
//   - created_at (TIMESTAMP)
//
// Workflow:
//   1. POST ?route=create-helloasso: on crée la ligne avec un nonce
//   2. On ouvre le checkout intent avec returnUrl=...&nonce=<nonce>
//   3. HelloAsso redirige vers ?route=helloasso-success&nonce=...&checkoutIntentId=...&code=...
//   4. On vérifie: nonce existe, pas expiré, pas utilisé, même checkout intent
//   5. Le don est enregistré, la ligne passe à used = true
//
// Points d'attention:
//   - Un nonce ne sert qu'une fois (used = true)
//   - Expire après 1 heure
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub nonce: String,

    pub checkout_intent_id: Option<String>,

    pub amount: f64,

    pub anonymous: bool,

    pub is_member: bool,

    pub membership_email: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub message: Option<String>,

    pub expires_at: DateTime,

    pub used: bool,

    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
