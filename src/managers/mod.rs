// ============================================================================
// MANAGERS - ACCÈS AUX DONNÉES
// ============================================================================
//
// Description:
//   Un manager par entité. Chaque manager possède le cycle de vie SQL de son
//   entité (create / find / update / delete) et renvoie des modèles SeaORM.
//
// Contrat commun:
//   - create(ActiveModel) -> Model avec id attribué
//   - find_by_id(id) -> Option<Model>
//   - find_all() -> Vec<Model>
//   - update(Model) -> Option<Model> (None si l'id n'existe pas)
//   - delete(id) -> bool
//
// Points d'attention:
//   - Les fonctions acceptent tout ConnectionTrait: le pool ou une transaction
//   - Toute DbErr est journalisée puis remplacée par un DataAccessError
//     générique (le texte du driver ne sort jamais du manager)
//   - Contrat complet par entité, y compris les fonctions qu'aucun
//     contrôleur n'appelle encore (allow(dead_code))
//   - resource et document ne sont pas réexportés: aucune page ne les sert
//
// ============================================================================

use sea_orm::{ActiveModelTrait, DbErr};

use crate::error::DataAccessError;

#[allow(dead_code)]
pub mod document_manager;
#[allow(dead_code)]
pub mod donation_manager;
#[allow(dead_code)]
pub mod event_manager;
#[allow(dead_code)]
pub mod event_registration_manager;
#[allow(dead_code)]
pub mod membership_manager;
#[allow(dead_code)]
pub mod message_manager;
#[allow(dead_code)]
pub mod news_manager;
pub mod pending_donation_manager;
#[allow(dead_code)]
pub mod resource_manager;
#[allow(dead_code)]
pub mod role_manager;
#[allow(dead_code)]
pub mod user_manager;

pub use donation_manager::DonationManager;
pub use event_manager::EventManager;
pub use event_registration_manager::EventRegistrationManager;
pub use membership_manager::MembershipManager;
pub use message_manager::MessageManager;
pub use news_manager::NewsManager;
pub use pending_donation_manager::PendingDonationManager;
pub use role_manager::RoleManager;
pub use user_manager::UserManager;

/// Prépare un ActiveModel pour un UPDATE complet: toutes les colonnes passent à Set
pub(crate) fn full_update<A: ActiveModelTrait>(active_model: A) -> A {
    active_model.reset_all()
}

/// Un UPDATE qui ne touche aucune ligne signifie "id inconnu", pas une erreur
pub(crate) fn updated<M>(
    result: Result<M, DbErr>,
    operation: &'static str,
) -> Result<Option<M>, DataAccessError> {
    match result {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Ok(None),
        Err(e) => Err(DataAccessError::log(operation, e)),
    }
}
