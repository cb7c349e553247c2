use chrono::Utc;
use sea_orm::{DatabaseConnection, DatabaseTransaction, Set, TransactionTrait};
use thiserror::Error;

use crate::error::DataAccessError;
use crate::managers::{EventManager, EventRegistrationManager, MembershipManager};
use crate::models::{event, event_registration};

/// Refus d'inscription. Le texte est renvoyé tel quel au visiteur.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Événement non trouvé")]
    EventNotFound,

    #[error("L'événement est complet, aucune place disponible")]
    EventFull,

    #[error("Veuillez renseigner votre adresse email")]
    MissingEmail,

    #[error("Le membre avec l'email fourni n'existe pas")]
    UnknownMember,

    #[error("Le membre avec cet email est déjà enregistré")]
    AlreadyRegistered,

    #[error("Veuillez renseigner le nom et prénom")]
    MissingName,

    #[error("Échec lors de l'inscription à l'événement")]
    Storage(#[from] DataAccessError),
}

#[derive(Debug, Clone)]
pub enum Participant {
    /// Membre identifié par son email d'adhésion
    Member { email: Option<String> },
    Guest {
        first_name: Option<String>,
        last_name: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub event_id: i32,
    pub participant: Participant,
}

#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub event: event::Model,
    pub registration: event_registration::Model,
}

pub struct EventRegistrationService;

impl EventRegistrationService {
    /// Inscrit un participant à un événement.
    ///
    /// Les vérifications (événement, places restantes, doublon) et l'insertion
    /// partagent une même transaction. Sous READ COMMITTED deux inscriptions
    /// simultanées peuvent encore lire le même nombre de places: l'index unique
    /// (event_id, membership_id) bloque seulement le doublon d'un même membre.
    pub async fn register(
        db: &DatabaseConnection,
        request: RegistrationRequest,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let txn = db
            .begin()
            .await
            .map_err(|e| DataAccessError::log("begin event registration", e))?;

        let outcome = match Self::register_in(&txn, request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                txn.rollback()
                    .await
                    .map_err(|e| DataAccessError::log("rollback event registration", e))?;
                return Err(e);
            }
        };

        txn.commit()
            .await
            .map_err(|e| DataAccessError::log("commit event registration", e))?;

        tracing::info!(
            event_id = outcome.event.id,
            registration_id = outcome.registration.id,
            "event registration created"
        );
        Ok(outcome)
    }

    async fn register_in(
        txn: &DatabaseTransaction,
        request: RegistrationRequest,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        // 1. L'événement doit exister
        let event = EventManager::find_by_id(txn, request.event_id)
            .await?
            .ok_or(RegistrationError::EventNotFound)?;

        // 2. Il doit rester au moins une place
        if EventManager::remaining_seats(txn, &event).await? <= 0 {
            return Err(RegistrationError::EventFull);
        }

        // 3. Identité du participant
        let (membership_id, first_name, last_name) = match request.participant {
            Participant::Member { email } => {
                let email = email
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .ok_or(RegistrationError::MissingEmail)?;

                let member = MembershipManager::find_by_email(txn, &email)
                    .await?
                    .ok_or(RegistrationError::UnknownMember)?;

                let existing =
                    EventRegistrationManager::find_by_event_and_membership(txn, event.id, member.id)
                        .await?;
                if existing.is_some() {
                    return Err(RegistrationError::AlreadyRegistered);
                }

                (Some(member.id), member.first_name, member.last_name)
            }
            Participant::Guest { first_name, last_name } => {
                let first_name = non_empty(first_name).ok_or(RegistrationError::MissingName)?;
                let last_name = non_empty(last_name).ok_or(RegistrationError::MissingName)?;
                (None, first_name, last_name)
            }
        };

        // 4. Enregistrement
        let registration = EventRegistrationManager::create(
            txn,
            event_registration::ActiveModel {
                event_id: Set(event.id),
                membership_id: Set(membership_id),
                registration_date: Set(Utc::now().naive_utc()),
                first_name: Set(first_name),
                last_name: Set(last_name),
                ..Default::default()
            },
        )
        .await?;

        Ok(RegistrationOutcome { event, registration })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
