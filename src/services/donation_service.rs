// ============================================================================
// SERVICE : DONS
// ============================================================================
//
// Deux parcours de paiement, une seule réconciliation:
//
//   Carte (Stripe)
//     1. start_card_payment: montant >= 1 €, création du PaymentIntent
//     2. le navigateur confirme le paiement puis revient sur donation-success
//     3. confirm_card_payment: statut et montant relus chez Stripe, don enregistré
//
//   Redirection (HelloAsso)
//     1. start_checkout: formulaire mis de côté dans pending_donations (nonce)
//     2. redirection vers HelloAsso, retour sur helloasso-success
//     3. confirm_checkout: nonce valide, statut relu chez HelloAsso, don enregistré
//
// Règles communes:
//   - Un don n'existe en base que si le prestataire annonce "succeeded"
//   - Un même paiement (payment_reference) ne crée jamais deux dons
//   - Email de membre inconnu: le don est enregistré sans membership_id
//
// ============================================================================

use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use thiserror::Error;
use uuid::Uuid;

use crate::error::DataAccessError;
use crate::managers::{DonationManager, MembershipManager, PendingDonationManager};
use crate::models::{donation, pending_donation};
use crate::services::payments::{
    to_minor_units, CardIntent, CardPaymentProvider, CheckoutIntent, CheckoutProvider,
    CheckoutRequest, Payer, PaymentError, PaymentStatus,
};
use crate::utils::validation::is_valid_email;

/// Don minimum, en euros
pub const MIN_DONATION: f64 = 1.0;
const CURRENCY: &str = "eur";
const PENDING_TTL_HOURS: i64 = 1;
const ITEM_NAME: &str = "Don à l'association";

#[derive(Debug, Error)]
pub enum DonationError {
    #[error("invalid donation amount")]
    InvalidAmount,

    #[error("missing payment reference")]
    MissingReference,

    #[error("invalid membership email")]
    InvalidEmail,

    #[error("payment did not succeed (status: {0})")]
    NotSucceeded(PaymentStatus),

    #[error("unknown donation form")]
    UnknownForm,

    #[error("donation form expired")]
    ExpiredForm,

    #[error("donation form already used")]
    FormAlreadyUsed,

    #[error("checkout intent does not match the donation form")]
    CheckoutMismatch,

    #[error("charged amount ({charged} cents) differs from the announced donation ({announced} cents)")]
    AmountMismatch { charged: i64, announced: i64 },

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}

/// Informations saisies dans le formulaire de don
#[derive(Debug, Clone, Default)]
pub struct DonationDetails {
    pub amount: f64,
    pub anonymous: bool,
    pub is_member: bool,
    pub membership_email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub message: Option<String>,
}

/// Montant saisi ("12.50" ou "12,50") → euros, refusé sous 1 €
pub fn parse_amount(raw: Option<&str>) -> Result<f64, DonationError> {
    let amount = raw
        .map(|value| value.trim().replace(',', "."))
        .and_then(|value| value.parse::<f64>().ok())
        .ok_or(DonationError::InvalidAmount)?;
    validate_amount(amount)?;
    Ok(amount)
}

pub fn validate_amount(amount: f64) -> Result<(), DonationError> {
    if amount.is_finite() && amount >= MIN_DONATION {
        Ok(())
    } else {
        Err(DonationError::InvalidAmount)
    }
}

fn validate_details(details: &DonationDetails) -> Result<(), DonationError> {
    validate_amount(details.amount)?;
    if details.is_member {
        if let Some(email) = details.membership_email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !is_valid_email(email.trim()) {
                return Err(DonationError::InvalidEmail);
            }
        }
    }
    Ok(())
}

pub struct DonationService;

impl DonationService {
    /// Crée le PaymentIntent Stripe. Le montant est vérifié avant tout appel.
    pub async fn start_card_payment(
        provider: &dyn CardPaymentProvider,
        amount: f64,
    ) -> Result<CardIntent, DonationError> {
        validate_amount(amount)?;
        Ok(provider.create_intent(to_minor_units(amount), CURRENCY).await?)
    }

    /// Retour de Stripe: enregistre le don si le PaymentIntent a abouti
    pub async fn confirm_card_payment(
        db: &DatabaseConnection,
        provider: &dyn CardPaymentProvider,
        payment_intent_id: Option<&str>,
        details: DonationDetails,
    ) -> Result<donation::Model, DonationError> {
        validate_details(&details)?;
        let reference = payment_intent_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(DonationError::MissingReference)?;

        // Page de succès rechargée: le don existe déjà
        if let Some(existing) = DonationManager::find_by_payment_reference(db, reference).await? {
            return Ok(existing);
        }

        let state = provider.intent_status(reference).await?;
        if !state.status.is_succeeded() {
            tracing::warn!(payment_intent = reference, status = %state.status, "card payment not succeeded");
            return Err(DonationError::NotSucceeded(state.status));
        }

        // Le montant de l'URL doit être celui réellement débité
        let announced = to_minor_units(details.amount);
        if state.amount_minor_units != announced {
            tracing::warn!(
                payment_intent = reference,
                charged = state.amount_minor_units,
                announced,
                "card return amount differs from the payment intent"
            );
            return Err(DonationError::AmountMismatch {
                charged: state.amount_minor_units,
                announced,
            });
        }

        let donation = match Self::record(db, reference, &details).await {
            Ok(donation) => donation,
            // Retour concurrent: l'index unique sur payment_reference a refusé l'insert
            Err(e) => {
                return DonationManager::find_by_payment_reference(db, reference)
                    .await?
                    .ok_or(DonationError::DataAccess(e));
            }
        };
        tracing::info!(donation_id = donation.id, amount = donation.amount, "card donation recorded");
        Ok(donation)
    }

    /// Met le formulaire de côté puis ouvre un checkout intent HelloAsso
    pub async fn start_checkout(
        db: &DatabaseConnection,
        provider: &dyn CheckoutProvider,
        public_base_url: &str,
        details: DonationDetails,
    ) -> Result<CheckoutIntent, DonationError> {
        validate_details(&details)?;

        let now = Utc::now().naive_utc();
        PendingDonationManager::delete_expired(db, now).await?;

        // 1. Formulaire conservé côté serveur, retrouvé par le nonce au retour
        let nonce = Uuid::new_v4().to_string();
        let pending = PendingDonationManager::create(
            db,
            pending_donation::ActiveModel {
                nonce: Set(nonce.clone()),
                checkout_intent_id: Set(None),
                amount: Set(details.amount),
                anonymous: Set(details.anonymous),
                is_member: Set(details.is_member),
                membership_email: Set(details.membership_email.clone()),
                first_name: Set(details.first_name.clone()),
                last_name: Set(details.last_name.clone()),
                message: Set(details.message.clone()),
                expires_at: Set(now + Duration::hours(PENDING_TTL_HOURS)),
                used: Set(false),
                created_at: Set(now),
                ..Default::default()
            },
        )
        .await?;

        // 2. Checkout intent
        let base = public_base_url.trim_end_matches('/');
        let amount = to_minor_units(details.amount);
        let request = CheckoutRequest {
            total_amount: amount,
            initial_amount: amount,
            item_name: ITEM_NAME.to_string(),
            back_url: format!("{}/index.php?route=donation-form", base),
            error_url: format!("{}/index.php?route=error-page", base),
            return_url: format!("{}/index.php?route=helloasso-success&nonce={}", base, nonce),
            contains_donation: true,
            payer: Payer {
                first_name: details.first_name,
                last_name: details.last_name,
                email: details.membership_email,
            },
            metadata: serde_json::json!({ "message": details.message }),
        };
        let intent = provider.create_checkout(&request).await?;

        // 3. Rattachement pour vérifier le retour
        PendingDonationManager::attach_checkout_intent(db, pending.id, &intent.id).await?;
        Ok(intent)
    }

    /// Retour de HelloAsso: nonce + checkoutIntentId + code
    pub async fn confirm_checkout(
        db: &DatabaseConnection,
        provider: &dyn CheckoutProvider,
        nonce: Option<&str>,
        checkout_intent_id: Option<&str>,
        code: Option<&str>,
    ) -> Result<donation::Model, DonationError> {
        let nonce = nonce.filter(|n| !n.is_empty()).ok_or(DonationError::UnknownForm)?;
        let checkout_intent_id = checkout_intent_id
            .filter(|id| !id.is_empty())
            .ok_or(DonationError::MissingReference)?;

        // 1. Formulaire mis de côté
        let pending = PendingDonationManager::find_by_nonce(db, nonce)
            .await?
            .ok_or(DonationError::UnknownForm)?;

        if pending.checkout_intent_id.as_deref() != Some(checkout_intent_id) {
            return Err(DonationError::CheckoutMismatch);
        }
        if pending.used {
            return DonationManager::find_by_payment_reference(db, checkout_intent_id)
                .await?
                .ok_or(DonationError::FormAlreadyUsed);
        }
        if pending.expires_at < Utc::now().naive_utc() {
            return Err(DonationError::ExpiredForm);
        }

        // 2. Statut annoncé dans l'URL puis statut réel chez HelloAsso
        let announced = PaymentStatus::from_code(code.unwrap_or_default());
        if !announced.is_succeeded() {
            tracing::warn!(checkout_intent_id, status = %announced, "checkout returned without success");
            return Err(DonationError::NotSucceeded(announced));
        }
        let status = provider.checkout_status(checkout_intent_id).await?;
        if !status.is_succeeded() {
            tracing::warn!(checkout_intent_id, %status, "checkout not paid");
            return Err(DonationError::NotSucceeded(status));
        }

        // 3. Don + consommation du nonce dans la même transaction
        let details = DonationDetails {
            amount: pending.amount,
            anonymous: pending.anonymous,
            is_member: pending.is_member,
            membership_email: pending.membership_email,
            first_name: pending.first_name,
            last_name: pending.last_name,
            message: pending.message,
        };

        let txn = db
            .begin()
            .await
            .map_err(|e| DataAccessError::log("begin checkout donation", e))?;

        if !PendingDonationManager::mark_used(&txn, pending.id).await? {
            // Retour concurrent déjà traité
            txn.rollback()
                .await
                .map_err(|e| DataAccessError::log("rollback checkout donation", e))?;
            return DonationManager::find_by_payment_reference(db, checkout_intent_id)
                .await?
                .ok_or(DonationError::FormAlreadyUsed);
        }

        let donation = match Self::record(&txn, checkout_intent_id, &details).await {
            Ok(donation) => donation,
            Err(e) => {
                txn.rollback()
                    .await
                    .map_err(|e| DataAccessError::log("rollback checkout donation", e))?;
                return Err(e.into());
            }
        };

        txn.commit()
            .await
            .map_err(|e| DataAccessError::log("commit checkout donation", e))?;

        tracing::info!(donation_id = donation.id, amount = donation.amount, "checkout donation recorded");
        Ok(donation)
    }

    /// Enregistre le don; l'email de membre est résolu en membership_id si possible
    async fn record<C: ConnectionTrait>(
        db: &C,
        payment_reference: &str,
        details: &DonationDetails,
    ) -> Result<donation::Model, DataAccessError> {
        let mut membership_id = None;
        if details.is_member {
            if let Some(email) = details.membership_email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
                membership_id = MembershipManager::find_by_email(db, email).await?.map(|m| m.id);
            }
        }

        DonationManager::create(
            db,
            donation::ActiveModel {
                membership_id: Set(membership_id),
                amount: Set(details.amount),
                donation_date: Set(Utc::now().naive_utc()),
                message: Set(details.message.clone()),
                anonymous: Set(details.anonymous),
                last_name: Set(details.last_name.clone()),
                first_name: Set(details.first_name.clone()),
                payment_reference: Set(Some(payment_reference.to_string())),
                ..Default::default()
            },
        )
        .await
    }
}
