// ============================================================================
// PAIEMENTS - PRESTATAIRES EXTERNES
// ============================================================================
//
// Deux prestataires interchangeables pour les dons:
//   - CardPaymentProvider: paiement carte direct (Stripe PaymentIntents)
//   - CheckoutProvider: paiement par redirection (HelloAsso checkout intents)
//
// Les contrôleurs ne connaissent que ces traits: en test on injecte des
// faux prestataires, en production les clients reqwest de stripe.rs et
// helloasso.rs.
//
// Montants:
//   - le site manipule des euros (f64)
//   - les API attendent des centimes (i64), voir to_minor_units
//
// ============================================================================

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod helloasso;
pub mod stripe;

pub use helloasso::HelloAssoClient;
pub use stripe::StripeClient;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("payment provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("payment provider response is missing {0}")]
    MissingField(&'static str),
}

/// Statut d'un paiement tel que rapporté par le prestataire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Succeeded,
    Processing,
    RequiresPaymentMethod,
    Other(String),
}

impl PaymentStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "succeeded" => PaymentStatus::Succeeded,
            "processing" => PaymentStatus::Processing,
            "requires_payment_method" => PaymentStatus::RequiresPaymentMethod,
            other => PaymentStatus::Other(other.to_string()),
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, PaymentStatus::Succeeded)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Succeeded => write!(f, "succeeded"),
            PaymentStatus::Processing => write!(f, "processing"),
            PaymentStatus::RequiresPaymentMethod => write!(f, "requires_payment_method"),
            PaymentStatus::Other(code) => write!(f, "{}", code),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardIntent {
    pub id: String,
    pub client_secret: String,
}

/// État d'un PaymentIntent relu chez le prestataire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPaymentState {
    pub status: PaymentStatus,
    /// Montant réellement débité, en centimes
    pub amount_minor_units: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Corps d'un checkout intent HelloAsso (montants en centimes)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub total_amount: i64,
    pub initial_amount: i64,
    pub item_name: String,
    pub back_url: String,
    pub error_url: String,
    pub return_url: String,
    pub contains_donation: bool,
    pub payer: Payer,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct CheckoutIntent {
    pub id: String,
    pub redirect_url: String,
}

#[async_trait]
pub trait CardPaymentProvider: Send + Sync {
    async fn create_intent(
        &self,
        amount_minor_units: i64,
        currency: &str,
    ) -> Result<CardIntent, PaymentError>;

    async fn intent_status(&self, intent_id: &str) -> Result<CardPaymentState, PaymentError>;
}

#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutIntent, PaymentError>;

    async fn checkout_status(&self, checkout_intent_id: &str) -> Result<PaymentStatus, PaymentError>;
}

/// 12.34 € → 1234 centimes
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// 1234 centimes → 12.34 €
pub fn from_minor_units(amount: i64) -> f64 {
    amount as f64 / 100.0
}

/// Client HTTP partagé par les deux prestataires
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(10.0), 1000);
        assert_eq!(to_minor_units(12.345), 1235);
        assert_eq!(to_minor_units(0.1 + 0.2), 30);
        assert_eq!(from_minor_units(2550), 25.5);
    }

    #[test]
    fn test_status_codes() {
        assert!(PaymentStatus::from_code("succeeded").is_succeeded());
        assert_eq!(PaymentStatus::from_code("processing"), PaymentStatus::Processing);
        assert_eq!(
            PaymentStatus::from_code("canceled"),
            PaymentStatus::Other("canceled".to_string())
        );
        assert!(!PaymentStatus::from_code("Succeeded").is_succeeded());
        assert_eq!(PaymentStatus::RequiresPaymentMethod.to_string(), "requires_payment_method");
    }
}
