use async_trait::async_trait;
use serde::Deserialize;

use super::{CardIntent, CardPaymentProvider, CardPaymentState, PaymentError, PaymentStatus};
use crate::config::StripeConfig;

/// Client minimal de l'API Stripe PaymentIntents
pub struct StripeClient {
    client: reqwest::Client,
    config: StripeConfig,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: Option<String>,
    client_secret: Option<String>,
    status: Option<String>,
    amount: Option<i64>,
}

impl PaymentIntentResponse {
    fn into_state(self) -> Result<CardPaymentState, PaymentError> {
        let status = self.status.ok_or(PaymentError::MissingField("status"))?;
        Ok(CardPaymentState {
            status: PaymentStatus::from_code(&status),
            amount_minor_units: self.amount.ok_or(PaymentError::MissingField("amount"))?,
        })
    }
}

impl StripeClient {
    pub fn new(client: reqwest::Client, config: StripeConfig) -> Self {
        Self { client, config }
    }

    fn intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.config.api_base.trim_end_matches('/'))
    }

    async fn read_intent(response: reqwest::Response) -> Result<PaymentIntentResponse, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api { status: status.as_u16(), body });
        }
        Ok(response.json::<PaymentIntentResponse>().await?)
    }
}

#[async_trait]
impl CardPaymentProvider for StripeClient {
    async fn create_intent(
        &self,
        amount_minor_units: i64,
        currency: &str,
    ) -> Result<CardIntent, PaymentError> {
        let amount = amount_minor_units.to_string();
        let response = self
            .client
            .post(self.intents_url())
            .bearer_auth(&self.config.secret_key)
            .form(&[("amount", amount.as_str()), ("currency", currency)])
            .send()
            .await?;

        let intent = Self::read_intent(response).await?;
        tracing::info!(intent_id = ?intent.id, amount_minor_units, "stripe payment intent created");

        Ok(CardIntent {
            id: intent.id.ok_or(PaymentError::MissingField("id"))?,
            client_secret: intent
                .client_secret
                .ok_or(PaymentError::MissingField("client_secret"))?,
        })
    }

    async fn intent_status(&self, intent_id: &str) -> Result<CardPaymentState, PaymentError> {
        let response = self
            .client
            .get(format!("{}/{}", self.intents_url(), intent_id))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        Self::read_intent(response).await?.into_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intents_url_ignores_trailing_slash() {
        let client = StripeClient::new(
            reqwest::Client::new(),
            StripeConfig {
                secret_key: "sk_test".to_string(),
                api_base: "https://api.stripe.com/".to_string(),
            },
        );
        assert_eq!(client.intents_url(), "https://api.stripe.com/v1/payment_intents");
    }

    #[test]
    fn test_intent_response_tolerates_missing_fields() {
        let intent: PaymentIntentResponse =
            serde_json::from_str(r#"{"id":"pi_1","status":"succeeded","object":"payment_intent"}"#)
                .unwrap();
        assert_eq!(intent.id.as_deref(), Some("pi_1"));
        assert!(intent.client_secret.is_none());
        assert_eq!(intent.status.as_deref(), Some("succeeded"));
        assert!(matches!(intent.into_state(), Err(PaymentError::MissingField("amount"))));
    }

    #[test]
    fn test_intent_state_carries_charged_amount() {
        let intent: PaymentIntentResponse = serde_json::from_str(
            r#"{"id":"pi_1","status":"succeeded","amount":100,"currency":"eur"}"#,
        )
        .unwrap();
        let state = intent.into_state().unwrap();
        assert_eq!(state.status, PaymentStatus::Succeeded);
        assert_eq!(state.amount_minor_units, 100);
    }
}
