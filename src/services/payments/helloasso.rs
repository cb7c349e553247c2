use async_trait::async_trait;
use serde::Deserialize;

use super::{CheckoutIntent, CheckoutProvider, CheckoutRequest, PaymentError, PaymentStatus};
use crate::config::HelloAssoConfig;

/// Client de l'API HelloAsso v5 (authentification client_credentials)
pub struct HelloAssoClient {
    client: reqwest::Client,
    config: HelloAssoConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutIntentResponse {
    id: Option<serde_json::Value>,
    redirect_url: Option<String>,
    order: Option<serde_json::Value>,
}

impl HelloAssoClient {
    pub fn new(client: reqwest::Client, config: HelloAssoConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn checkout_intents_url(&self) -> String {
        self.url(&format!(
            "/v5/organizations/{}/checkout-intents",
            self.config.organization_slug
        ))
    }

    /// Un jeton par opération: les appels sont rares (un don = deux appels)
    async fn access_token(&self) -> Result<String, PaymentError> {
        let response = self
            .client
            .post(self.url("/oauth2/token"))
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let token: TokenResponse = read_json(response).await?;
        token.access_token.ok_or(PaymentError::MissingField("access_token"))
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PaymentError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PaymentError::Api { status: status.as_u16(), body });
    }
    Ok(response.json::<T>().await?)
}

/// L'id d'un checkout intent est numérique côté HelloAsso
fn intent_id(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(id) => Some(id),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Un checkout intent n'a de commande attachée qu'une fois le paiement encaissé
fn status_of(intent: &CheckoutIntentResponse) -> PaymentStatus {
    match &intent.order {
        Some(order) if !order.is_null() => PaymentStatus::Succeeded,
        _ => PaymentStatus::Processing,
    }
}

#[async_trait]
impl CheckoutProvider for HelloAssoClient {
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutIntent, PaymentError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(self.checkout_intents_url())
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let intent: CheckoutIntentResponse = read_json(response).await?;
        let id = intent_id(intent.id).ok_or(PaymentError::MissingField("id"))?;
        let redirect_url = intent
            .redirect_url
            .ok_or(PaymentError::MissingField("redirectUrl"))?;

        tracing::info!(checkout_intent_id = %id, total_amount = request.total_amount, "helloasso checkout intent created");
        Ok(CheckoutIntent { id, redirect_url })
    }

    async fn checkout_status(&self, checkout_intent_id: &str) -> Result<PaymentStatus, PaymentError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(format!("{}/{}", self.checkout_intents_url(), checkout_intent_id))
            .bearer_auth(token)
            .send()
            .await?;

        let intent: CheckoutIntentResponse = read_json(response).await?;
        Ok(status_of(&intent))
    }
}
