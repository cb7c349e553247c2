use std::collections::HashMap;

use actix_web::HttpResponse;
use serde_json::json;
use validator::Validate;

use super::{failure, json_response, redirect, RequestContext, ERROR_PAGE_LOCATION};
use crate::error::AppError;
use crate::managers::{DonationManager, MembershipManager};
use crate::models::dto::{CardReturnQuery, CheckoutReturnQuery, CreateHelloAssoRequest, CreateStripeRequest};
use crate::services::donation_service::{parse_amount, DonationDetails, DonationError, DonationService};
use crate::services::payments::from_minor_units;
use crate::utils::validation::{filled, is_truthy};

const INVALID_AMOUNT: &str = "Montant invalide";

/// Montants proposés: 5 € à 5000 € par pas de 5
fn preset_amounts() -> Vec<u32> {
    (1..=1000).map(|step| step * 5).collect()
}

fn provider_failure(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "success": false, "message": message }))
}

pub fn show_donation_form(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render(
        "donationForm.html",
        json!({ "montants": preset_amounts(), "csrfToken": ctx.csrf_token() }),
    )
}

/// POST create-stripe {amount} → {clientSecret}
pub async fn create_stripe(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let request: CreateStripeRequest = match ctx.json() {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "unreadable create-stripe body");
            return Ok(failure(INVALID_AMOUNT));
        }
    };
    if request.validate().is_err() {
        return Ok(failure(INVALID_AMOUNT));
    }

    match DonationService::start_card_payment(ctx.state.card_payments.as_ref(), request.amount).await {
        Ok(intent) => Ok(json_response(json!({ "clientSecret": intent.client_secret }))),
        Err(DonationError::InvalidAmount) => Ok(failure(INVALID_AMOUNT)),
        Err(e) => {
            tracing::error!(error = %e, "card payment intent creation failed");
            Ok(provider_failure("Le paiement n'a pas pu être initialisé"))
        }
    }
}

/// Retour Stripe: le don n'est enregistré que si le PaymentIntent a abouti
pub async fn donation_success(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let query: CardReturnQuery = ctx.query();

    let amount = match parse_amount(query.amount.as_deref()) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(error = %e, "card return without a valid amount");
            return Ok(redirect(ERROR_PAGE_LOCATION));
        }
    };
    let details = DonationDetails {
        amount,
        anonymous: is_truthy(&query.anonymous),
        is_member: is_truthy(&query.is_member),
        membership_email: filled(&query.membership_email).map(str::to_string),
        first_name: filled(&query.first_name).map(str::to_string),
        last_name: filled(&query.last_name).map(str::to_string),
        message: filled(&query.message).map(str::to_string),
    };

    let confirmed = DonationService::confirm_card_payment(
        ctx.db(),
        ctx.state.card_payments.as_ref(),
        query.payment_intent.as_deref(),
        details,
    )
    .await;

    match confirmed {
        Ok(donation) => ctx.render("donationSuccess.html", json!({ "donation": donation })),
        Err(e) => {
            tracing::warn!(error = %e, "card donation not recorded");
            Ok(redirect(ERROR_PAGE_LOCATION))
        }
    }
}

/// POST create-helloasso {totalAmount (centimes), payer, metadata} → {redirectUrl}
pub async fn create_helloasso(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let request: CreateHelloAssoRequest = match ctx.json() {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "unreadable create-helloasso body");
            return Ok(failure(INVALID_AMOUNT));
        }
    };

    let details = DonationDetails {
        amount: from_minor_units(request.total_amount),
        anonymous: request.anonymous,
        is_member: request.is_member,
        membership_email: filled(&request.payer.email).map(str::to_string),
        first_name: filled(&request.payer.first_name).map(str::to_string),
        last_name: filled(&request.payer.last_name).map(str::to_string),
        message: filled(&request.metadata.message).map(str::to_string),
    };

    let started = DonationService::start_checkout(
        ctx.db(),
        ctx.state.checkout.as_ref(),
        &ctx.state.public_base_url,
        details,
    )
    .await;

    match started {
        Ok(intent) => Ok(json_response(json!({ "success": true, "redirectUrl": intent.redirect_url }))),
        Err(DonationError::InvalidAmount) => Ok(failure(INVALID_AMOUNT)),
        Err(DonationError::InvalidEmail) => Ok(failure("Veuillez renseigner une adresse email valide")),
        Err(e) => {
            tracing::error!(error = %e, "checkout intent creation failed");
            Ok(provider_failure("La redirection vers HelloAsso a échoué"))
        }
    }
}

/// Retour HelloAsso (?nonce=&checkoutIntentId=&code=)
pub async fn helloasso_success(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let query: CheckoutReturnQuery = ctx.query();

    let confirmed = DonationService::confirm_checkout(
        ctx.db(),
        ctx.state.checkout.as_ref(),
        filled(&query.nonce),
        filled(&query.checkout_intent_id),
        filled(&query.code),
    )
    .await;

    match confirmed {
        Ok(donation) => ctx.render("donationSuccess.html", json!({ "donation": donation })),
        Err(e) => {
            tracing::warn!(error = %e, "checkout donation not recorded");
            Ok(redirect(ERROR_PAGE_LOCATION))
        }
    }
}

/// Page de remerciement sans paramètres de paiement dans l'URL
pub fn donation_success_clean(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("donationSuccess.html", json!({}))
}

/// Liste des dons (admin), avec le nom des membres donateurs
pub async fn show_donations(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let donations = DonationManager::find_all(ctx.db()).await?;
    if donations.is_empty() {
        return Err(AppError::not_found("no donation recorded"));
    }

    let mut members: HashMap<i32, String> = HashMap::new();
    for membership_id in donations.iter().filter_map(|d| d.membership_id) {
        if members.contains_key(&membership_id) {
            continue;
        }
        if let Some(member) = MembershipManager::find_by_id(ctx.db(), membership_id).await? {
            members.insert(membership_id, format!("{} {}", member.first_name, member.last_name));
        }
    }

    let listed: Vec<serde_json::Value> = donations
        .into_iter()
        .map(|d| {
            let member = d.membership_id.and_then(|id| members.get(&id));
            json!({ "donation": d, "member": member })
        })
        .collect();

    ctx.render("donation.html", json!({ "donations": listed }))
}

#[cfg(test)]
mod tests {
    use super::preset_amounts;
    use crate::db::test_connection;
    use crate::managers::DonationManager;
    use crate::services::payments::PaymentStatus;
    use crate::test_support::{
        admin_cookie, at, seed_donation, seed_membership, seed_role, send, test_app, test_app_with,
    };
    use actix_web::http::{header, StatusCode};
    use actix_web::test::TestRequest;

    fn post_json(route: &str, body: serde_json::Value) -> TestRequest {
        TestRequest::post()
            .uri(&format!("/index.php?route={}", route))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(body.to_string())
    }

    #[test]
    fn test_preset_amounts() {
        let amounts = preset_amounts();
        assert_eq!(amounts.first(), Some(&5));
        assert_eq!(amounts.last(), Some(&5000));
        assert_eq!(amounts.len(), 1000);
    }

    #[actix_web::test]
    async fn test_create_stripe_returns_client_secret() {
        let app = test_app(test_connection().await);
        let res = send(&app.state, post_json("create-stripe", serde_json::json!({ "amount": 12.5 }))).await;

        assert_eq!(res.json()["clientSecret"], "pi_1_secret");
        assert_eq!(app.card.last_amount(), Some(1250));
    }

    #[actix_web::test]
    async fn test_create_stripe_rejects_small_amount_without_provider_call() {
        let app = test_app(test_connection().await);

        let res = send(&app.state, post_json("create-stripe", serde_json::json!({ "amount": 0.5 }))).await;
        assert_eq!(res.json(), serde_json::json!({ "success": false, "message": "Montant invalide" }));

        let res = send(&app.state, post_json("create-stripe", serde_json::json!({ "montant": "beaucoup" }))).await;
        assert_eq!(res.json()["message"], "Montant invalide");
        assert_eq!(app.card.create_calls(), 0);
    }

    #[actix_web::test]
    async fn test_card_return_records_succeeded_payment_once() {
        let app = test_app(test_connection().await);
        let uri = "/?route=donation-success&payment_intent=pi_42&montant-personnalise=20&firstName=Luc&message=Merci";
        app.card.charge("pi_42", 2000);

        let res = send(&app.state, TestRequest::get().uri(uri)).await;
        assert!(res.body.starts_with("<donationSuccess.html>"));
        let res = send(&app.state, TestRequest::get().uri(uri)).await;
        assert!(res.body.starts_with("<donationSuccess.html>"));

        let donations = DonationManager::find_all(&app.state.db).await.unwrap();
        assert_eq!(donations.len(), 1);
        assert_eq!(donations[0].amount, 20.0);
        assert_eq!(donations[0].first_name.as_deref(), Some("Luc"));
        assert_eq!(donations[0].payment_reference.as_deref(), Some("pi_42"));
    }

    #[actix_web::test]
    async fn test_card_return_without_success_redirects_to_error_page() {
        let app = test_app_with(test_connection().await, PaymentStatus::RequiresPaymentMethod);
        let uri = "/?route=donation-success&payment_intent=pi_42&montant-personnalise=20";

        let res = send(&app.state, TestRequest::get().uri(uri)).await;
        assert_eq!(res.status, StatusCode::FOUND);
        assert_eq!(res.location(), Some("/index.php?route=error-page"));
        assert!(DonationManager::find_all(&app.state.db).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_card_return_with_edited_amount_redirects_to_error_page() {
        let app = test_app(test_connection().await);
        app.card.charge("pi_7", 100);
        let uri = "/?route=donation-success&payment_intent=pi_7&montant-personnalise=5000";

        let res = send(&app.state, TestRequest::get().uri(uri)).await;
        assert_eq!(res.status, StatusCode::FOUND);
        assert_eq!(res.location(), Some("/index.php?route=error-page"));
        assert!(DonationManager::find_all(&app.state.db).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_helloasso_round_trip() {
        let app = test_app(test_connection().await);
        let body = serde_json::json!({
            "totalAmount": 2500,
            "payer": { "firstName": "Luc", "lastName": "Petit", "email": "luc@asso.fr" },
            "metadata": { "message": "Pour les ateliers" },
            "anonymous": false,
            "is_member": false
        });

        let res = send(&app.state, post_json("create-helloasso", body)).await;
        assert_eq!(res.json()["redirectUrl"], "https://checkout.test/1001");

        let request = app.checkout.last_request().unwrap();
        assert_eq!(request.total_amount, 2500);
        let nonce = request.return_url.rsplit('=').next().unwrap().to_string();

        let uri = format!(
            "/?route=helloasso-success&nonce={}&checkoutIntentId=1001&code=succeeded",
            nonce
        );
        let res = send(&app.state, TestRequest::get().uri(&uri)).await;
        assert!(res.body.starts_with("<donationSuccess.html>"));

        let donations = DonationManager::find_all(&app.state.db).await.unwrap();
        assert_eq!(donations.len(), 1);
        assert_eq!(donations[0].amount, 25.0);
        assert_eq!(donations[0].message.as_deref(), Some("Pour les ateliers"));
    }

    #[actix_web::test]
    async fn test_helloasso_rejections() {
        let app = test_app(test_connection().await);

        let res = send(&app.state, post_json("create-helloasso", serde_json::json!({ "totalAmount": 50 }))).await;
        assert_eq!(res.json()["message"], "Montant invalide");
        assert!(app.checkout.last_request().is_none());

        let uri = "/?route=helloasso-success&nonce=inconnu&checkoutIntentId=1001&code=succeeded";
        let res = send(&app.state, TestRequest::get().uri(uri)).await;
        assert_eq!(res.location(), Some("/index.php?route=error-page"));
        assert!(DonationManager::find_all(&app.state.db).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_donations_listing() {
        let app = test_app(test_connection().await);
        let admin = admin_cookie(1, "Admin");

        let res = send(&app.state, TestRequest::get().uri("/?route=donations").cookie(admin.clone())).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(res.body.starts_with("<errorPage.html>"));

        let role = seed_role(&app.state.db, "Membre").await;
        let member = seed_membership(&app.state.db, role.id, "alice@asso.fr").await;
        let donation = seed_donation(&app.state.db, 30.0, at(2025, 3, 1), Some("pi_9")).await;
        let mut linked = donation.clone();
        linked.membership_id = Some(member.id);
        DonationManager::update(&app.state.db, linked).await.unwrap();

        let res = send(&app.state, TestRequest::get().uri("/?route=donations").cookie(admin)).await;
        assert!(res.body.starts_with("<donation.html>"));
        assert!(res.body.contains("Alice Martin"));
        assert!(!res.body.contains("pi_9"));
    }

    #[actix_web::test]
    async fn test_donation_form_and_clean_page() {
        let app = test_app(test_connection().await);

        let res = send(&app.state, TestRequest::get().uri("/?route=donation-form")).await;
        assert!(res.body.starts_with("<donationForm.html>"));
        assert!(res.body.contains("5000"));

        let res = send(&app.state, TestRequest::get().uri("/?route=donation-success-clean")).await;
        assert!(res.body.starts_with("<donationSuccess.html>"));
    }
}
