// fixtures partagées par les tests (compilé uniquement avec cfg(test))

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use sea_orm::{DatabaseConnection, Set};

use crate::managers::{
    DonationManager, EventManager, EventRegistrationManager, MembershipManager, MessageManager,
    NewsManager, PendingDonationManager, RoleManager, UserManager,
};
use crate::models::message::STATUS_NEW;
use crate::models::{
    donation, event, event_registration, membership, message, news, pending_donation, role, users,
};
use crate::services::payments::{
    CardIntent, CardPaymentProvider, CardPaymentState, CheckoutIntent, CheckoutProvider, CheckoutRequest,
    PaymentError, PaymentStatus,
};
use crate::state::AppState;
use crate::utils::csrf::CsrfTokenManager;
use crate::utils::password::hash_password;
use crate::views::{ViewError, ViewRenderer};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_CSRF_SECRET: &str = "test-csrf-secret";

/// Date fixe à 10h00
pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

pub async fn seed_role(db: &DatabaseConnection, name: &str) -> role::Model {
    RoleManager::create(
        db,
        role::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn seed_membership(db: &DatabaseConnection, role_id: i32, email: &str) -> membership::Model {
    MembershipManager::create(
        db,
        membership::ActiveModel {
            civility: Set("Mme".to_string()),
            role_id: Set(role_id),
            first_name: Set("Alice".to_string()),
            last_name: Set("Martin".to_string()),
            email: Set(email.to_string()),
            phone: Set("0601020304".to_string()),
            address: Set("1 rue de la Paix".to_string()),
            postal_code: Set("75001".to_string()),
            created_at: Set(at(2024, 1, 1)),
            logo: Set(None),
            company_name: Set(None),
            membership_fee: Set(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn seed_event(db: &DatabaseConnection, title: &str, seats: i32, start: NaiveDateTime) -> event::Model {
    EventManager::create(
        db,
        event::ActiveModel {
            title: Set(title.to_string()),
            description: Set(format!("Description de {}", title)),
            start_date: Set(start),
            end_date: Set(start + Duration::hours(3)),
            location: Set("Salle des fêtes".to_string()),
            organizer: Set("Le bureau".to_string()),
            seats_available: Set(seats),
            image: Set(None),
            video: Set(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn seed_registration(
    db: &DatabaseConnection,
    event_id: i32,
    membership_id: Option<i32>,
) -> event_registration::Model {
    EventRegistrationManager::create(
        db,
        event_registration::ActiveModel {
            event_id: Set(event_id),
            membership_id: Set(membership_id),
            registration_date: Set(at(2025, 1, 1)),
            first_name: Set("Bob".to_string()),
            last_name: Set("Durand".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn seed_donation(
    db: &DatabaseConnection,
    amount: f64,
    date: NaiveDateTime,
    reference: Option<&str>,
) -> donation::Model {
    DonationManager::create(
        db,
        donation::ActiveModel {
            membership_id: Set(None),
            amount: Set(amount),
            donation_date: Set(date),
            message: Set(None),
            anonymous: Set(false),
            last_name: Set(Some("Durand".to_string())),
            first_name: Set(Some("Bob".to_string())),
            payment_reference: Set(reference.map(str::to_string)),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn seed_news(db: &DatabaseConnection, title: &str, published: NaiveDateTime) -> news::Model {
    NewsManager::create(
        db,
        news::ActiveModel {
            title: Set(title.to_string()),
            content: Set(format!("Contenu de {}", title)),
            image: Set(None),
            video: Set(None),
            publication_date: Set(published),
            update_date: Set(None),
            excerpt: Set(format!("Résumé de {}", title)),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn seed_message(db: &DatabaseConnection, email: &str) -> message::Model {
    MessageManager::create(
        db,
        message::ActiveModel {
            name: Set("Claire".to_string()),
            email: Set(email.to_string()),
            subject: Set("Question".to_string()),
            message: Set("Bonjour".to_string()),
            status: Set(STATUS_NEW.to_string()),
            created_at: Set(at(2025, 2, 1)),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn seed_user(db: &DatabaseConnection, role_id: i32, email: &str, password: &str) -> users::Model {
    UserManager::create(
        db,
        users::ActiveModel {
            last_name: Set("Admin".to_string()),
            first_name: Set("Super".to_string()),
            email: Set(email.to_string()),
            role_id: Set(role_id),
            password_hash: Set(hash_password(password).unwrap()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn seed_pending_donation(
    db: &DatabaseConnection,
    nonce: &str,
    expires_at: NaiveDateTime,
) -> pending_donation::Model {
    PendingDonationManager::create(
        db,
        pending_donation::ActiveModel {
            nonce: Set(nonce.to_string()),
            checkout_intent_id: Set(None),
            amount: Set(10.0),
            anonymous: Set(false),
            is_member: Set(false),
            membership_email: Set(None),
            first_name: Set(Some("Bob".to_string())),
            last_name: Set(Some("Durand".to_string())),
            message: Set(None),
            expires_at: Set(expires_at),
            used: Set(false),
            created_at: Set(expires_at - Duration::hours(1)),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

/// Renderer de test: "<template>" suivi du contexte JSON
#[derive(Default)]
pub struct RecordingRenderer {
    rendered: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    pub fn templates(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

impl ViewRenderer for RecordingRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, ViewError> {
        self.rendered.lock().unwrap().push(template.to_string());
        Ok(format!("<{}>{}", template, context))
    }
}

/// Faux Stripe: statut fixe, montant débité connu par intent
pub struct FakeCardProvider {
    status: PaymentStatus,
    create_calls: AtomicUsize,
    last_amount: Mutex<Option<i64>>,
    charged: Mutex<HashMap<String, i64>>,
    delay: Option<std::time::Duration>,
}

impl FakeCardProvider {
    pub fn with_status(status: PaymentStatus) -> Self {
        Self {
            status,
            create_calls: AtomicUsize::new(0),
            last_amount: Mutex::new(None),
            charged: Mutex::new(HashMap::new()),
            delay: None,
        }
    }

    /// Relecture du statut ralentie, pour faire se croiser deux retours
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Montant débité annoncé pour ce PaymentIntent
    pub fn charge(&self, intent_id: &str, amount_minor_units: i64) {
        self.charged
            .lock()
            .unwrap()
            .insert(intent_id.to_string(), amount_minor_units);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn last_amount(&self) -> Option<i64> {
        *self.last_amount.lock().unwrap()
    }
}

#[async_trait]
impl CardPaymentProvider for FakeCardProvider {
    async fn create_intent(&self, amount_minor_units: i64, _currency: &str) -> Result<CardIntent, PaymentError> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_amount.lock().unwrap() = Some(amount_minor_units);
        let id = format!("pi_{}", n);
        self.charge(&id, amount_minor_units);
        Ok(CardIntent {
            client_secret: format!("{}_secret", id),
            id,
        })
    }

    async fn intent_status(&self, intent_id: &str) -> Result<CardPaymentState, PaymentError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let amount = self.charged.lock().unwrap().get(intent_id).copied();
        match amount {
            Some(amount_minor_units) => Ok(CardPaymentState {
                status: self.status.clone(),
                amount_minor_units,
            }),
            None => Err(PaymentError::Api {
                status: 404,
                body: format!("No such payment_intent: '{}'", intent_id),
            }),
        }
    }
}

/// Faux HelloAsso: garde la dernière requête de checkout
pub struct FakeCheckoutProvider {
    status: PaymentStatus,
    requests: Mutex<Vec<CheckoutRequest>>,
}

impl FakeCheckoutProvider {
    pub fn with_status(status: PaymentStatus) -> Self {
        Self {
            status,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> Option<CheckoutRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CheckoutProvider for FakeCheckoutProvider {
    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutIntent, PaymentError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        let id = (1000 + requests.len()).to_string();
        Ok(CheckoutIntent {
            redirect_url: format!("https://checkout.test/{}", id),
            id,
        })
    }

    async fn checkout_status(&self, _checkout_intent_id: &str) -> Result<PaymentStatus, PaymentError> {
        Ok(self.status.clone())
    }
}

/// AppState de test avec renderer et prestataires factices
pub struct TestApp {
    pub state: AppState,
    pub views: Arc<RecordingRenderer>,
    pub card: Arc<FakeCardProvider>,
    pub checkout: Arc<FakeCheckoutProvider>,
}

pub fn test_app(db: DatabaseConnection) -> TestApp {
    test_app_with(db, PaymentStatus::Succeeded)
}

pub fn test_app_with(db: DatabaseConnection, provider_status: PaymentStatus) -> TestApp {
    let views = Arc::new(RecordingRenderer::default());
    let card = Arc::new(FakeCardProvider::with_status(provider_status.clone()));
    let checkout = Arc::new(FakeCheckoutProvider::with_status(provider_status));

    let state = AppState {
        db,
        views: views.clone(),
        csrf: CsrfTokenManager::new(TEST_CSRF_SECRET).unwrap(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        public_base_url: "https://asso.test".to_string(),
        card_payments: card.clone(),
        checkout: checkout.clone(),
    };

    TestApp { state, views, card, checkout }
}

/// Réponse lue en entier, pour les tests du routeur
pub struct Sent {
    pub status: actix_web::http::StatusCode,
    pub headers: actix_web::http::header::HeaderMap,
    pub body: String,
}

impl Sent {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(actix_web::http::header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

/// Envoie une requête au routeur complet
pub async fn send(state: &AppState, req: actix_web::test::TestRequest) -> Sent {
    use actix_web::{test, web, App};

    let service = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(crate::routes::configure_routes),
    )
    .await;
    let response = test::call_service(&service, req.to_request()).await;
    let status = response.status();
    let headers = response.headers().clone();
    let body = test::read_body(response).await;

    Sent {
        status,
        headers,
        body: String::from_utf8(body.to_vec()).unwrap(),
    }
}

/// Cookie de session pour un utilisateur du rôle donné
pub fn admin_cookie(user_id: i32, role: &str) -> actix_web::cookie::Cookie<'static> {
    let token = crate::utils::jwt::generate_token(TEST_JWT_SECRET, user_id, "admin@asso.fr", role).unwrap();
    actix_web::cookie::Cookie::new(crate::middleware::auth::AUTH_COOKIE, token)
}

/// Jeton CSRF valide pour l'état de test
pub fn csrf_token(state: &AppState) -> String {
    state.csrf.generate_token()
}

/// POST urlencoded sur une route
pub fn post_form(route: &str, fields: &[(&str, &str)]) -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::post()
        .uri(&format!("/index.php?route={}", route))
        .insert_header((actix_web::http::header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(serde_urlencoded::to_string(fields).unwrap())
}
