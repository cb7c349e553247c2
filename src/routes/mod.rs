// ============================================================================
// ROUTEUR
// ============================================================================
//
// Toutes les pages passent par / ou /index.php avec ?route=<clé>.
// La table ROUTES associe chaque clé à:
//   - une politique de méthode (Any / Post)
//   - un drapeau admin (session JWT avec le rôle Admin exigée)
//   - l'action du contrôleur à appeler
//
// Clé absente ou inconnue → page d'accueil.
// La table est vérifiée au démarrage (clés non vides, pas de doublon).
//
// ============================================================================

pub mod auth;
pub mod contact;
pub mod donation;
pub mod event;
pub mod membership;
pub mod news;
pub mod page;

use std::collections::HashSet;

use actix_web::http::{header, Method};
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::Instrument;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const ERROR_PAGE_LOCATION: &str = "/index.php?route=error-page";
pub const HOME_LOCATION: &str = "/index.php?route=home";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodPolicy {
    Any,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Home,
    AdminHome,
    ErrorPage,
    About,
    LegalPolicy,
    News,
    NewsDetail,
    Memberships,
    Events,
    EventRegistrations,
    Messages,
    MembershipSuccess,
    EventRegistrationSuccess,
    NewsSuccess,
    CsrfToken,
    RegisterForm,
    CheckRegister,
    LoginForm,
    CheckLogin,
    ResetPasswordForm,
    CheckResetPassword,
    MembershipRegister,
    CheckMembershipRegister,
    EventRegistrationForm,
    CheckEventRegistration,
    EventRegister,
    CheckEvent,
    NewsRegister,
    CheckNews,
    CheckContactForm,
    Logout,
    DonationForm,
    CreateStripe,
    DonationSuccess,
    CreateHelloAsso,
    HelloAssoSuccess,
    DonationSuccessClean,
    Donations,
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub key: &'static str,
    pub method: MethodPolicy,
    pub admin: bool,
    pub action: Action,
}

const fn route(key: &'static str, method: MethodPolicy, admin: bool, action: Action) -> Route {
    Route { key, method, admin, action }
}

use Action as A;
use MethodPolicy::{Any, Post};

pub static ROUTES: &[Route] = &[
    // pages
    route("home", Any, false, A::Home),
    route("admin-home", Any, true, A::AdminHome),
    route("error-page", Any, false, A::ErrorPage),
    route("about", Any, false, A::About),
    route("legal-policy", Any, false, A::LegalPolicy),
    route("news", Any, false, A::News),
    route("news-detail", Any, false, A::NewsDetail),
    route("memberships", Any, false, A::Memberships),
    route("events", Any, false, A::Events),
    route("event-registrations", Any, true, A::EventRegistrations),
    route("messages", Any, true, A::Messages),
    route("membership-success", Any, false, A::MembershipSuccess),
    route("event-registration-success", Any, false, A::EventRegistrationSuccess),
    route("news-success", Any, false, A::NewsSuccess),
    route("csrf-token", Any, false, A::CsrfToken),
    // comptes admin
    route("inscription", Any, false, A::RegisterForm),
    route("checkRegister", Post, false, A::CheckRegister),
    route("connexion", Any, false, A::LoginForm),
    route("checkLogin", Post, false, A::CheckLogin),
    route("reset-password", Any, false, A::ResetPasswordForm),
    route("check-reset-password", Post, false, A::CheckResetPassword),
    route("logout", Any, false, A::Logout),
    // adhésions, événements, actualités, contact
    route("membership-register", Any, false, A::MembershipRegister),
    route("check-membership-register", Post, false, A::CheckMembershipRegister),
    route("event-registration", Any, false, A::EventRegistrationForm),
    route("check-event-registration", Post, false, A::CheckEventRegistration),
    route("event-register", Any, true, A::EventRegister),
    route("check-event", Post, true, A::CheckEvent),
    route("news-register", Any, true, A::NewsRegister),
    route("check-news", Post, true, A::CheckNews),
    route("check-contact-form", Post, false, A::CheckContactForm),
    // dons
    route("donation-form", Any, false, A::DonationForm),
    route("create-stripe", Post, false, A::CreateStripe),
    route("donation-success", Any, false, A::DonationSuccess),
    route("create-helloasso", Post, false, A::CreateHelloAsso),
    route("helloasso-success", Any, false, A::HelloAssoSuccess),
    route("donation-success-clean", Any, false, A::DonationSuccessClean),
    route("donations", Any, true, A::Donations),
];

const DEFAULT_ROUTE: Route = route("home", Any, false, A::Home);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route #{0} has an empty key")]
    EmptyKey(usize),
    #[error("route key {0:?} is declared twice")]
    DuplicateKey(&'static str),
}

/// Vérifie la table des routes (appelé au démarrage)
pub fn validate_route_table(routes: &[Route]) -> Result<(), RouteTableError> {
    let mut seen = HashSet::new();
    for (index, route) in routes.iter().enumerate() {
        if route.key.trim().is_empty() {
            return Err(RouteTableError::EmptyKey(index));
        }
        if !seen.insert(route.key) {
            return Err(RouteTableError::DuplicateKey(route.key));
        }
    }
    Ok(())
}

/// Route correspondant à la clé, page d'accueil sinon
pub fn resolve(key: Option<&str>) -> &'static Route {
    key.and_then(|key| ROUTES.iter().find(|route| route.key == key))
        .unwrap_or(&DEFAULT_ROUTE)
}

#[derive(Debug, Default, Deserialize)]
struct RouteQuery {
    route: Option<String>,
}

/// Requête en cours, transmise à chaque action
pub struct RequestContext {
    pub state: web::Data<AppState>,
    pub auth: Option<AuthUser>,
    query: String,
    body: web::Bytes,
    is_json: bool,
}

impl RequestContext {
    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    /// Paramètres d'URL; un paramètre illisible donne la valeur par défaut
    pub fn query<T: DeserializeOwned + Default>(&self) -> T {
        serde_urlencoded::from_str(&self.query).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "unreadable query string");
            T::default()
        })
    }

    /// Corps de la requête: JSON si Content-Type le dit, formulaire urlencoded sinon
    pub fn form<T: DeserializeOwned + Default>(&self) -> T {
        let parsed = if self.is_json {
            serde_json::from_slice(&self.body).map_err(|e| e.to_string())
        } else {
            serde_urlencoded::from_bytes(&self.body).map_err(|e| e.to_string())
        };
        parsed.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "unreadable request body");
            T::default()
        })
    }

    /// Corps JSON strict (API de paiement)
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Un jeton absent ou invalide est refusé
    pub fn csrf_valid(&self, token: &Option<String>) -> bool {
        token
            .as_deref()
            .is_some_and(|token| self.state.csrf.validate_token(token))
    }

    /// Seul un jeton présent et invalide est refusé
    pub fn csrf_rejected(&self, token: &Option<String>) -> bool {
        token
            .as_deref()
            .is_some_and(|token| !self.state.csrf.validate_token(token))
    }

    pub fn csrf_token(&self) -> String {
        self.state.csrf.generate_token()
    }

    pub fn render(&self, template: &str, context: serde_json::Value) -> Result<HttpResponse, AppError> {
        let html = self.state.views.render(template, &context)?;
        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html))
    }
}

/// Réponse JSON d'une action (HTTP 200, y compris pour les refus de validation)
pub fn json_response(value: serde_json::Value) -> HttpResponse {
    HttpResponse::Ok().json(value)
}

pub fn failure(message: &str) -> HttpResponse {
    json_response(serde_json::json!({ "success": false, "message": message }))
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Point d'entrée unique: GET|POST / et /index.php
pub async fn handle_request(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
    auth: Option<AuthUser>,
) -> HttpResponse {
    let params: RouteQuery = serde_urlencoded::from_str(req.query_string()).unwrap_or_default();
    let route = resolve(params.route.as_deref());

    // 1. Méthode
    if route.method == MethodPolicy::Post && req.method() != Method::POST {
        return failure("Le formulaire n'est pas soumis par la méthode POST");
    }

    // 2. Droits admin
    if route.admin && !auth.as_ref().is_some_and(AuthUser::is_admin) {
        tracing::warn!(route = route.key, "admin route refused");
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "message": "Vous n'avez pas les droits d'accès."
        }));
    }

    // 3. Action
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    let ctx = RequestContext {
        state: state.clone(),
        auth,
        query: req.query_string().to_string(),
        body,
        is_json,
    };

    let span = tracing::info_span!("route", key = route.key, method = %req.method());
    match dispatch(route.action, &ctx).instrument(span).await {
        Ok(response) => response,
        Err(err) => error_page(&state, err),
    }
}

/// Page d'erreur avec le code HTTP de l'erreur (JSON si le rendu échoue aussi)
fn error_page(state: &AppState, err: AppError) -> HttpResponse {
    let code = err.status_code();
    if code.is_server_error() {
        tracing::error!(error = %err, status = code.as_u16(), "action failed");
    } else {
        tracing::info!(error = %err, status = code.as_u16(), "action refused");
    }

    match state
        .views
        .render("errorPage.html", &serde_json::json!({ "code": code.as_u16() }))
    {
        Ok(html) => HttpResponse::build(code)
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(view_err) => {
            tracing::error!(error = %view_err, "error page rendering failed");
            err.error_response()
        }
    }
}

async fn dispatch(action: Action, ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    match action {
        A::Home => page::home(ctx).await,
        A::AdminHome => page::admin_home(ctx),
        A::ErrorPage => page::error_page(ctx),
        A::About => page::about(ctx),
        A::LegalPolicy => page::legal_policy(ctx),
        A::News => news::show_news(ctx).await,
        A::NewsDetail => news::show_news_by_id(ctx).await,
        A::Memberships => membership::show_memberships(ctx).await,
        A::Events => event::show_events(ctx).await,
        A::EventRegistrations => event::show_event_registrations(ctx).await,
        A::Messages => contact::show_messages(ctx).await,
        A::MembershipSuccess => page::membership_success(ctx),
        A::EventRegistrationSuccess => page::event_registration_success(ctx),
        A::NewsSuccess => page::news_success(ctx),
        A::CsrfToken => page::csrf_token(ctx),
        A::RegisterForm => auth::register(ctx).await,
        A::CheckRegister => auth::check_register(ctx).await,
        A::LoginForm => auth::login(ctx),
        A::CheckLogin => auth::check_login(ctx).await,
        A::ResetPasswordForm => auth::reset_password_form(ctx),
        A::CheckResetPassword => auth::check_reset_password(ctx).await,
        A::Logout => Ok(auth::logout()),
        A::MembershipRegister => membership::membership_register(ctx).await,
        A::CheckMembershipRegister => membership::check_membership_register(ctx).await,
        A::EventRegistrationForm => event::event_registration(ctx).await,
        A::CheckEventRegistration => event::check_event_registration(ctx).await,
        A::EventRegister => event::event_register(ctx),
        A::CheckEvent => event::check_event(ctx).await,
        A::NewsRegister => news::news_register(ctx),
        A::CheckNews => news::check_news(ctx).await,
        A::CheckContactForm => contact::check_contact_form(ctx).await,
        A::DonationForm => donation::show_donation_form(ctx),
        A::CreateStripe => donation::create_stripe(ctx).await,
        A::DonationSuccess => donation::donation_success(ctx).await,
        A::CreateHelloAsso => donation::create_helloasso(ctx).await,
        A::HelloAssoSuccess => donation::helloasso_success(ctx).await,
        A::DonationSuccessClean => donation::donation_success_clean(ctx),
        A::Donations => donation::show_donations(ctx).await,
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::route().to(handle_request))
        .route("/index.php", web::route().to(handle_request));
}
