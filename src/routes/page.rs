use actix_web::HttpResponse;
use serde_json::json;

use super::{failure, json_response, RequestContext};
use crate::error::AppError;
use crate::managers::{EventManager, NewsManager};

/// Accueil: dernière actualité et dernier événement
pub async fn home(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let latest_news = NewsManager::find_latest(ctx.db()).await?;
    let latest_event = EventManager::find_latest(ctx.db()).await?;

    let Some(news) = latest_news else {
        return Ok(failure("Aucune actualité trouvée"));
    };
    let Some(event) = latest_event else {
        return Ok(failure("Aucun événement trouvé"));
    };

    ctx.render("home.html", json!({ "news": news, "event": event }))
}

pub fn admin_home(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let email = ctx.auth.as_ref().map(|user| user.email.as_str()).unwrap_or_default();
    ctx.render("adminHome.html", json!({ "email": email }))
}

pub fn error_page(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("errorPage.html", json!({}))
}

pub fn about(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("aboutPage.html", json!({}))
}

pub fn legal_policy(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("legalPolicy.html", json!({}))
}

pub fn membership_success(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("membershipSuccess.html", json!({}))
}

pub fn event_registration_success(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("eventRegistrationSuccess.html", json!({}))
}

pub fn news_success(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("newsSuccess.html", json!({}))
}

/// Jeton pour les formulaires envoyés en JavaScript
pub fn csrf_token(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    Ok(json_response(json!({ "success": true, "token": ctx.csrf_token() })))
}
