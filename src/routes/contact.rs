use actix_web::HttpResponse;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;

use super::{failure, RequestContext};
use crate::error::AppError;
use crate::managers::MessageManager;
use crate::models::dto::ContactForm;
use crate::models::message::{self, STATUS_NEW};
use crate::utils::validation::{all_filled, filled, is_valid_email};

/// Formulaire de contact public
pub async fn check_contact_form(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let form: ContactForm = ctx.form();

    // 1. Tous les champs, jeton CSRF compris
    if !all_filled(&[&form.name, &form.email, &form.subject, &form.message, &form.csrf_token]) {
        return Ok(failure("Veuillez remplir tous les champs"));
    }

    // 2. CSRF
    if !ctx.csrf_valid(&form.csrf_token) {
        return Ok(failure("Jeton CSRF invalide"));
    }

    let email = filled(&form.email).unwrap_or_default();
    if !is_valid_email(email) {
        return Ok(failure("Veuillez renseigner une adresse email valide"));
    }

    // 3. Enregistrement avec le statut "Nouveau"
    let new_message = message::ActiveModel {
        name: Set(filled(&form.name).unwrap_or_default().to_string()),
        email: Set(email.to_string()),
        subject: Set(filled(&form.subject).unwrap_or_default().to_string()),
        message: Set(filled(&form.message).unwrap_or_default().to_string()),
        status: Set(STATUS_NEW.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    match MessageManager::create(ctx.db(), new_message).await {
        Ok(_) => ctx.render("messageSuccess.html", json!({})),
        Err(_) => Ok(failure("Echec lors de l'envoi de message.")),
    }
}

/// Boîte de réception (admin)
pub async fn show_messages(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let messages = MessageManager::find_all(ctx.db()).await?;
    ctx.render("messages.html", json!({ "messages": messages }))
}
