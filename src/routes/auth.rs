use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use sea_orm::Set;
use serde_json::json;

use super::{failure, json_response, RequestContext, HOME_LOCATION};
use crate::error::AppError;
use crate::managers::role_manager::ADMIN_ROLE;
use crate::managers::{RoleManager, UserManager};
use crate::middleware::auth::AUTH_COOKIE;
use crate::models::dto::{LoginForm, RegisterForm, ResetPasswordForm};
use crate::models::users;
use crate::utils::validation::{all_filled, filled, is_valid_email};
use crate::utils::{jwt, password};

const WEAK_PASSWORD: &str = "Le mot de passe doit contenir au moins 8 caractères, un chiffre, une lettre en majuscule, une lettre en minuscule et un caractère spécial.";

/// PBKDF2 (260000 itérations) tourne sur le pool bloquant, pas sur le worker
async fn hash_off_worker(plain: &str) -> Option<String> {
    let plain = plain.to_string();
    match web::block(move || password::hash_password(&plain)).await {
        Ok(Ok(hash)) => Some(hash),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "password hashing failed");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "password hashing task failed");
            None
        }
    }
}

async fn verify_off_worker(plain: &str, stored_hash: &str) -> bool {
    let (plain, stored_hash) = (plain.to_string(), stored_hash.to_string());
    match web::block(move || password::verify_password(&plain, &stored_hash)).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "stored password hash is unreadable");
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "password check task failed");
            false
        }
    }
}

/// GET inscription - formulaire de création de compte admin
pub async fn register(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let roles = RoleManager::find_all(ctx.db()).await?;
    ctx.render(
        "register.html",
        json!({ "roles": roles, "csrfToken": ctx.csrf_token() }),
    )
}

/// POST checkRegister - création d'un compte administrateur
pub async fn check_register(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let form: RegisterForm = ctx.form();

    // 1. Champs obligatoires
    if !all_filled(&[
        &form.first_name,
        &form.last_name,
        &form.email,
        &form.password,
        &form.confirm_password,
        &form.id_role,
        &form.csrf_token,
    ]) {
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

    // 3. Mot de passe
    let plain = form.password.as_deref().unwrap_or_default();
    if Some(plain) != form.confirm_password.as_deref() {
        return Ok(failure("Les mots de passe ne correspondent pas"));
    }
    if !password::is_strong_password(plain) {
        return Ok(failure(WEAK_PASSWORD));
    }

    // 4. Seul le rôle Admin ouvre un compte
    let role = match filled(&form.id_role).and_then(|id| id.parse::<i32>().ok()) {
        Some(role_id) => RoleManager::find_by_id(ctx.db(), role_id).await?,
        None => None,
    };
    let Some(role) = role.filter(|role| role.name == ADMIN_ROLE) else {
        return Ok(failure("Ce service est réservé aux administrateurs"));
    };

    // 5. Email unique
    if UserManager::find_by_email(ctx.db(), email).await?.is_some() {
        return Ok(failure("L'utilisateur existe dejà"));
    }

    // 6. Création
    let Some(password_hash) = hash_off_worker(plain).await else {
        return Ok(failure("Une erreur s'est produite lors de la création de votre compte."));
    };

    let new_user = users::ActiveModel {
        last_name: Set(filled(&form.last_name).unwrap_or_default().to_string()),
        first_name: Set(filled(&form.first_name).unwrap_or_default().to_string()),
        email: Set(email.to_string()),
        role_id: Set(role.id),
        password_hash: Set(password_hash),
        ..Default::default()
    };

    match UserManager::create(ctx.db(), new_user).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "admin account created");
            ctx.render("registerSuccess.html", json!({}))
        }
        Err(_) => Ok(failure("Une erreur s'est produite lors de la création de votre compte.")),
    }
}

/// GET connexion
pub fn login(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("login.html", json!({ "csrfToken": ctx.csrf_token() }))
}

/// POST checkLogin - ouvre la session admin (cookie HttpOnly auth_token)
pub async fn check_login(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let form: LoginForm = ctx.form();

    // 1. Champs obligatoires
    if !all_filled(&[&form.email, &form.password]) {
        return Ok(failure("Veuillez renseigner tous les champs obligatoires."));
    }

    // 2. CSRF (obligatoire)
    if !ctx.csrf_valid(&form.csrf_token) {
        return Ok(failure("Jeton CSRF invalide"));
    }

    // 3. Utilisateur
    let email = filled(&form.email).unwrap_or_default();
    let Some(user) = UserManager::find_by_email(ctx.db(), email).await? else {
        return Ok(failure("L'utilisateur avec cet email n'existe pas."));
    };

    // 4. Mot de passe
    let plain = form.password.as_deref().unwrap_or_default();
    if !verify_off_worker(plain, &user.password_hash).await {
        return Ok(failure("Mot de passe incorrect."));
    }

    // 5. Rôle
    let Some(role) = RoleManager::find_by_id(ctx.db(), user.role_id).await? else {
        return Ok(failure("Rôle introuvable."));
    };
    if role.name != ADMIN_ROLE {
        return Ok(failure("Vous n'avez pas les droits d'accès."));
    }

    // 6. Session
    let token = jwt::generate_token(&ctx.state.jwt_secret, user.id, &user.email, &role.name)
        .map_err(AppError::internal)?;
    let cookie = Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();

    let html = ctx.state.views.render("adminHome.html", &json!({ "email": user.email }))?;
    tracing::info!(user_id = user.id, "admin logged in");

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// GET reset-password
pub fn reset_password_form(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("updateUserForm.html", json!({ "csrfToken": ctx.csrf_token() }))
}

/// POST check-reset-password
pub async fn check_reset_password(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let form: ResetPasswordForm = ctx.form();

    if !all_filled(&[&form.email, &form.new_password, &form.confirm_password, &form.csrf_token]) {
        return Ok(failure("Veuillez remplir tous les champs"));
    }
    if !ctx.csrf_valid(&form.csrf_token) {
        return Ok(failure("Jeton CSRF invalide"));
    }

    let plain = form.new_password.as_deref().unwrap_or_default();
    if Some(plain) != form.confirm_password.as_deref() {
        return Ok(failure("Les mots de passe ne correspondent pas"));
    }
    if !password::is_strong_password(plain) {
        return Ok(failure(WEAK_PASSWORD));
    }

    let email = filled(&form.email).unwrap_or_default();
    let Some(mut user) = UserManager::find_by_email(ctx.db(), email).await? else {
        return Ok(failure("Aucun utilisateur trouvé avec cet email"));
    };

    const UPDATE_FAILED: &str = "Une erreur s'est produite lors de la mise à jour du mot de passe";
    user.password_hash = match hash_off_worker(plain).await {
        Some(hash) => hash,
        None => return Ok(failure(UPDATE_FAILED)),
    };

    match UserManager::update(ctx.db(), user).await {
        Ok(Some(user)) => {
            tracing::info!(user_id = user.id, "password updated");
            Ok(json_response(json!({
                "success": true,
                "message": "Le mot de passe a été mis à jour avec succès"
            })))
        }
        _ => Ok(failure(UPDATE_FAILED)),
    }
}

/// Ferme la session et revient à l'accueil
pub fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(AUTH_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Found()
        .cookie(cookie)
        .insert_header((header::LOCATION, HOME_LOCATION))
        .finish()
}
