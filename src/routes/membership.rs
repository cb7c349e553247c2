use std::collections::HashMap;

use actix_web::HttpResponse;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;

use super::{failure, json_response, RequestContext};
use crate::error::AppError;
use crate::managers::role_manager::{membership_roles, PARTNER_ROLE};
use crate::managers::{MembershipManager, RoleManager};
use crate::models::dto::MembershipForm;
use crate::models::membership;
use crate::utils::validation::{all_filled, filled, is_valid_email};

/// Liste des adhésions avec le nom de leur rôle
pub async fn show_memberships(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let memberships = MembershipManager::find_all(ctx.db()).await?;
    if memberships.is_empty() {
        return Ok(failure("Membres non trouvé"));
    }

    let role_names: HashMap<i32, String> = RoleManager::find_all(ctx.db())
        .await?
        .into_iter()
        .map(|role| (role.id, role.name))
        .collect();

    let listed: Vec<serde_json::Value> = memberships
        .into_iter()
        .map(|m| {
            let role_name = role_names.get(&m.role_id).map(String::as_str).unwrap_or("Rôle inconnu");
            json!({ "membership": m, "roleName": role_name })
        })
        .collect();

    ctx.render("membershipPage.html", json!({ "memberships": listed }))
}

/// Formulaire d'adhésion: tous les rôles sauf Admin
pub async fn membership_register(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let roles = membership_roles(RoleManager::find_all(ctx.db()).await?);
    ctx.render(
        "membershipForm.html",
        json!({ "roles": roles, "csrfToken": ctx.csrf_token() }),
    )
}

pub async fn check_membership_register(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let form: MembershipForm = ctx.form();

    // 1. Champs obligatoires
    if !all_filled(&[
        &form.civility,
        &form.id_role,
        &form.first_name,
        &form.last_name,
        &form.email,
        &form.phone,
        &form.address,
        &form.postal_code,
    ]) {
        return Ok(failure("Veuillez remplir tous les champs"));
    }

    // 2. CSRF (vérifié s'il est fourni)
    if ctx.csrf_rejected(&form.csrf_token) {
        return Ok(failure("Jeton CSRF invalide"));
    }

    let email = filled(&form.email).unwrap_or_default();
    if !is_valid_email(email) {
        return Ok(failure("Veuillez renseigner une adresse email valide"));
    }

    // 3. Un seul membre par email
    if MembershipManager::find_by_email(ctx.db(), email).await?.is_some() {
        return Ok(failure("Un membre avec cet email existe déjà"));
    }

    // 4. Rôle
    let role = match filled(&form.id_role).and_then(|id| id.parse::<i32>().ok()) {
        Some(role_id) => RoleManager::find_by_id(ctx.db(), role_id).await?,
        None => None,
    };
    let Some(role) = role else {
        return Ok(failure("Rôle introuvable."));
    };

    // 5. Un partenaire vient avec son logo
    let is_partner = role.name == PARTNER_ROLE;
    let logo = filled(&form.logo).map(str::to_string);
    if is_partner && logo.is_none() {
        return Ok(failure("Veuillez ajouter le logo de l'entreprise"));
    }

    let new_membership = membership::ActiveModel {
        civility: Set(filled(&form.civility).unwrap_or_default().to_string()),
        role_id: Set(role.id),
        first_name: Set(filled(&form.first_name).unwrap_or_default().to_string()),
        last_name: Set(filled(&form.last_name).unwrap_or_default().to_string()),
        email: Set(email.to_string()),
        phone: Set(filled(&form.phone).unwrap_or_default().to_string()),
        address: Set(filled(&form.address).unwrap_or_default().to_string()),
        postal_code: Set(filled(&form.postal_code).unwrap_or_default().to_string()),
        created_at: Set(Utc::now().naive_utc()),
        logo: Set(if is_partner { logo } else { None }),
        company_name: Set(if is_partner {
            filled(&form.company_name).map(str::to_string)
        } else {
            None
        }),
        membership_fee: Set(None),
        ..Default::default()
    };

    match MembershipManager::create(ctx.db(), new_membership).await {
        Ok(created) => {
            tracing::info!(membership_id = created.id, role = %role.name, "membership registered");
            Ok(json_response(json!({ "success": true, "roleName": role.name })))
        }
        Err(_) => Ok(failure("Une erreur s'est produite lors de votre adhésion.")),
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_connection;
    use crate::managers::MembershipManager;
    use crate::test_support::{csrf_token, post_form, seed_membership, seed_role, send, test_app};
    use actix_web::test::TestRequest;

    fn member_fields<'a>(role_id: &'a str, email: &'a str, token: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("civility", "M."),
            ("idRole", role_id),
            ("firstName", "Jean"),
            ("lastName", "Dupont"),
            ("email", email),
            ("phone", "0611223344"),
            ("address", "1 rue de la Paix"),
            ("postalCode", "75001"),
            ("csrf-token", token),
        ]
    }

    #[actix_web::test]
    async fn test_membership_is_stored_and_found_by_email() {
        let app = test_app(test_connection().await);
        let role = seed_role(&app.state.db, "Membre").await;
        let role_id = role.id.to_string();
        let token = csrf_token(&app.state);

        let fields = member_fields(&role_id, "jean@asso.fr", &token);
        let res = send(&app.state, post_form("check-membership-register", &fields)).await;
        assert_eq!(res.json(), serde_json::json!({ "success": true, "roleName": "Membre" }));

        let stored = MembershipManager::find_by_email(&app.state.db, "jean@asso.fr")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.first_name, "Jean");
        assert_eq!(stored.postal_code, "75001");
        assert_eq!(stored.role_id, role.id);
        assert_eq!(stored.logo, None);

        let res = send(&app.state, post_form("check-membership-register", &fields)).await;
        assert_eq!(res.json()["message"], "Un membre avec cet email existe déjà");
    }

    #[actix_web::test]
    async fn test_partner_requires_logo() {
        let app = test_app(test_connection().await);
        let partner = seed_role(&app.state.db, "Partenaire").await;
        let role_id = partner.id.to_string();
        let token = csrf_token(&app.state);

        let mut fields = member_fields(&role_id, "sarl@asso.fr", &token);
        let res = send(&app.state, post_form("check-membership-register", &fields)).await;
        assert_eq!(res.json()["message"], "Veuillez ajouter le logo de l'entreprise");

        fields.push(("logo", "uploads/logo-sarl.png"));
        fields.push(("companyName", "SARL Dupont"));
        let res = send(&app.state, post_form("check-membership-register", &fields)).await;
        assert_eq!(res.json()["roleName"], "Partenaire");

        let stored = MembershipManager::find_by_email(&app.state.db, "sarl@asso.fr")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.logo.as_deref(), Some("uploads/logo-sarl.png"));
        assert_eq!(stored.company_name.as_deref(), Some("SARL Dupont"));
    }

    #[actix_web::test]
    async fn test_membership_rejections() {
        let app = test_app(test_connection().await);
        let role = seed_role(&app.state.db, "Membre").await;
        let role_id = role.id.to_string();
        let token = csrf_token(&app.state);

        let res = send(&app.state, post_form("check-membership-register", &[("email", "a@b.fr")])).await;
        assert_eq!(res.json()["message"], "Veuillez remplir tous les champs");

        let res = send(
            &app.state,
            post_form("check-membership-register", &member_fields(&role_id, "jean@asso.fr", "faux")),
        )
        .await;
        assert_eq!(res.json()["message"], "Jeton CSRF invalide");

        let res = send(
            &app.state,
            post_form("check-membership-register", &member_fields(&role_id, "pas-un-email", &token)),
        )
        .await;
        assert_eq!(res.json()["message"], "Veuillez renseigner une adresse email valide");

        let res = send(
            &app.state,
            post_form("check-membership-register", &member_fields("999", "jean@asso.fr", &token)),
        )
        .await;
        assert_eq!(res.json()["message"], "Rôle introuvable.");
        assert!(MembershipManager::find_all(&app.state.db).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_membership_pages() {
        let app = test_app(test_connection().await);

        let res = send(&app.state, TestRequest::get().uri("/?route=memberships")).await;
        assert_eq!(res.json()["message"], "Membres non trouvé");

        seed_role(&app.state.db, "Admin").await;
        let member = seed_role(&app.state.db, "Membre").await;
        seed_membership(&app.state.db, member.id, "alice@asso.fr").await;

        let res = send(&app.state, TestRequest::get().uri("/?route=memberships")).await;
        assert!(res.body.starts_with("<membershipPage.html>"));
        assert!(res.body.contains("alice@asso.fr"));
        assert!(res.body.contains("\"Membre\""));

        let res = send(&app.state, TestRequest::get().uri("/?route=membership-register")).await;
        assert!(res.body.starts_with("<membershipForm.html>"));
        assert!(!res.body.contains("\"Admin\""));
    }
}
