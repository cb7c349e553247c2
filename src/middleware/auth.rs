use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::managers::role_manager::ADMIN_ROLE;
use crate::state::AppState;
use crate::utils::jwt;

/// Cookie HttpOnly qui porte la session admin
pub const AUTH_COOKIE: &str = "auth_token";

/// Utilisateur connecté, extrait du cookie auth_token ou du header Authorization
/// Utilisé comme extracteur (Option<AuthUser> sur le routeur)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

fn unauthorized(message: &str) -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "success": false,
        "message": message
    }));
    actix_web::error::InternalError::from_response("", response).into()
}

/// Le cookie est prioritaire, puis "Authorization: Bearer <token>"
fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(AUTH_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Le secret JWT vient de l'état de l'application
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(actix_web::error::ErrorInternalServerError("missing app state")));
        };

        // 2. Récupérer le token
        let Some(token) = extract_token(req) else {
            return ready(Err(unauthorized("Authentification requise")));
        };

        // 3. Vérifier le token
        match jwt::verify_token(&state.jwt_secret, &token) {
            Ok(claims) => ready(Ok(AuthUser {
                user_id: claims.sub,
                email: claims.email,
                role: claims.role,
            })),
            Err(e) => {
                tracing::debug!(error = %e, "rejected auth token");
                ready(Err(unauthorized("Session invalide ou expirée")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::test_support::{test_app, TEST_JWT_SECRET};
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    async fn extract(req: TestRequest) -> Result<AuthUser, Error> {
        let app = test_app(test_connection().await);
        let (req, mut payload) = req.app_data(web::Data::new(app.state)).to_http_parts();
        AuthUser::from_request(&req, &mut payload).await
    }

    #[actix_web::test]
    async fn test_token_from_cookie() {
        let token = jwt::generate_token(TEST_JWT_SECRET, 1, "admin@asso.fr", "Admin").unwrap();
        let user = extract(TestRequest::default().cookie(Cookie::new(AUTH_COOKIE, token)))
            .await
            .unwrap();
        assert_eq!(user.user_id, 1);
        assert!(user.is_admin());
    }

    #[actix_web::test]
    async fn test_token_from_bearer_header() {
        let token = jwt::generate_token(TEST_JWT_SECRET, 2, "m@asso.fr", "Membre").unwrap();
        let user = extract(
            TestRequest::default().insert_header(("Authorization", format!("Bearer {}", token))),
        )
        .await
        .unwrap();
        assert_eq!(user.email, "m@asso.fr");
        assert!(!user.is_admin());
    }

    #[actix_web::test]
    async fn test_missing_or_forged_token() {
        assert!(extract(TestRequest::default()).await.is_err());

        let forged = jwt::generate_token("autre-secret", 1, "admin@asso.fr", "Admin").unwrap();
        assert!(extract(TestRequest::default().cookie(Cookie::new(AUTH_COOKIE, forged)))
            .await
            .is_err());
    }
}
