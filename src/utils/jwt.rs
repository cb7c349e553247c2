use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

/// Durée de validité de la session admin
const SESSION_HOURS: i64 = 8;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub email: String,
    pub role: String,    // nom du rôle au moment de la connexion
    pub exp: i64,        // expiration timestamp
}

/// Génère un JWT pour un administrateur connecté
pub fn generate_token(secret: &str, user_id: i32, email: &str, role: &str) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(SESSION_HOURS))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role: role.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un JWT
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_token() {
        let token = generate_token("secret", 123, "admin@asso.fr", "Admin").unwrap();
        let claims = verify_token("secret", &token).unwrap();

        assert_eq!(claims.sub, 123);
        assert_eq!(claims.email, "admin@asso.fr");
        assert_eq!(claims.role, "Admin");
    }

    #[test]
    fn test_invalid_token() {
        assert!(verify_token("secret", "invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = generate_token("secret", 1, "a@b.fr", "Admin").unwrap();
        assert!(verify_token("other", &token).is_err());
    }
}
