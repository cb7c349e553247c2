use chrono::{Duration, Utc};
use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Durée de validité d'un jeton CSRF
const TOKEN_TTL_MINUTES: i64 = 120;

/// Jetons CSRF sans état: "<expiration>.<hmac hex>".
/// Le serveur n'a rien à stocker, la signature suffit à valider le jeton.
#[derive(Clone)]
pub struct CsrfTokenManager {
    mac: HmacSha256,
}

impl CsrfTokenManager {
    pub fn new(secret: &str) -> Result<Self, InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret.as_bytes())?,
        })
    }

    pub fn generate_token(&self) -> String {
        let expires = (Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp();
        format!("{}.{}", expires, hex::encode(self.sign(expires)))
    }

    pub fn validate_token(&self, token: &str) -> bool {
        let Some((expires, signature)) = token.split_once('.') else {
            return false;
        };
        let Ok(expires) = expires.parse::<i64>() else {
            return false;
        };
        if expires < Utc::now().timestamp() {
            return false;
        }
        let Ok(signature) = hex::decode(signature) else {
            return false;
        };

        let mut mac = self.mac.clone();
        mac.update(expires.to_string().as_bytes());
        mac.verify_slice(&signature).is_ok()
    }

    fn sign(&self, expires: i64) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(expires.to_string().as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}
