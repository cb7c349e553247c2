use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const ITERATIONS: u32 = 260000;
const KEY_LENGTH: usize = 32;
const MIN_LENGTH: usize = 8;
const SPECIAL_CHARS: &str = "!@#$%^&*()-_=+{};:,<.>";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid hash format")]
    InvalidFormat,
    #[error("invalid iteration count")]
    InvalidIterations,
    #[error("failed to decode {0}")]
    Decode(&'static str),
    #[error("pbkdf2 failure")]
    Derivation,
}

/// Hash un mot de passe: PBKDF2-HMAC-SHA256, 260000 itérations, salt de 16 bytes
/// Format: pbkdf2:sha256:iterations$salt$hash (base64 URL-safe sans padding)
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, ITERATIONS, &mut key)
        .map_err(|_| PasswordError::Derivation)?;

    Ok(format!(
        "pbkdf2:sha256:{}${}${}",
        ITERATIONS,
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(key)
    ))
}

/// Vérifie un mot de passe contre un hash produit par hash_password
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parts: Vec<&str> = stored_hash.split('$').collect();
    if parts.len() != 3 {
        return Err(PasswordError::InvalidFormat);
    }

    let header_parts: Vec<&str> = parts[0].split(':').collect();
    if header_parts.len() != 3 || header_parts[0] != "pbkdf2" || header_parts[1] != "sha256" {
        return Err(PasswordError::InvalidFormat);
    }

    let iterations = header_parts[2]
        .parse::<u32>()
        .map_err(|_| PasswordError::InvalidIterations)?;

    let salt = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|_| PasswordError::Decode("salt"))?;
    let expected = URL_SAFE_NO_PAD
        .decode(parts[2])
        .map_err(|_| PasswordError::Decode("hash"))?;

    let mut computed = vec![0u8; expected.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
        .map_err(|_| PasswordError::Derivation)?;

    Ok(computed[..].ct_eq(&expected[..]).into())
}

/// Au moins 8 caractères, un chiffre, une minuscule, une majuscule et un caractère spécial
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_LENGTH
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| SPECIAL_CHARS.contains(c))
}
