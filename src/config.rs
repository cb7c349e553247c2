// configuration depuis l'environnement (.env chargé par dotenv dans main)

use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in .env file")]
    Missing(&'static str),
    #[error("{name} is invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct HelloAssoConfig {
    pub client_id: String,
    pub client_secret: String,
    pub organization_slug: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub csrf_secret: String,
    pub public_base_url: String,
    pub templates_dir: String,
    pub auto_migrate: bool,
    pub stripe: StripeConfig,
    pub helloasso: HelloAssoConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = optional("PORT", "8080");
        let port = port.parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port.clone(),
        })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: optional("HOST", "127.0.0.1"),
            port,
            jwt_secret: secret("JWT_SECRET"),
            csrf_secret: secret("CSRF_SECRET"),
            public_base_url: optional("PUBLIC_BASE_URL", "http://127.0.0.1:8080"),
            templates_dir: optional("TEMPLATES_DIR", "templates"),
            auto_migrate: flag("AUTO_MIGRATE"),
            stripe: StripeConfig {
                secret_key: required("STRIPE_SECRET_KEY")?,
                api_base: optional("STRIPE_API_BASE", "https://api.stripe.com"),
            },
            helloasso: HelloAssoConfig {
                client_id: required("HELLOASSO_CLIENT_ID")?,
                client_secret: required("HELLOASSO_CLIENT_SECRET")?,
                organization_slug: required("HELLOASSO_ORGANIZATION_SLUG")?,
                api_base: optional("HELLOASSO_API_BASE", "https://api.helloasso-sandbox.com"),
            },
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false)
}

fn secret(name: &'static str) -> String {
    env::var(name).unwrap_or_else(|_| {
        tracing::warn!("{} not found in .env, using default (INSECURE)", name);
        "default-insecure-key-change-this".to_string()
    })
}
