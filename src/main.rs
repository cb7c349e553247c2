mod config;
mod db;
mod error;
mod logging;
mod managers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod utils;
mod views;

#[cfg(test)]
mod test_support;

use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};

use crate::config::AppConfig;
use crate::services::payments::{http_client, HelloAssoClient, StripeClient};
use crate::state::AppState;
use crate::utils::csrf::CsrfTokenManager;
use crate::views::TeraRenderer;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    tracing::error!(error = %err, "{}", context);
    io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    logging::init_tracing();

    let config = AppConfig::from_env().map_err(|e| startup_error("invalid configuration", e))?;

    routes::validate_route_table(routes::ROUTES).map_err(|e| startup_error("invalid route table", e))?;

    tracing::info!("connecting to database");
    let db = db::establish_connection(&config.database_url)
        .await
        .map_err(|e| startup_error("failed to connect to database", e))?;
    if config.auto_migrate {
        db::create_schema(&db)
            .await
            .map_err(|e| startup_error("failed to create schema", e))?;
        tracing::info!("schema ready");
    }

    let views = TeraRenderer::new(&config.templates_dir)
        .map_err(|e| startup_error("failed to load templates", e))?;
    let csrf = CsrfTokenManager::new(&config.csrf_secret)
        .map_err(|e| startup_error("invalid CSRF secret", e))?;
    let http = http_client().map_err(|e| startup_error("failed to build HTTP client", e))?;

    let state = AppState {
        db,
        views: Arc::new(views),
        csrf,
        jwt_secret: config.jwt_secret.clone(),
        public_base_url: config.public_base_url.clone(),
        card_payments: Arc::new(StripeClient::new(http.clone(), config.stripe.clone())),
        checkout: Arc::new(HelloAssoClient::new(http, config.helloasso.clone())),
    };
    let state = web::Data::new(state);

    tracing::info!(host = %config.host, port = config.port, "starting server");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(routes::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
