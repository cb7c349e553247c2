use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::payments::{CardPaymentProvider, CheckoutProvider};
use crate::utils::csrf::CsrfTokenManager;
use crate::views::ViewRenderer;

/// État partagé par tous les workers actix (web::Data<AppState>)
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub views: Arc<dyn ViewRenderer>,
    pub csrf: CsrfTokenManager,
    pub jwt_secret: String,
    /// URL publique du site, utilisée pour les URLs de retour HelloAsso
    pub public_base_url: String,
    pub card_payments: Arc<dyn CardPaymentProvider>,
    pub checkout: Arc<dyn CheckoutProvider>,
}
