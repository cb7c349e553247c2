// formulaires reçus par les contrôleurs (urlencoded ou JSON)
// tous les champs sont optionnels: la présence est vérifiée par l'action

use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<String>,
    #[serde(rename = "idRole")]
    pub id_role: Option<String>,
    #[serde(rename = "csrf-token")]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "csrf-token")]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetPasswordForm {
    pub email: Option<String>,
    #[serde(rename = "new-password")]
    pub new_password: Option<String>,
    #[serde(rename = "confirm-password")]
    pub confirm_password: Option<String>,
    #[serde(rename = "csrf-token")]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MembershipForm {
    pub civility: Option<String>,
    #[serde(rename = "idRole")]
    pub id_role: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "postalCode")]
    pub postal_code: Option<String>,
    #[serde(rename = "companyName")]
    pub company_name: Option<String>,
    /// chemin d'un logo déjà déposé
    pub logo: Option<String>,
    #[serde(rename = "csrf-token")]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventRegistrationForm {
    pub event_id: Option<String>,
    pub is_member: Option<String>,
    pub membership_email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(rename = "csrf-token")]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventForm {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    #[serde(rename = "seatsAvailable")]
    pub seats_available: Option<String>,
    pub video: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "csrf-token")]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsForm {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "publicationDate")]
    pub publication_date: Option<String>,
    pub video: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "csrf-token")]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "csrf-token")]
    pub csrf_token: Option<String>,
}

/// Paramètres d'URL communs (id d'actualité, id d'événement)
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
    pub event_id: Option<String>,
}

/// POST create-stripe (JSON), montant en euros
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateStripeRequest {
    #[validate(range(min = 1.0))]
    pub amount: f64,
}

/// Retour Stripe sur donation-success: le formulaire voyage dans l'URL
#[derive(Debug, Default, Deserialize)]
pub struct CardReturnQuery {
    pub payment_intent: Option<String>,
    pub anonymous: Option<String>,
    pub is_member: Option<String>,
    pub membership_email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "montant-personnalise")]
    pub amount: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloAssoPayer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HelloAssoMetadata {
    pub message: Option<String>,
}

/// POST create-helloasso (JSON), montant en centimes
#[derive(Debug, Default, Deserialize)]
pub struct CreateHelloAssoRequest {
    #[serde(rename = "totalAmount", default)]
    pub total_amount: i64,
    #[serde(default)]
    pub payer: HelloAssoPayer,
    #[serde(default)]
    pub metadata: HelloAssoMetadata,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub is_member: bool,
}

/// Retour HelloAsso sur helloasso-success
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutReturnQuery {
    pub nonce: Option<String>,
    #[serde(rename = "checkoutIntentId")]
    pub checkout_intent_id: Option<String>,
    pub code: Option<String>,
}
