pub mod donation_service;
pub mod event_registration_service;
pub mod payments;
