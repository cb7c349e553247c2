use actix_web::HttpResponse;
use sea_orm::Set;
use serde_json::json;

use super::{failure, json_response, RequestContext};
use crate::error::AppError;
use crate::managers::{EventManager, EventRegistrationManager};
use crate::models::dto::{EventForm, EventRegistrationForm, IdQuery};
use crate::models::event;
use crate::services::event_registration_service::{
    EventRegistrationService, Participant, RegistrationError, RegistrationRequest,
};
use crate::utils::validation::{
    filled, is_truthy, is_youtube_watch_url, parse_datetime, youtube_embed_url,
};

/// Agenda: chaque événement avec ses places restantes
pub async fn show_events(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let events = EventManager::find_all(ctx.db()).await?;

    let mut listed = Vec::with_capacity(events.len());
    for event in events {
        let remaining = EventManager::remaining_seats(ctx.db(), &event).await?;
        listed.push(json!({ "event": event, "remainingSeats": remaining.max(0) }));
    }

    ctx.render("eventsPage.html", json!({ "events": listed }))
}

/// Inscrits par événement (admin)
pub async fn show_event_registrations(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let events = EventManager::find_all(ctx.db()).await?;

    let mut listed = Vec::with_capacity(events.len());
    for event in events {
        let registrations = EventRegistrationManager::find_by_event_id(ctx.db(), event.id).await?;
        listed.push(json!({ "event": event, "registrations": registrations }));
    }

    ctx.render("eventRegistrations.html", json!({ "events": listed }))
}

/// Formulaire d'inscription à un événement (?event_id=)
pub async fn event_registration(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let query: IdQuery = ctx.query();
    let Some(event_id) = filled(&query.event_id) else {
        return Ok(failure("Aucun identifiant d'événement fourni"));
    };

    let event = match event_id.parse::<i32>() {
        Ok(id) => EventManager::find_by_id(ctx.db(), id).await?,
        Err(_) => None,
    };
    let Some(event) = event else {
        return Ok(failure("Aucun événement trouvé avec cet identifiant"));
    };

    let remaining = EventManager::remaining_seats(ctx.db(), &event).await?;
    ctx.render(
        "eventRegistrationForm.html",
        json!({
            "event": event,
            "remainingSeats": remaining.max(0),
            "csrfToken": ctx.csrf_token()
        }),
    )
}

pub async fn check_event_registration(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let form: EventRegistrationForm = ctx.form();

    // 1. Événement visé et type de participant
    let (Some(event_id), Some(_)) = (filled(&form.event_id), filled(&form.is_member)) else {
        return Ok(failure("Veuillez remplir les champs requis"));
    };

    // 2. CSRF (vérifié s'il est fourni)
    if ctx.csrf_rejected(&form.csrf_token) {
        return Ok(failure("Jeton CSRF invalide"));
    }

    let Ok(event_id) = event_id.parse::<i32>() else {
        return Ok(failure(&RegistrationError::EventNotFound.to_string()));
    };

    // 3. Membre (par email) ou invité (par nom)
    let participant = if is_truthy(&form.is_member) {
        Participant::Member { email: form.membership_email }
    } else {
        Participant::Guest {
            first_name: form.first_name,
            last_name: form.last_name,
        }
    };

    let request = RegistrationRequest { event_id, participant };
    match EventRegistrationService::register(ctx.db(), request).await {
        Ok(outcome) => {
            let event = outcome.event;
            let remaining = EventManager::remaining_seats(ctx.db(), &event).await?;
            Ok(json_response(json!({
                "success": true,
                "eventTitle": event.title,
                "eventStartDate": event.start_date,
                "eventLocation": event.location,
                "eventSeatAvailable": remaining.max(0),
                "eventOrganizer": event.organizer,
                "event": event,
            })))
        }
        Err(e) => {
            tracing::info!(event_id, reason = %e, "event registration refused");
            Ok(failure(&e.to_string()))
        }
    }
}

pub fn event_register(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("eventForm.html", json!({ "csrfToken": ctx.csrf_token() }))
}

/// Création d'un événement (admin). Toutes les erreurs de saisie sont renvoyées ensemble.
pub async fn check_event(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let form: EventForm = ctx.form();

    if ctx.csrf_rejected(&form.csrf_token) {
        return Ok(failure("Jeton CSRF invalide"));
    }

    let mut errors: Vec<&str> = Vec::new();

    let title = filled(&form.title);
    if title.is_none() {
        errors.push("Le titre est requis.");
    }
    let description = filled(&form.description);
    if description.is_none() {
        errors.push("La description est requise.");
    }

    let start_date = filled(&form.start_date).and_then(parse_datetime);
    if start_date.is_none() {
        errors.push("La date de début est invalide.");
    }
    let end_date = filled(&form.end_date).and_then(parse_datetime);
    if end_date.is_none() {
        errors.push("La date de fin est invalide.");
    }
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            errors.push("La date de fin doit être postérieure à la date de début.");
        }
    }

    let location = filled(&form.location);
    if location.is_none() {
        errors.push("Le lieu est requis.");
    }
    let organizer = filled(&form.organizer);
    if organizer.is_none() {
        errors.push("L'organisateur est requis.");
    }

    let seats = match filled(&form.seats_available) {
        None => {
            errors.push("Le nombre de places disponibles est requis.");
            None
        }
        Some(value) => match value.parse::<i32>() {
            Ok(seats) if seats > 0 => Some(seats),
            _ => {
                errors.push("Le nombre de places disponibles doit être un nombre positif.");
                None
            }
        },
    };

    let video = match filled(&form.video) {
        Some(url) if is_youtube_watch_url(url) => Some(youtube_embed_url(url)),
        Some(_) => {
            errors.push("Le lien YouTube n'est pas valide.");
            None
        }
        None => None,
    };

    let (Some(title), Some(description), Some(start_date), Some(end_date), Some(location), Some(organizer), Some(seats)) =
        (title, description, start_date, end_date, location, organizer, seats)
    else {
        return Ok(json_response(json!({ "success": false, "errors": errors })));
    };
    if !errors.is_empty() {
        return Ok(json_response(json!({ "success": false, "errors": errors })));
    }

    let new_event = event::ActiveModel {
        title: Set(title.to_string()),
        description: Set(description.to_string()),
        start_date: Set(start_date),
        end_date: Set(end_date),
        location: Set(location.to_string()),
        organizer: Set(organizer.to_string()),
        seats_available: Set(seats),
        image: Set(filled(&form.image).map(str::to_string)),
        video: Set(video),
        ..Default::default()
    };

    match EventManager::create(ctx.db(), new_event).await {
        Ok(created) => {
            let admin_id = ctx.auth.as_ref().map(|user| user.user_id);
            tracing::info!(event_id = created.id, ?admin_id, "event created");
            ctx.render("eventSuccess.html", json!({ "event": created }))
        }
        Err(_) => Ok(failure("Une erreur s'est produite lors de l'enregistrement de l'événement.")),
    }
}
