// rendu des pages HTML

use std::sync::Arc;

use tera::{Context, Tera};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// Moteur de rendu utilisé par les contrôleurs.
/// Le contexte est un objet JSON: chaque clé devient une variable du template.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, ViewError>;
}

pub struct TeraRenderer {
    templates: Arc<Tera>,
}

impl TeraRenderer {
    /// Charge tous les templates `<dir>/**/*.html`
    pub fn new(templates_dir: &str) -> Result<Self, ViewError> {
        let pattern = format!("{}/**/*.html", templates_dir.trim_end_matches('/'));
        let mut tera = Tera::new(&pattern)?;
        tera.autoescape_on(vec![".html"]);
        tracing::info!(templates = tera.get_template_names().count(), "templates loaded");
        Ok(Self::from_tera(tera))
    }

    pub fn from_tera(tera: Tera) -> Self {
        Self {
            templates: Arc::new(tera),
        }
    }
}

impl ViewRenderer for TeraRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, ViewError> {
        let context = match context {
            serde_json::Value::Null => Context::new(),
            other => Context::from_value(other.clone())?,
        };
        Ok(self.templates.render(template, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer() -> TeraRenderer {
        let mut tera = Tera::default();
        tera.add_raw_template("hello.html", "Bonjour {{ name }}").unwrap();
        tera.autoescape_on(vec![".html"]);
        TeraRenderer::from_tera(tera)
    }

    #[test]
    fn test_render_escapes_html() {
        let html = renderer().render("hello.html", &json!({ "name": "<b>Alice</b>" })).unwrap();
        assert_eq!(html, "Bonjour &lt;b&gt;Alice&lt;&#x2F;b&gt;");
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        assert!(renderer().render("absent.html", &json!({})).is_err());
    }

    #[test]
    fn test_project_templates_compile() {
        let renderer = TeraRenderer::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")).unwrap();
        let html = renderer.render("errorPage.html", &json!({ "code": 404 })).unwrap();
        assert!(html.contains("404"));
    }

    #[test]
    fn test_project_listing_templates_render_rows() {
        let renderer = TeraRenderer::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")).unwrap();

        let events = json!({ "events": [{
            "event": {
                "id": 3, "title": "Concert", "description": "Printemps",
                "start_date": "2025-04-12T20:00:00", "end_date": "2025-04-12T23:00:00",
                "location": "Église", "organizer": "Chorale", "seats_available": 80,
                "image": null, "video": null
            },
            "remainingSeats": 0
        }]});
        let html = renderer.render("eventsPage.html", &events).unwrap();
        assert!(html.contains("20:00"));
        assert!(html.contains("Complet"));

        let donations = json!({ "donations": [{
            "donation": {
                "id": 1, "membership_id": 2, "amount": 30.0, "donation_date": "2025-03-01T10:00:00",
                "message": null, "anonymous": false, "last_name": null, "first_name": null
            },
            "member": "Alice Martin"
        }]});
        let html = renderer.render("donation.html", &donations).unwrap();
        assert!(html.contains("Alice Martin"));
        assert!(html.contains("Dons reçus"));
    }
}
