use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use validator::ValidateEmail;

static YOUTUBE_WATCH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://www\.youtube\.com/watch\?v=([\w-]+)$").expect("valid youtube regex")
});

/// Valeur d'un champ de formulaire si elle est présente et non vide
pub fn filled(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Vrai si tous les champs sont présents et non vides
pub fn all_filled(fields: &[&Option<String>]) -> bool {
    fields.iter().all(|field| filled(field).is_some())
}

pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

/// "true" / "1" / "on" / "yes" → true, comme un formulaire HTML classique
pub fn is_truthy(field: &Option<String>) -> bool {
    matches!(
        filled(field).map(str::to_ascii_lowercase).as_deref(),
        Some("true" | "1" | "on" | "yes")
    )
}

pub fn is_youtube_watch_url(url: &str) -> bool {
    YOUTUBE_WATCH_URL.is_match(url)
}

/// https://www.youtube.com/watch?v=ID → https://www.youtube.com/embed/ID
/// Toute autre valeur est renvoyée telle quelle.
pub fn youtube_embed_url(url: &str) -> String {
    YOUTUBE_WATCH_URL
        .replace(url, "https://www.youtube.com/embed/$1")
        .into_owned()
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Date saisie dans un formulaire (datetime-local, SQL, ou jour seul à minuit)
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled() {
        assert_eq!(filled(&Some(" Paris ".to_string())), Some("Paris"));
        assert_eq!(filled(&Some("   ".to_string())), None);
        assert_eq!(filled(&None), None);
        assert!(!all_filled(&[&Some("a".to_string()), &None]));
    }

    #[test]
    fn test_truthy() {
        assert!(is_truthy(&Some("true".to_string())));
        assert!(is_truthy(&Some("1".to_string())));
        assert!(!is_truthy(&Some("false".to_string())));
        assert!(!is_truthy(&None));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("pas-un-email"));
    }

    #[test]
    fn test_youtube_embed() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        assert!(is_youtube_watch_url(url));
        assert_eq!(youtube_embed_url(url), "https://www.youtube.com/embed/dQw4w9WgXcQ");
        assert!(!is_youtube_watch_url("https://vimeo.com/123"));
        assert_eq!(youtube_embed_url("https://vimeo.com/123"), "https://vimeo.com/123");
    }

    #[test]
    fn test_parse_datetime() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(18, 30, 0).unwrap();
        assert_eq!(parse_datetime("2025-06-01T18:30"), Some(expected));
        assert_eq!(parse_datetime("2025-06-01 18:30:00"), Some(expected));
        assert_eq!(
            parse_datetime("2025-06-01"),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime("01/06/2025"), None);
        assert_eq!(parse_datetime(""), None);
    }
}
