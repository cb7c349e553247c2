use actix_web::HttpResponse;
use sea_orm::Set;
use serde_json::json;

use super::{failure, RequestContext};
use crate::error::AppError;
use crate::managers::NewsManager;
use crate::models::dto::{IdQuery, NewsForm};
use crate::models::news;
use crate::utils::validation::{
    all_filled, filled, is_youtube_watch_url, parse_datetime, youtube_embed_url,
};

/// Liste des actualités, de la plus récente à la plus ancienne
pub async fn show_news(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let mut items = NewsManager::find_all(ctx.db()).await?;
    if items.is_empty() {
        return Ok(failure("Actualité non trouvée"));
    }

    // Les anciennes lignes peuvent encore contenir un lien watch?v=
    for item in items.iter_mut() {
        item.video = item.video.as_deref().map(youtube_embed_url);
    }

    ctx.render("newsPage.html", json!({ "news": items }))
}

pub async fn show_news_by_id(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let query: IdQuery = ctx.query();
    let news_id = filled(&query.id)
        .and_then(|id| id.parse::<i32>().ok())
        .ok_or_else(|| AppError::not_found("news id missing"))?;

    let news = NewsManager::find_by_id(ctx.db(), news_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("news {} not found", news_id)))?;

    ctx.render("newsDetail.html", json!({ "news": news }))
}

pub fn news_register(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    ctx.render("newsForm.html", json!({ "csrfToken": ctx.csrf_token() }))
}

/// Publication d'une actualité (admin)
pub async fn check_news(ctx: &RequestContext) -> Result<HttpResponse, AppError> {
    let form: NewsForm = ctx.form();

    // 1. Champs obligatoires
    if !all_filled(&[&form.title, &form.excerpt, &form.content, &form.publication_date]) {
        return Ok(failure("Veuillez remplir tous les champs requis"));
    }

    // 2. CSRF (vérifié s'il est fourni)
    if ctx.csrf_rejected(&form.csrf_token) {
        return Ok(failure("Jeton CSRF invalide"));
    }

    // 3. Date de publication
    let Some(publication_date) = filled(&form.publication_date).and_then(parse_datetime) else {
        return Ok(failure("Format de date invalide"));
    };

    // 4. Vidéo YouTube facultative, stockée au format embed
    let video = match filled(&form.video) {
        Some(url) if is_youtube_watch_url(url) => Some(youtube_embed_url(url)),
        Some(_) => return Ok(failure("Le lien YouTube n'est pas valide.")),
        None => None,
    };

    let new_news = news::ActiveModel {
        title: Set(filled(&form.title).unwrap_or_default().to_string()),
        content: Set(filled(&form.content).unwrap_or_default().to_string()),
        image: Set(filled(&form.image).map(str::to_string)),
        video: Set(video),
        publication_date: Set(publication_date),
        update_date: Set(None),
        excerpt: Set(filled(&form.excerpt).unwrap_or_default().to_string()),
        ..Default::default()
    };

    match NewsManager::create(ctx.db(), new_news).await {
        Ok(created) => {
            tracing::info!(news_id = created.id, "news published");
            ctx.render("newsSuccess.html", json!({}))
        }
        Err(_) => Ok(failure(
            "Une erreur s'est produite lors de l'enregistrement de l'actualité.",
        )),
    }
}
