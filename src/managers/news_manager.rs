use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::{full_update, updated};
use crate::error::DataAccessError;
use crate::models::news::{self, Column as NewsColumn, Entity as News};

pub struct NewsManager;

impl NewsManager {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_news: news::ActiveModel,
    ) -> Result<news::Model, DataAccessError> {
        new_news
            .insert(db)
            .await
            .map_err(|e| DataAccessError::log("create news", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        news_id: i32,
    ) -> Result<Option<news::Model>, DataAccessError> {
        News::find_by_id(news_id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find news by id", e))
    }

    pub async fn find_by_publication_date<C: ConnectionTrait>(
        db: &C,
        publication_date: NaiveDateTime,
    ) -> Result<Option<news::Model>, DataAccessError> {
        News::find()
            .filter(NewsColumn::PublicationDate.eq(publication_date))
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find news by publication date", e))
    }

    pub async fn find_latest<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Option<news::Model>, DataAccessError> {
        News::find()
            .order_by_desc(NewsColumn::PublicationDate)
            .order_by_desc(NewsColumn::Id)
            .one(db)
            .await
            .map_err(|e| DataAccessError::log("find latest news", e))
    }

    /// Actualités de la plus récente à la plus ancienne
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<news::Model>, DataAccessError> {
        News::find()
            .order_by_desc(NewsColumn::PublicationDate)
            .order_by_desc(NewsColumn::Id)
            .all(db)
            .await
            .map_err(|e| DataAccessError::log("find all news", e))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        news: news::Model,
    ) -> Result<Option<news::Model>, DataAccessError> {
        let active_model: news::ActiveModel = news.into();
        updated(full_update(active_model).update(db).await, "update news")
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, news_id: i32) -> Result<bool, DataAccessError> {
        News::delete_by_id(news_id)
            .exec(db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(|e| DataAccessError::log("delete news", e))
    }
}
