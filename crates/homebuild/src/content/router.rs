use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::domain::{Banner, BlogPost, Promotion};
use super::service::ContentService;
use crate::records::{admin_routes, PageQuery, RecordError};

/// Public reads under `/v1` and admin CRUD under `/admin`.
pub fn content_router(service: Arc<ContentService>) -> Router {
    Router::new()
        .merge(admin_routes::<ContentService, BlogPost>("/admin/blog/posts"))
        .merge(admin_routes::<ContentService, Banner>("/admin/banners"))
        .merge(admin_routes::<ContentService, Promotion>("/admin/promotions"))
        .route("/v1/blog/posts", get(published_posts_handler))
        .route("/v1/blog/posts/:slug", get(published_post_handler))
        .route("/v1/banners", get(active_banners_handler))
        .route("/v1/promotions", get(running_promotions_handler))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PromotionQuery {
    on: Option<NaiveDate>,
}

pub(crate) async fn published_posts_handler(
    State(service): State<Arc<ContentService>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, RecordError> {
    Ok(Json(service.published_posts(&query)?))
}

pub(crate) async fn published_post_handler(
    State(service): State<Arc<ContentService>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, RecordError> {
    Ok(Json(service.published_post(&slug)?))
}

pub(crate) async fn active_banners_handler(
    State(service): State<Arc<ContentService>>,
) -> Result<impl IntoResponse, RecordError> {
    Ok(Json(service.active_banners()?))
}

/// `?on=YYYY-MM-DD`, defaulting to today in UTC.
pub(crate) async fn running_promotions_handler(
    State(service): State<Arc<ContentService>>,
    Query(query): Query<PromotionQuery>,
) -> Result<impl IntoResponse, RecordError> {
    let on = query.on.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(service.running_promotions(on)?))
}
