use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use super::domain::{Record, RecordId};
use super::store::{RecordError, RecordStore};
use super::table::PageQuery;

/// Admin CRUD routes for one collection: `GET`/`POST` on `collection`, and
/// `GET`/`PUT`/`DELETE` on `collection/:id`.
pub fn admin_routes<S, T>(collection: &str) -> Router<Arc<S>>
where
    S: RecordStore<T> + 'static,
    T: Record,
{
    Router::new()
        .route(
            collection,
            get(list_handler::<S, T>).post(create_handler::<S, T>),
        )
        .route(
            &format!("{collection}/:id"),
            get(fetch_handler::<S, T>)
                .put(update_handler::<S, T>)
                .delete(delete_handler::<S, T>),
        )
}

pub(crate) async fn list_handler<S, T>(
    State(service): State<Arc<S>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, RecordError>
where
    S: RecordStore<T> + 'static,
    T: Record,
{
    let page = service.page(&query)?;
    Ok(Json(page))
}

pub(crate) async fn create_handler<S, T>(
    State(service): State<Arc<S>>,
    Json(draft): Json<T::Draft>,
) -> Result<impl IntoResponse, RecordError>
where
    S: RecordStore<T> + 'static,
    T: Record,
{
    let record = service.create(draft)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub(crate) async fn fetch_handler<S, T>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, RecordError>
where
    S: RecordStore<T> + 'static,
    T: Record,
{
    let record = service.get(&RecordId(id))?;
    Ok(Json(record))
}

pub(crate) async fn update_handler<S, T>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
    Json(draft): Json<T::Draft>,
) -> Result<impl IntoResponse, RecordError>
where
    S: RecordStore<T> + 'static,
    T: Record,
{
    let record = service.update(&RecordId(id), draft)?;
    Ok(Json(record))
}

pub(crate) async fn delete_handler<S, T>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, RecordError>
where
    S: RecordStore<T> + 'static,
    T: Record,
{
    service.delete(&RecordId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
