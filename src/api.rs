//! JSON endpoints over a collection: `/api/:collection`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::controller::validate;
use crate::error::StoreError;
use crate::handler::{AppState, created, error_response, success};
use crate::model::{MediaView, RecordId};
use crate::store::{CollectionStore, RecordStore};

#[derive(Debug, Deserialize)]
pub struct CreateMediaRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteMediaRequest {
    pub id: RecordId,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<'a> {
    pub urls: Vec<MediaView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:collection",
            get(list_media).post(create_media).delete(delete_media),
        )
        .route("/:collection/:id", get(get_media))
}

fn store_or_404(state: &AppState, collection: &str) -> Result<CollectionStore, Response> {
    state.store(collection).ok_or_else(|| {
        tracing::info!(collection, "request for unknown collection");
        error_response(StatusCode::NOT_FOUND, "Collection not found")
    })
}

fn unavailable(action: &str, e: &StoreError) -> Response {
    tracing::error!(error = %e, "failed to {}", action);
    error_response(StatusCode::SERVICE_UNAVAILABLE, &format!("Failed to {}", action))
}

pub async fn list_media(State(state): State<AppState>, Path(collection): Path<String>) -> Response {
    let store = match store_or_404(&state, &collection) {
        Ok(store) => store,
        Err(resp) => return resp,
    };

    match store.list().await {
        Ok(records) => {
            let body = ListResponse {
                urls: records.iter().map(MediaView::from).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => unavailable("list media", &e),
    }
}

pub async fn get_media(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, RecordId)>,
) -> Response {
    let store = match store_or_404(&state, &collection) {
        Ok(store) => store,
        Err(resp) => return resp,
    };

    match store.get(id).await {
        Ok(Some(record)) => success(MediaView::from(&record)),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Media not found"),
        Err(e) => unavailable("get media", &e),
    }
}

pub async fn create_media(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(payload): Json<CreateMediaRequest>,
) -> Response {
    let store = match store_or_404(&state, &collection) {
        Ok(store) => store,
        Err(resp) => return resp,
    };

    let input = match validate(&payload.title, &payload.url) {
        Ok(input) => input,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, msg),
    };

    match store.insert(input).await {
        Ok(record) => {
            tracing::info!(collection = %collection, id = %record.id, "created media");
            created(MediaView::from(&record))
        }
        Err(e) => unavailable("create media", &e),
    }
}

pub async fn delete_media(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(payload): Json<DeleteMediaRequest>,
) -> Response {
    let store = match store_or_404(&state, &collection) {
        Ok(store) => store,
        Err(resp) => return resp,
    };

    match store.delete(payload.id).await {
        Ok(()) => success(DeleteResponse { deleted: true }),
        Err(StoreError::NotFound(id)) => {
            tracing::info!(collection = %collection, id = %id, "delete of missing media");
            success(DeleteResponse { deleted: false })
        }
        Err(e) => unavailable("delete media", &e),
    }
}
