use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::info;

use crate::config::Page;
use crate::db::Database;
use crate::store::CollectionStore;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub pages: Arc<[Page]>,
}

impl AppState {
    pub fn new(db: Arc<Database>, pages: Vec<Page>) -> Self {
        Self {
            db,
            pages: pages.into(),
        }
    }

    /// Store for a configured collection, `None` for names no page uses.
    pub fn store(&self, collection: &str) -> Option<CollectionStore> {
        self.pages
            .iter()
            .any(|p| p.collection == collection)
            .then(|| CollectionStore::new(self.db.clone(), collection))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse { data })).into_response()
}

pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse { data })).into_response()
}

pub fn error_response(status: StatusCode, msg: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found")
}
