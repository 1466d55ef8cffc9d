use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};

use super::handler;
use crate::config::Page;
use crate::handler::AppState;

pub fn routes(page: Page) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::show_page))
        .route("/add", post(handler::add_media))
        .route("/delete", post(handler::delete_media))
        .layer(Extension(Arc::new(page)))
}
