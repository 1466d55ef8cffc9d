use axum::{Router, routing::get};
use std::error::Error;

use crate::handler::AppState;

pub mod api;
pub mod assets;
pub mod classify;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod handler;
pub mod model;
pub mod pages;
pub mod search;
pub mod store;

pub fn unpack_error(err: &(dyn Error)) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

/// Builds the full application: health check, static assets, the JSON api and
/// one set of page routes per configured page.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/healthz", get(handler::healthcheck))
        .route("/static/*path", get(assets::serve_static))
        .nest("/api", api::routes());

    for page in state.pages.iter() {
        let routes = pages::routes(page.clone());
        app = match page.base() {
            "" => app.merge(routes),
            base => app.nest(base, routes),
        };
    }

    app.fallback(handler::not_found).with_state(state)
}
