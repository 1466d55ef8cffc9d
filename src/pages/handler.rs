use std::sync::Arc;

use axum::{
    Extension, Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::render::{self, PageView, page_href};
use crate::config::Page;
use crate::controller::{MediaListController, MediaListState};
use crate::handler::AppState;
use crate::model::RecordId;
use crate::store::CollectionStore;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub q: String,
    pub show: Option<RecordId>,
    pub banner: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub id: RecordId,
    #[serde(default)]
    pub q: String,
}

fn controller(state: &AppState, page: &Page, query: &str) -> MediaListController<CollectionStore> {
    let mut ctl = MediaListController::new(CollectionStore::new(state.db.clone(), &page.collection));
    if page.search {
        ctl.set_search(query);
    }
    ctl
}

fn back_to(page: &Page, ctl: &MediaListController<CollectionStore>) -> Response {
    Redirect::to(&page_href(page, &[("q", ctl.state().search.as_str())])).into_response()
}

fn respond(
    state: &AppState,
    page: &Page,
    list: &MediaListState,
    banner: Option<usize>,
    loaded: bool,
    status: StatusCode,
) -> Response {
    let view = PageView {
        page,
        pages: &state.pages,
        state: list,
        banner,
        load_failed: !loaded,
    };
    let status = if loaded { status } else { StatusCode::SERVICE_UNAVAILABLE };
    (status, render::page(&view)).into_response()
}

pub async fn show_page(
    State(state): State<AppState>,
    Extension(page): Extension<Arc<Page>>,
    Query(params): Query<PageParams>,
) -> Response {
    let mut ctl = controller(&state, &page, &params.q);
    let loaded = ctl.refresh().await.is_ok();
    if let Some(id) = params.show {
        ctl.select_id(id);
    }

    respond(&state, &page, &ctl.state(), params.banner, loaded, StatusCode::OK)
}

pub async fn add_media(
    State(state): State<AppState>,
    Extension(page): Extension<Arc<Page>>,
    Form(form): Form<AddForm>,
) -> Response {
    let mut ctl = controller(&state, &page, &form.q);

    match ctl.add(&form.title, &form.url).await {
        Ok(_) => back_to(&page, &ctl),
        Err(e) => {
            let status = if e.is_validation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            let loaded = ctl.refresh().await.is_ok();
            respond(&state, &page, &ctl.state(), None, loaded, status)
        }
    }
}

pub async fn delete_media(
    State(state): State<AppState>,
    Extension(page): Extension<Arc<Page>>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let mut ctl = controller(&state, &page, &form.q);

    match ctl.delete(form.id).await {
        Ok(_) => back_to(&page, &ctl),
        Err(_) => {
            let loaded = ctl.refresh().await.is_ok();
            respond(
                &state,
                &page,
                &ctl.state(),
                None,
                loaded,
                StatusCode::SERVICE_UNAVAILABLE,
            )
        }
    }
}
