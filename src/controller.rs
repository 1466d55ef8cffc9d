//! Fetch-after-mutation orchestration over one [`RecordStore`].
//!
//! The controller never trusts local state: every successful add or delete is
//! followed by a full refresh from the store. Its state is a snapshot behind an
//! [`Arc`]; each change builds a new snapshot, so a reader holding an older one
//! never observes a partial update.

use std::sync::Arc;

use crate::classify::{ContentKind, classify};
use crate::error::{ControllerError, StoreError};
use crate::model::{MediaRecord, NewMedia, RecordId};
use crate::search;
use crate::store::RecordStore;

pub const MISSING_TITLE: &str = "Please enter a title.";
pub const MISSING_URL: &str = "Please enter a URL.";
pub const SAVE_FAILED: &str = "Could not save the media, please try again.";
pub const DELETE_FAILED: &str = "Could not delete the media, please try again.";

/// Both fields must be non-empty. Values are stored exactly as submitted.
pub fn validate(title: &str, url: &str) -> Result<NewMedia, &'static str> {
    if title.is_empty() {
        return Err(MISSING_TITLE);
    }
    if url.is_empty() {
        return Err(MISSING_URL);
    }
    Ok(NewMedia {
        title: title.to_string(),
        url: url.to_string(),
    })
}

/// Contents of the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaForm {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Default)]
pub struct MediaListState {
    pub records: Vec<MediaRecord>,
    pub form: MediaForm,
    pub search: String,
    /// Image url shown enlarged above the list.
    pub displayed_image: Option<String>,
    /// Inline message from the last failed action.
    pub error: Option<String>,
}

impl MediaListState {
    /// Records that pass the current search term.
    pub fn visible(&self) -> Vec<MediaRecord> {
        search::filter(&self.records, &self.search)
    }
}

/// What a delete did to the store. Both outcomes end with the record absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deleted {
    Removed,
    AlreadyGone,
}

pub struct MediaListController<S> {
    store: S,
    state: Arc<MediaListState>,
}

impl<S: RecordStore> MediaListController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: Arc::new(MediaListState::default()),
        }
    }

    pub fn state(&self) -> Arc<MediaListState> {
        Arc::clone(&self.state)
    }

    fn replace(&mut self, f: impl FnOnce(&mut MediaListState)) {
        let mut next = MediaListState::clone(&self.state);
        f(&mut next);
        self.state = Arc::new(next);
    }

    pub fn set_form(&mut self, title: &str, url: &str) {
        self.replace(|s| {
            s.form = MediaForm {
                title: title.to_string(),
                url: url.to_string(),
            }
        });
    }

    pub fn set_search(&mut self, query: &str) {
        self.replace(|s| s.search = query.to_string());
    }

    pub fn clear_search(&mut self) {
        self.set_search("");
    }

    /// Enlarges the record when it is an image, clears the display otherwise.
    pub fn select(&mut self, record: &MediaRecord) {
        let displayed = match classify(&record.url) {
            ContentKind::Image => Some(record.url.clone()),
            _ => None,
        };
        self.replace(|s| s.displayed_image = displayed);
    }

    /// Same as [`select`](Self::select) for a record of the current list, by id.
    /// Unknown ids clear the display.
    pub fn select_id(&mut self, id: RecordId) {
        match self.state.records.iter().find(|r| r.id == id).cloned() {
            Some(record) => self.select(&record),
            None => self.replace(|s| s.displayed_image = None),
        }
    }

    /// Replaces the record list wholesale with what the store holds now.
    /// On failure the previous list stays.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        match self.store.list().await {
            Ok(records) => {
                self.replace(|s| s.records = records);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to refresh media list");
                Err(e)
            }
        }
    }

    /// Submits a new record. Empty fields are rejected before the store is
    /// contacted. The inputs are only cleared once the store accepted the record.
    pub async fn add(&mut self, title: &str, url: &str) -> Result<MediaRecord, ControllerError> {
        self.set_form(title, url);

        let input = match validate(title, url) {
            Ok(input) => input,
            Err(msg) => {
                self.replace(|s| s.error = Some(msg.to_string()));
                return Err(ControllerError::Validation(msg));
            }
        };

        let record = match self.store.insert(input).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(error = %e, "failed to add media");
                self.replace(|s| s.error = Some(SAVE_FAILED.to_string()));
                return Err(e.into());
            }
        };

        tracing::info!(id = %record.id, "added media");
        self.replace(|s| {
            s.form = MediaForm::default();
            s.error = None;
        });
        // The insert already succeeded; a failed refresh only leaves the list stale.
        self.refresh().await.ok();

        Ok(record)
    }

    /// Deletes a record. A record that is already gone counts as success.
    pub async fn delete(&mut self, id: RecordId) -> Result<Deleted, ControllerError> {
        let outcome = match self.store.delete(id).await {
            Ok(()) => Deleted::Removed,
            Err(StoreError::NotFound(_)) => {
                tracing::info!(id = %id, "media already deleted");
                Deleted::AlreadyGone
            }
            Err(e) => {
                tracing::error!(error = %e, id = %id, "failed to delete media");
                self.replace(|s| s.error = Some(DELETE_FAILED.to_string()));
                return Err(e.into());
            }
        };

        self.refresh().await.ok();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory store that counts calls and can be switched offline.
    #[derive(Default)]
    struct FakeStore {
        records: Mutex<Vec<MediaRecord>>,
        next_id: AtomicUsize,
        calls: AtomicUsize,
        offline: AtomicBool,
        list_offline: AtomicBool,
    }

    impl FakeStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn set_list_offline(&self, offline: bool) {
            self.list_offline.store(offline, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("offline".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        async fn list(&self) -> Result<Vec<MediaRecord>, StoreError> {
            self.check()?;
            if self.list_offline.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("list offline".to_string()));
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn get(&self, id: RecordId) -> Result<Option<MediaRecord>, StoreError> {
            self.check()?;
            Ok(self.records.lock().unwrap().iter().find(|r| r.id == id).cloned())
        }

        async fn insert(&self, input: NewMedia) -> Result<MediaRecord, StoreError> {
            self.check()?;
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
            let record = MediaRecord {
                id: RecordId(id),
                title: input.title,
                url: input.url,
            };
            self.records.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.id != id);
            if records.len() == before {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        }
    }

    fn controller() -> (Arc<FakeStore>, MediaListController<Arc<FakeStore>>) {
        let store = Arc::new(FakeStore::default());
        (store.clone(), MediaListController::new(store))
    }

    #[tokio::test]
    async fn test_add_rejects_empty_fields_without_store_call() {
        let (store, mut ctl) = controller();

        let err = ctl.add("", "http://x").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(ctl.state().error.as_deref(), Some(MISSING_TITLE));

        let err = ctl.add("T", "").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(ctl.state().error.as_deref(), Some(MISSING_URL));

        assert_eq!(store.calls(), 0);
        assert_eq!(ctl.state().form.title, "T");
    }

    #[tokio::test]
    async fn test_add_clears_form_and_refreshes() {
        let (store, mut ctl) = controller();
        ctl.add("", "http://x").await.unwrap_err();

        let record = ctl.add("T", "http://x").await.unwrap();

        let state = ctl.state();
        assert_eq!(state.records, vec![record.clone()]);
        assert_eq!(state.form, MediaForm::default());
        assert_eq!(state.error, None);
        assert_eq!(record.title, "T");
        assert_eq!(record.url, "http://x");
        // insert + list
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_add_store_failure_keeps_inputs() {
        let (store, mut ctl) = controller();
        ctl.add("kept", "kept.png").await.unwrap();
        store.set_offline(true);

        let err = ctl.add("T", "http://x").await.unwrap_err();
        assert!(matches!(err, ControllerError::Store(StoreError::Unavailable(_))));

        let state = ctl.state();
        assert_eq!(state.form.title, "T");
        assert_eq!(state.form.url, "http://x");
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].title, "kept");
        assert_eq!(state.error.as_deref(), Some(SAVE_FAILED));
    }

    #[test]
    fn test_validate_keeps_fields_as_given() {
        let input = validate("  Cat ", " cat.png\n").unwrap();
        assert_eq!(input.title, "  Cat ");
        assert_eq!(input.url, " cat.png\n");
        assert_eq!(validate(" ", " ").unwrap().title, " ");
        assert_eq!(validate("", "").unwrap_err(), MISSING_TITLE);
        assert_eq!(validate("T", "").unwrap_err(), MISSING_URL);
    }

    #[tokio::test]
    async fn test_add_stores_whitespace_verbatim() {
        let db = Arc::new(crate::db::Database::in_memory().await.unwrap());
        let store = crate::store::CollectionStore::new(db, "urls");
        let mut ctl = MediaListController::new(store.clone());

        let record = ctl.add("  T  ", " http://x ").await.unwrap();
        assert_eq!(record.title, "  T  ");
        assert_eq!(record.url, " http://x ");

        let blank = ctl.add(" ", "http://x").await.unwrap();
        assert_eq!(blank.title, " ");

        let stored = store.list().await.unwrap();
        assert_eq!(stored, vec![record, blank]);
        assert_eq!(ctl.state().records, stored);
    }

    #[tokio::test]
    async fn test_add_succeeds_when_refresh_fails() {
        let (store, mut ctl) = controller();
        store.set_list_offline(true);

        let record = ctl.add("T", "http://x").await.unwrap();

        let state = ctl.state();
        assert!(state.records.is_empty());
        assert_eq!(state.form, MediaForm::default());
        assert_eq!(state.error, None);
        assert_eq!(store.records.lock().unwrap().clone(), vec![record]);
    }

    #[tokio::test]
    async fn test_delete_then_list() {
        let (_store, mut ctl) = controller();
        let a = ctl.add("a", "a.png").await.unwrap();
        let b = ctl.add("b", "b.mp4").await.unwrap();

        assert_eq!(ctl.delete(a.id).await.unwrap(), Deleted::Removed);
        assert_eq!(ctl.state().records, vec![b]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_benign() {
        let (store, mut ctl) = controller();
        ctl.add("a", "a.png").await.unwrap();
        let before = ctl.state().records.clone();
        let calls = store.calls();

        assert_eq!(ctl.delete(RecordId(999)).await.unwrap(), Deleted::AlreadyGone);
        assert_eq!(ctl.state().records, before);
        // delete + refresh
        assert_eq!(store.calls(), calls + 2);
    }

    #[tokio::test]
    async fn test_delete_store_failure_keeps_list() {
        let (store, mut ctl) = controller();
        let a = ctl.add("a", "a.png").await.unwrap();
        store.set_offline(true);

        assert!(ctl.delete(a.id).await.is_err());
        assert_eq!(ctl.state().records, vec![a]);
        assert_eq!(ctl.state().error.as_deref(), Some(DELETE_FAILED));
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let (store, mut ctl) = controller();
        let old = ctl.state();

        store
            .insert(NewMedia {
                title: "outside".to_string(),
                url: "https://example.com".to_string(),
            })
            .await
            .unwrap();
        ctl.refresh().await.unwrap();

        assert!(old.records.is_empty());
        assert_eq!(ctl.state().records.len(), 1);
    }

    #[tokio::test]
    async fn test_search_narrows_visible_records() {
        let (_store, mut ctl) = controller();
        ctl.add("Flexbox guide", "https://example.com/flex").await.unwrap();
        ctl.add("Grid", "grid.png").await.unwrap();

        ctl.set_search("flex");
        let visible = ctl.state().visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Flexbox guide");

        ctl.clear_search();
        assert_eq!(ctl.state().visible().len(), 2);
    }

    #[tokio::test]
    async fn test_select_only_displays_images() {
        let (_store, mut ctl) = controller();
        let image = ctl.add("cat", "cat.PNG").await.unwrap();
        let page = ctl.add("docs", "https://example.com/docs").await.unwrap();

        ctl.select_id(image.id);
        assert_eq!(ctl.state().displayed_image.as_deref(), Some("cat.PNG"));

        ctl.select_id(page.id);
        assert_eq!(ctl.state().displayed_image, None);

        ctl.select(&image);
        ctl.select_id(RecordId(12345));
        assert_eq!(ctl.state().displayed_image, None);
    }
}
