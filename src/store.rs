//! Persistence of media records.
//!
//! [`RecordStore`] is the boundary the controller talks to. [`CollectionStore`] is
//! the libsql-backed implementation: every page variant gets its own collection
//! inside the shared `media` table.

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::Database;
use crate::error::StoreError;
use crate::model::{MediaRecord, NewMedia, RecordId};

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records, oldest first.
    async fn list(&self) -> Result<Vec<MediaRecord>, StoreError>;

    async fn get(&self, id: RecordId) -> Result<Option<MediaRecord>, StoreError>;

    /// Stores the record and returns it with its freshly assigned id.
    async fn insert(&self, input: NewMedia) -> Result<MediaRecord, StoreError>;

    /// Fails with [`StoreError::NotFound`] when no such record exists.
    async fn delete(&self, id: RecordId) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn list(&self) -> Result<Vec<MediaRecord>, StoreError> {
        (**self).list().await
    }

    async fn get(&self, id: RecordId) -> Result<Option<MediaRecord>, StoreError> {
        (**self).get(id).await
    }

    async fn insert(&self, input: NewMedia) -> Result<MediaRecord, StoreError> {
        (**self).insert(input).await
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }
}

#[derive(Clone)]
pub struct CollectionStore {
    db: Arc<Database>,
    collection: Arc<str>,
}

impl CollectionStore {
    pub fn new(db: Arc<Database>, collection: &str) -> Self {
        Self {
            db,
            collection: Arc::from(collection),
        }
    }

    fn row_to_record(row: &libsql::Row) -> Result<MediaRecord, StoreError> {
        Ok(MediaRecord {
            id: RecordId(row.get(0)?),
            title: row.get(1)?,
            url: row.get(2)?,
        })
    }
}

#[async_trait]
impl RecordStore for CollectionStore {
    async fn list(&self) -> Result<Vec<MediaRecord>, StoreError> {
        let query = r#"
            SELECT id, title, url
            FROM media
            WHERE collection = ?
            ORDER BY id ASC
        "#;

        let mut rows = self
            .db
            .connection()
            .query(query, libsql::params![self.collection.as_ref()])
            .await?;
        let mut records = Vec::new();

        while let Some(row) = rows.next().await? {
            records.push(Self::row_to_record(&row)?);
        }

        Ok(records)
    }

    async fn get(&self, id: RecordId) -> Result<Option<MediaRecord>, StoreError> {
        let query = r#"
            SELECT id, title, url
            FROM media
            WHERE collection = ? AND id = ?
        "#;

        let mut rows = self
            .db
            .connection()
            .query(query, libsql::params![self.collection.as_ref(), id.0])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, input: NewMedia) -> Result<MediaRecord, StoreError> {
        let query = r#"
            INSERT INTO media (collection, title, url)
            VALUES (?, ?, ?)
            RETURNING id, title, url
        "#;

        let mut rows = self
            .db
            .connection()
            .query(
                query,
                libsql::params![self.collection.as_ref(), input.title, input.url],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Self::row_to_record(&row),
            None => Err(StoreError::Unavailable("insert returned no row".to_string())),
        }
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        let deleted = self
            .db
            .connection()
            .execute(
                "DELETE FROM media WHERE collection = ? AND id = ?",
                libsql::params![self.collection.as_ref(), id.0],
            )
            .await?;

        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
