//! Persistence seams.
//!
//! `DocumentStore` holds content collections as JSON documents keyed by an
//! application-level string `id`; `UserStore` holds credentials; `ObjectStore`
//! holds uploaded blobs. `AppState` carries each as an `Arc<dyn …>` so the
//! Postgres/S3 backends can be swapped for in-memory ones in tests.

#[cfg(test)]
pub mod memory;
pub mod object;
pub mod postgres;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::membership::MembershipTier;
use crate::models::user::UserRecord;

pub use object::{ObjectStore, S3ObjectStore};
pub use postgres::{PgDocumentStore, PgUserStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate {0}")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("object store error: {0}")]
    Object(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Named document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Courses,
    Lessons,
    PodcastEpisodes,
    Resources,
    CommunityPosts,
    NewsArticles,
    SiteContent,
    ContactSubmissions,
    UploadedFiles,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Courses => "courses",
            Collection::Lessons => "lessons",
            Collection::PodcastEpisodes => "podcast_episodes",
            Collection::Resources => "resources",
            Collection::CommunityPosts => "community_posts",
            Collection::NewsArticles => "news_articles",
            Collection::SiteContent => "site_content",
            Collection::ContactSubmissions => "contact_submissions",
            Collection::UploadedFiles => "uploaded_files",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortBy {
    pub field: &'static str,
    pub descending: bool,
}

/// Equality filter with optional ordering and limit.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filter: Map<String, Value>,
    pub sort: Option<SortBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter.insert(field.to_string(), value.into());
        self
    }

    pub fn eq_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn newest_first(mut self, field: &'static str) -> Self {
        self.sort = Some(SortBy {
            field,
            descending: true,
        });
        self
    }

    pub fn ascending(mut self, field: &'static str) -> Self {
        self.sort = Some(SortBy {
            field,
            descending: false,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn count(&self, collection: Collection) -> Result<u64, StoreError>;

    /// Counts documents whose string `field` contains `needle`.
    async fn count_containing(
        &self,
        collection: Collection,
        field: &str,
        needle: &str,
    ) -> Result<u64, StoreError>;

    async fn find(&self, collection: Collection, query: &Query) -> Result<Vec<Value>, StoreError>;

    async fn find_by_id(&self, collection: Collection, id: &str)
        -> Result<Option<Value>, StoreError>;

    /// Inserts all documents or none. Every document must carry a string `id`.
    async fn insert_many(&self, collection: Collection, docs: Vec<Value>)
        -> Result<u64, StoreError>;

    async fn upsert(&self, collection: Collection, doc: Value) -> Result<(), StoreError>;

    /// Swaps the whole collection for `docs` in one step. On error the
    /// previous contents stay in place. Returns `(deleted, inserted)`.
    async fn replace_all(
        &self,
        collection: Collection,
        docs: Vec<Value>,
    ) -> Result<(u64, u64), StoreError>;

    /// Sets `field = value` on documents where `match_field == match_value`.
    /// Returns the number of documents whose value actually changed.
    async fn set_field_where(
        &self,
        collection: Collection,
        match_field: &str,
        match_value: &str,
        field: &str,
        value: Value,
    ) -> Result<u64, StoreError>;
}

/// Credential store. Implementations must reject a second user with the same
/// email with `StoreError::Duplicate`, atomically with the insert.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn insert(&self, record: &UserRecord) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    async fn count_by_tier(&self, tier: MembershipTier) -> Result<u64, StoreError>;
}

pub async fn find_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    query: &Query,
) -> Result<Vec<T>, StoreError> {
    store
        .find(collection, query)
        .await?
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
        .collect()
}

pub async fn get_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
) -> Result<Option<T>, StoreError> {
    store
        .find_by_id(collection, id)
        .await?
        .map(serde_json::from_value)
        .transpose()
        .map_err(StoreError::from)
}

pub fn to_documents<T: Serialize>(items: &[T]) -> Result<Vec<Value>, StoreError> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(StoreError::from))
        .collect()
}

pub(crate) fn document_id(doc: &Value) -> Result<&str, StoreError> {
    doc.get("id").and_then(Value::as_str).ok_or_else(|| {
        StoreError::Serialization(serde::de::Error::custom("document is missing a string `id`"))
    })
}
