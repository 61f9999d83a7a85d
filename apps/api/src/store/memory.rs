//! In-memory store doubles used by unit and router tests.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::membership::MembershipTier;
use crate::models::user::UserRecord;
use crate::store::{
    document_id, Collection, DocumentStore, ObjectStore, Query, StoreError, UserStore,
};

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<Collection, Vec<Value>>>,
    failing: Mutex<HashSet<Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation on `collection` fail as if the store were down.
    pub fn fail_on(&self, collection: Collection) {
        self.failing.lock().unwrap().insert(collection);
    }

    pub fn snapshot(&self, collection: Collection) -> Vec<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self, collection: Collection) -> Result<(), StoreError> {
        if self.failing.lock().unwrap().contains(&collection) {
            return Err(StoreError::Unavailable(format!(
                "{} is unreachable",
                collection.name()
            )));
        }
        Ok(())
    }
}

fn matches_filter(doc: &Value, query: &Query) -> bool {
    query
        .filter
        .iter()
        .all(|(field, expected)| doc.get(field) == Some(expected))
}

fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        self.check(collection)?;
        Ok(self.snapshot(collection).len() as u64)
    }

    async fn count_containing(
        &self,
        collection: Collection,
        field: &str,
        needle: &str,
    ) -> Result<u64, StoreError> {
        self.check(collection)?;
        Ok(self
            .snapshot(collection)
            .iter()
            .filter(|doc| {
                doc.get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|v| v.contains(needle))
            })
            .count() as u64)
    }

    async fn find(&self, collection: Collection, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.check(collection)?;
        let mut docs: Vec<Value> = self
            .snapshot(collection)
            .into_iter()
            .filter(|doc| matches_filter(doc, query))
            .collect();
        if let Some(sort) = query.sort {
            docs.sort_by(|a, b| {
                let ord = compare_field(a.get(sort.field), b.get(sort.field));
                if sort.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Value>, StoreError> {
        self.check(collection)?;
        Ok(self
            .snapshot(collection)
            .into_iter()
            .find(|doc| doc.get("id").and_then(Value::as_str) == Some(id)))
    }

    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<Value>,
    ) -> Result<u64, StoreError> {
        self.check(collection)?;
        let mut collections = self.collections.lock().unwrap();
        let existing = collections.entry(collection).or_default();
        let mut seen: HashSet<String> = existing
            .iter()
            .filter_map(|d| d.get("id").and_then(Value::as_str).map(String::from))
            .collect();
        for doc in &docs {
            let id = document_id(doc)?;
            if !seen.insert(id.to_string()) {
                return Err(StoreError::Duplicate(format!("{} id {id}", collection.name())));
            }
        }
        let inserted = docs.len() as u64;
        existing.extend(docs);
        Ok(inserted)
    }

    async fn upsert(&self, collection: Collection, doc: Value) -> Result<(), StoreError> {
        self.check(collection)?;
        let id = document_id(&doc)?.to_string();
        let mut collections = self.collections.lock().unwrap();
        let existing = collections.entry(collection).or_default();
        match existing
            .iter_mut()
            .find(|d| d.get("id").and_then(Value::as_str) == Some(id.as_str()))
        {
            Some(slot) => *slot = doc,
            None => existing.push(doc),
        }
        Ok(())
    }

    async fn replace_all(
        &self,
        collection: Collection,
        docs: Vec<Value>,
    ) -> Result<(u64, u64), StoreError> {
        self.check(collection)?;
        let mut seen = HashSet::new();
        for doc in &docs {
            let id = document_id(doc)?;
            if !seen.insert(id) {
                return Err(StoreError::Duplicate(format!("{} id {id}", collection.name())));
            }
        }
        let inserted = docs.len() as u64;
        let previous = self.collections.lock().unwrap().insert(collection, docs);
        Ok((previous.map_or(0, |d| d.len() as u64), inserted))
    }

    async fn set_field_where(
        &self,
        collection: Collection,
        match_field: &str,
        match_value: &str,
        field: &str,
        value: Value,
    ) -> Result<u64, StoreError> {
        self.check(collection)?;
        let mut collections = self.collections.lock().unwrap();
        let mut modified = 0;
        for doc in collections.entry(collection).or_default().iter_mut() {
            let is_match = doc.get(match_field).and_then(Value::as_str) == Some(match_value);
            if is_match && doc.get(field) != Some(&value) {
                if let Some(obj) = doc.as_object_mut() {
                    obj.insert(field.to_string(), value.clone());
                    modified += 1;
                }
            }
        }
        Ok(modified)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tier(&self, email: &str, tier: MembershipTier) {
        let mut users = self.users.lock().unwrap();
        if let Some(record) = users.iter_mut().find(|r| r.user.email == email) {
            record.user.membership_tier = tier;
        }
    }

    pub fn remove(&self, id: &str) {
        self.users.lock().unwrap().retain(|r| r.user.id != id);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|r| r.user.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|r| r.user.id == id).cloned())
    }

    async fn insert(&self, record: &UserRecord) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|r| r.user.email == record.user.email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }
        users.push(record.clone());
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.users.lock().unwrap().len() as u64)
    }

    async fn count_by_tier(&self, tier: MembershipTier) -> Result<u64, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|r| r.user.membership_tier == tier)
            .count() as u64)
    }
}

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, (String, Bytes)>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<(String, Bytes)> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_file(
        &self,
        source: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let data = tokio::fs::read(source).await?;
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (content_type.to_string(), Bytes::from(data)));
        Ok(format!("https://cdn.test/{key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_field_counts_only_changed_documents() {
        let store = MemoryDocumentStore::new();
        store
            .insert_many(
                Collection::Courses,
                vec![
                    json!({"id": "1", "title": "A", "thumbnail": "old"}),
                    json!({"id": "2", "title": "B", "thumbnail": "new"}),
                ],
            )
            .await
            .unwrap();

        let changed = store
            .set_field_where(Collection::Courses, "title", "A", "thumbnail", json!("new"))
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let again = store
            .set_field_where(Collection::Courses, "title", "A", "thumbnail", json!("new"))
            .await
            .unwrap();
        assert_eq!(again, 0);
    }

    #[tokio::test]
    async fn test_insert_many_is_all_or_nothing_on_duplicate_ids() {
        let store = MemoryDocumentStore::new();
        let result = store
            .insert_many(
                Collection::Resources,
                vec![json!({"id": "x"}), json!({"id": "x"})],
            )
            .await;
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
        assert_eq!(store.count(Collection::Resources).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replace_all_keeps_previous_contents_on_duplicate_ids() {
        let store = MemoryDocumentStore::new();
        store
            .replace_all(
                Collection::PodcastEpisodes,
                vec![json!({"id": "a"}), json!({"id": "b"})],
            )
            .await
            .unwrap();

        let result = store
            .replace_all(
                Collection::PodcastEpisodes,
                vec![json!({"id": "x"}), json!({"id": "x"})],
            )
            .await;
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
        assert_eq!(store.count(Collection::PodcastEpisodes).await.unwrap(), 2);

        let swapped = store
            .replace_all(Collection::PodcastEpisodes, vec![json!({"id": "c"})])
            .await
            .unwrap();
        assert_eq!(swapped, (2, 1));
    }
}
