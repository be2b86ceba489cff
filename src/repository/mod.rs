//! Record store adapter.
//!
//! Persistence is a plain mapping from collection name to a JSON array.
//! Callers read a whole collection, change it in memory and write it back;
//! there is no partial update and no locking between writers, so two
//! concurrent replace-alls on the same collection are last-write-wins.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    domain::{Club, Event, User},
    error::Result,
};

pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

/// Backend holding serialized collections under string keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>>;
    async fn write(&self, key: &str, value: String) -> Result<()>;
    /// Writes every entry or none of them.
    async fn write_many(&self, entries: Vec<(String, String)>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Clubs,
    Events,
}

impl Collection {
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Clubs => "clubs",
            Collection::Events => "events",
        }
    }
}

/// A flat record stored in one of the named collections.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Club {
    const COLLECTION: Collection = Collection::Clubs;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Event {
    const COLLECTION: Collection = Collection::Events;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Typed get-all / replace-all access over a [`KeyValueStore`].
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Raw backend, for collaborators that keep their own keys.
    pub fn backend(&self) -> Arc<dyn KeyValueStore> {
        self.backend.clone()
    }

    /// Full collection in stored order; empty if never initialised.
    pub async fn get_all<T: Record>(&self) -> Result<Vec<T>> {
        match self.backend.read(T::COLLECTION.key()).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn replace_all<T: Record>(&self, records: &[T]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.backend.write(T::COLLECTION.key(), raw).await
    }

    /// Replaces two collections in one atomic backend write.
    pub async fn replace_all_pair<A: Record, B: Record>(&self, first: &[A], second: &[B]) -> Result<()> {
        let entries = vec![
            (A::COLLECTION.key().to_string(), serde_json::to_string(first)?),
            (B::COLLECTION.key().to_string(), serde_json::to_string(second)?),
        ];
        self.backend.write_many(entries).await
    }

    pub async fn find<T: Record>(&self, id: &str) -> Result<Option<T>> {
        Ok(self.get_all::<T>().await?.into_iter().find(|r| r.id() == id))
    }

    pub async fn is_initialized(&self, collection: Collection) -> Result<bool> {
        Ok(self.backend.read(collection.key()).await?.is_some())
    }

    /// Writes the three collections unless `users` already exists.
    /// Returns whether anything was written.
    pub async fn seed_if_empty(&self, users: &[User], clubs: &[Club], events: &[Event]) -> Result<bool> {
        if self.is_initialized(Collection::Users).await? {
            return Ok(false);
        }
        self.seed(users, clubs, events).await?;
        Ok(true)
    }

    /// Unconditionally overwrites the three collections.
    pub async fn seed(&self, users: &[User], clubs: &[Club], events: &[Event]) -> Result<()> {
        let entries = vec![
            (Collection::Users.key().to_string(), serde_json::to_string(users)?),
            (Collection::Clubs.key().to_string(), serde_json::to_string(clubs)?),
            (Collection::Events.key().to_string(), serde_json::to_string(events)?),
        ];
        self.backend.write_many(entries).await
    }
}
