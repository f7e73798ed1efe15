//! Cache-aside contact repository.
//!
//! Reads check the cache first and populate it from the store on a miss.
//! Writes go to the store and then invalidate the affected keys; cached
//! values are never updated in place. Cache failures never fail a call:
//! reads fall back to the store and writes skip the cache.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::CACHE_KEY_ALL_CONTACTS;
use crate::domain::{Contact, NewContact};
use crate::errors::{AppError, AppResult};
use crate::infra::cache::{contact_key, CacheStore};
use crate::infra::store::ContactStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Contact repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// All contacts, possibly from a cached snapshot
    async fn get_all(&self) -> AppResult<Vec<Contact>>;

    /// One contact, possibly from cache. Unknown ids are never cached.
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Contact>>;

    /// Insert a contact and return it with its assigned id
    async fn add(&self, contact: NewContact) -> AppResult<Contact>;

    /// Overwrite all fields of an existing contact; `NotFound` if absent
    async fn update(&self, id: i32, contact: NewContact) -> AppResult<()>;

    /// Remove a contact; `NotFound` if absent
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// `ContactRepository` over a store with a cache in front of it.
pub struct CachedContactRepository {
    store: Arc<dyn ContactStore>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CachedContactRepository {
    pub fn new(store: Arc<dyn ContactStore>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    async fn read_cache<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    tracing::debug!(key, "cache hit");
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed, using store");
                None
            }
        }
    }

    async fn write_cache<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache serialization failed");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, json, self.ttl).await {
            tracing::warn!(key, error = %e, "cache write failed");
        }
    }

    async fn invalidate(&self, keys: &[&str]) {
        for key in keys {
            if let Err(e) = self.cache.delete(key).await {
                tracing::warn!(key, error = %e, "cache invalidation failed");
            }
        }
    }
}

#[async_trait]
impl ContactRepository for CachedContactRepository {
    async fn get_all(&self) -> AppResult<Vec<Contact>> {
        if let Some(contacts) = self.read_cache::<Vec<Contact>>(CACHE_KEY_ALL_CONTACTS).await {
            return Ok(contacts);
        }

        let contacts = self.store.find_all().await?;
        self.write_cache(CACHE_KEY_ALL_CONTACTS, &contacts).await;
        Ok(contacts)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Contact>> {
        let key = contact_key(id);
        if let Some(contact) = self.read_cache::<Contact>(&key).await {
            return Ok(Some(contact));
        }

        let contact = self.store.find_by_id(id).await?;
        if let Some(found) = &contact {
            self.write_cache(&key, found).await;
        }
        Ok(contact)
    }

    async fn add(&self, contact: NewContact) -> AppResult<Contact> {
        let created = self.store.insert(contact).await?;

        // The new record gets its own key lazily on first read
        self.invalidate(&[CACHE_KEY_ALL_CONTACTS]).await;

        tracing::info!(contact_id = created.id, "contact added");
        Ok(created)
    }

    async fn update(&self, id: i32, contact: NewContact) -> AppResult<()> {
        let mut existing = self.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        existing.overwrite(contact);
        self.store.update(existing).await?;

        self.invalidate(&[CACHE_KEY_ALL_CONTACTS, &contact_key(id)]).await;

        tracing::info!(contact_id = id, "contact updated");
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        if self.store.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound);
        }

        self.invalidate(&[CACHE_KEY_ALL_CONTACTS, &contact_key(id)]).await;

        tracing::info!(contact_id = id, "contact deleted");
        Ok(())
    }
}
