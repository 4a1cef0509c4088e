//! In-memory implementations of the token registries.
//!
//! State lives only for the lifetime of the process. A restart logs out every
//! refresh session and forgets every revocation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::{BlacklistRecord, RefreshTokenRecord};
use crate::errors::DomainError;

use super::r#trait::{BlacklistRepository, RefreshTokenRepository};

/// Records that know when they stop mattering
trait Expiring {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool;
}

impl Expiring for RefreshTokenRecord {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        RefreshTokenRecord::is_expired_at(self, now)
    }
}

impl Expiring for BlacklistRecord {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        BlacklistRecord::is_expired_at(self, now)
    }
}

/// Token-keyed map shared by both stores
struct ExpiringRegistry<V> {
    entries: Arc<RwLock<HashMap<String, V>>>,
}

impl<V: Expiring + Clone> ExpiringRegistry<V> {
    fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn insert(&self, token: String, record: V) {
        self.entries.write().await.insert(token, record);
    }

    async fn find(&self, token: &str) -> Option<V> {
        self.entries.read().await.get(token).cloned()
    }

    async fn remove(&self, token: &str) -> bool {
        self.entries.write().await.remove(token).is_some()
    }

    async fn remove_if_expired(&self, token: &str, now: DateTime<Utc>) -> bool {
        let mut entries = self.entries.write().await;
        if entries.get(token).is_some_and(|r| r.is_expired_at(now)) {
            entries.remove(token);
            true
        } else {
            false
        }
    }

    /// Snapshot expired keys under the read lock, then delete them chunk by
    /// chunk, re-checking each entry under the write lock.
    ///
    /// The snapshot holds the read lock for one full pass over the map. Since
    /// `tokio::sync::RwLock` is fair, a writer queued during that pass also
    /// parks readers that arrive after it, so lookups can wait for up to one
    /// scan plus one chunk. Lookups never wait behind the whole deletion.
    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: usize) -> usize {
        let expired: Vec<String> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .filter(|(_, record)| record.is_expired_at(now))
                .map(|(token, _)| token.clone())
                .collect()
        };

        let mut deleted = 0;
        for chunk in expired.chunks(batch_size.max(1)) {
            {
                let mut entries = self.entries.write().await;
                for token in chunk {
                    if entries.get(token).is_some_and(|r| r.is_expired_at(now)) {
                        entries.remove(token);
                        deleted += 1;
                    }
                }
            }
            tokio::task::yield_now().await;
        }
        deleted
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Process-wide refresh token registry
pub struct InMemoryRefreshTokenStore {
    registry: ExpiringRegistry<RefreshTokenRecord>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self {
            registry: ExpiringRegistry::new(),
        }
    }
}

impl Default for InMemoryRefreshTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenStore {
    async fn insert(&self, token: String, record: RefreshTokenRecord) -> Result<(), DomainError> {
        self.registry.insert(token, record).await;
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        Ok(self.registry.find(token).await)
    }

    async fn remove(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.registry.remove(token).await)
    }

    async fn remove_if_expired(&self, token: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        Ok(self.registry.remove_if_expired(token, now).await)
    }

    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: usize) -> Result<usize, DomainError> {
        Ok(self.registry.delete_expired(now, batch_size).await)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.registry.len().await)
    }
}

/// Process-wide access token blacklist
pub struct InMemoryBlacklistStore {
    registry: ExpiringRegistry<BlacklistRecord>,
}

impl InMemoryBlacklistStore {
    pub fn new() -> Self {
        Self {
            registry: ExpiringRegistry::new(),
        }
    }
}

impl Default for InMemoryBlacklistStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlacklistRepository for InMemoryBlacklistStore {
    async fn insert(&self, token: String, record: BlacklistRecord) -> Result<(), DomainError> {
        self.registry.insert(token, record).await;
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<BlacklistRecord>, DomainError> {
        Ok(self.registry.find(token).await)
    }

    async fn remove_if_expired(&self, token: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        Ok(self.registry.remove_if_expired(token, now).await)
    }

    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: usize) -> Result<usize, DomainError> {
        Ok(self.registry.delete_expired(now, batch_size).await)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.registry.len().await)
    }
}
