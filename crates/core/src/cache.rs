//! Read-through cache contract and the in-process TTL store behind it.
//!
//! Values are stored as serialized JSON keyed by `(CacheKind, id)`. A miss
//! and an expired entry both read as `Ok(None)`; `Err` is reserved for the
//! cache itself misbehaving (serialization, capacity).
//!
//! The store is always the source of truth. Callers write the store first
//! and only then refresh or drop the cached copy.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::types::DbId;

/// Entity families sharing the cache keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    User,
    Project,
}

impl CacheKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheKind::User => "user",
            CacheKind::Project => "project",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache serialization failed for {kind}:{id}: {source}")]
    Serialization {
        kind: &'static str,
        id: DbId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache is full ({capacity} entries)")]
    Full { capacity: usize },
}

/// Key/value contract every cache backend implements.
pub trait Cache: Send + Sync {
    fn get(
        &self,
        kind: CacheKind,
        id: DbId,
    ) -> impl Future<Output = Result<Option<String>, CacheError>> + Send;

    fn set(
        &self,
        kind: CacheKind,
        id: DbId,
        value: String,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    fn delete(&self, kind: CacheKind, id: DbId)
        -> impl Future<Output = Result<(), CacheError>> + Send;
}

/// Fetch and decode a cached value.
///
/// A payload that no longer decodes is treated as a miss.
pub async fn get_json<C, V>(cache: &C, kind: CacheKind, id: DbId) -> Result<Option<V>, CacheError>
where
    C: Cache,
    V: DeserializeOwned,
{
    let Some(raw) = cache.get(kind, id).await? else {
        return Ok(None);
    };
    Ok(serde_json::from_str(&raw).ok())
}

/// Encode and store a value.
pub async fn set_json<C, V>(
    cache: &C,
    kind: CacheKind,
    id: DbId,
    value: &V,
    ttl: Duration,
) -> Result<(), CacheError>
where
    C: Cache,
    V: Serialize + Sync,
{
    let raw = serde_json::to_string(value).map_err(|source| CacheError::Serialization {
        kind: kind.as_str(),
        id,
        source,
    })?;
    cache.set(kind, id, raw, ttl).await
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Bounded in-process cache with per-entry expiry.
///
/// Expired entries are dropped lazily on read, and swept in bulk when an
/// insert hits capacity. If the sweep frees nothing the insert fails with
/// [`CacheError::Full`].
pub struct MemoryCache {
    entries: RwLock<HashMap<(CacheKind, DbId), Entry>>,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    /// Number of live and not-yet-purged entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Cache for MemoryCache {
    async fn get(&self, kind: CacheKind, id: DbId) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(&(kind, id)) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(&(kind, id))
            .is_some_and(|entry| entry.expires_at <= now)
        {
            entries.remove(&(kind, id));
        }
        Ok(None)
    }

    async fn set(
        &self,
        kind: CacheKind,
        id: DbId,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if !entries.contains_key(&(kind, id)) && entries.len() >= self.max_entries {
            entries.retain(|_, entry| entry.expires_at > now);
            if entries.len() >= self.max_entries {
                return Err(CacheError::Full {
                    capacity: self.max_entries,
                });
            }
        }

        entries.insert(
            (kind, id),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, kind: CacheKind, id: DbId) -> Result<(), CacheError> {
        self.entries.write().await.remove(&(kind, id));
        Ok(())
    }
}
