//! Read-through cache of assembled activity trees using moka
//!
//! Entries are keyed by `(generation, root path)`. Every activity mutation
//! bumps the generation after it commits, so a tree assembled before the
//! mutation can never be returned once the mutating call has returned.

use crate::config::TreeCacheConfig;
use moka::future::Cache;
use orgdir_taxonomy::{ActivityPath, ActivityTree};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
    /// Current generation
    pub generation: u64,
}

/// Assembled-tree cache
#[derive(Debug, Clone)]
pub struct TreeCache {
    inner: Option<Cache<(u64, String), Arc<ActivityTree>>>,
    generation: Arc<AtomicU64>,
}

impl TreeCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Some(Cache::new(max_capacity)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create cache from settings
    #[must_use]
    pub fn from_config(config: &TreeCacheConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let mut builder = Cache::builder().max_capacity(config.max_capacity);
        if let Some(ttl) = config.ttl() {
            builder = builder.time_to_live(ttl);
        }
        Self {
            inner: Some(builder.build()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a pass-through cache that stores nothing
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            inner: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Whether trees are cached
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Current generation
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Get tree for root path in the current generation
    pub async fn get(&self, root: &ActivityPath) -> Option<ActivityTree> {
        let inner = self.inner.as_ref()?;
        let key = (self.generation(), root.to_string());
        inner.get(&key).await.map(|tree| (*tree).clone())
    }

    /// Try to get or compute tree
    ///
    /// The generation is read before `f` runs, so a tree computed across a
    /// concurrent mutation lands under a generation that is already stale.
    ///
    /// # Errors
    /// Propagates the error of `f`; nothing is cached in that case
    pub async fn try_get_or_insert_with<E, F, Fut>(
        &self,
        root: &ActivityPath,
        f: F,
    ) -> Result<ActivityTree, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ActivityTree, E>>,
    {
        let Some(inner) = self.inner.as_ref() else {
            return f().await;
        };

        let key = (self.generation(), root.to_string());
        if let Some(cached) = inner.get(&key).await {
            tracing::debug!(root = %root, generation = key.0, "tree cache hit");
            return Ok((*cached).clone());
        }

        let tree = f().await?;
        inner.insert(key, Arc::new(tree.clone())).await;
        Ok(tree)
    }

    /// Drop every entry and start a new generation
    pub fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(inner) = &self.inner {
            inner.invalidate_all();
        }
        tracing::trace!(generation, "tree cache invalidated");
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.as_ref().map_or(0, Cache::entry_count),
            generation: self.generation(),
        }
    }
}

impl Default for TreeCache {
    /// Create cache with default settings
    fn default() -> Self {
        Self::from_config(&TreeCacheConfig::default())
    }
}
