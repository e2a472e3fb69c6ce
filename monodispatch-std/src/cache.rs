//! Resolution cache.
//!
//! Memoizes the outcome of resolving a concrete type, keyed by that type's
//! identity (not by the ancestor that matched), so two unrelated types that
//! resolve to the same entry are cached independently. Any registration
//! flushes the whole cache.

use crate::resolver::Resolution;
use monodispatch_core::TypeTag;
use std::{
    any::TypeId,
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

/// Whether a dispatcher memoizes resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Memoize per concrete type (the default).
    #[default]
    Enabled,
    /// Resolve on every call.
    Disabled,
}

/// Counters describing cache behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that required resolution.
    pub misses: u64,
    /// Full flushes.
    pub invalidations: u64,
    /// Concrete types currently cached.
    pub entries: usize,
}

/// Per-type memo of [`Resolution`]s.
pub struct ResolutionCache<H: ?Sized> {
    policy: CachePolicy,
    map: HashMap<TypeId, Resolution<H>>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: u64,
}

impl<H: ?Sized> Default for ResolutionCache<H> {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl<H: ?Sized> ResolutionCache<H> {
    /// Create an empty cache.
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            map: HashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: 0,
        }
    }

    /// The configured policy.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// The memoized outcome for `tag`, if any.
    ///
    /// Takes `&self` so concurrent readers can share a read lock.
    pub fn lookup(&self, tag: TypeTag) -> Option<Resolution<H>> {
        match self.map.get(&tag.id()) {
            Some(resolution) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(resolution.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Remember the outcome for `tag`. A no-op when caching is disabled.
    pub fn store(&mut self, tag: TypeTag, resolution: Resolution<H>) {
        if self.policy == CachePolicy::Enabled {
            self.map.insert(tag.id(), resolution);
        }
    }

    /// Forget everything.
    pub fn invalidate_all(&mut self) {
        self.map.clear();
        self.invalidations += 1;
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations,
            entries: self.map.len(),
        }
    }
}
