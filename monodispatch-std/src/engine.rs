//! The dispatch engine shared by [`Dispatcher`](crate::dispatcher::Dispatcher)
//! and [`MethodDispatcher`](crate::method::MethodDispatcher).
//!
//! The engine is generic over the stored handler type `H` (typically a trait
//! object), so resolution and caching never depend on the handler signature.
//!
//! # Locking
//!
//! Readers hold the table read lock across lookup, resolution and store;
//! `register` holds the table write lock while it flushes the cache. A reader
//! therefore can neither observe nor store an outcome computed against a
//! table that has since changed. Locks are released before any handler runs,
//! so handlers may re-enter the dispatcher.

use crate::{
    cache::{CachePolicy, CacheStats, ResolutionCache},
    registry::{HandlerEntry, RegistrationInfo, RegistrationMeta, RegistrationTable},
    resolver::{self, Resolution},
};
use monodispatch_core::{DispatchError, RegistrationError, TypeHierarchy, TypeKey, TypeTag};
use parking_lot::RwLock;
use std::sync::Arc;

/// The handler chosen for a concrete type.
pub struct Target<H: ?Sized> {
    handler: Arc<H>,
    entry: Option<Arc<HandlerEntry<H>>>,
}

impl<H: ?Sized> Target<H> {
    /// The handler to invoke.
    pub fn handler(&self) -> &Arc<H> {
        &self.handler
    }

    /// The registered entry, or `None` for the default handler.
    pub fn entry(&self) -> Option<&Arc<HandlerEntry<H>>> {
        self.entry.as_ref()
    }

    /// Whether the default handler was selected.
    pub fn is_default(&self) -> bool {
        self.entry.is_none()
    }
}

impl<H: ?Sized> Clone for Target<H> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            entry: self.entry.clone(),
        }
    }
}

impl<H: ?Sized> std::fmt::Debug for Target<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.entry {
            Some(entry) => f.debug_tuple("Target").field(entry).finish(),
            None => f.write_str("Target(default)"),
        }
    }
}

/// Everything needed to build an [`Engine`]; collected by the builders.
pub(crate) struct EngineParts<H: ?Sized> {
    pub(crate) default: Arc<H>,
    pub(crate) hierarchy: Arc<TypeHierarchy>,
    pub(crate) policy: CachePolicy,
    pub(crate) table: RegistrationTable<H>,
}

impl<H: ?Sized> EngineParts<H> {
    pub(crate) fn new(default: Arc<H>) -> Self {
        Self {
            default,
            hierarchy: Arc::new(TypeHierarchy::new()),
            policy: CachePolicy::default(),
            table: RegistrationTable::new(),
        }
    }

    pub(crate) fn insert(
        &mut self,
        key: TypeKey,
        handler: Arc<H>,
        meta: RegistrationMeta,
    ) -> Result<(), RegistrationError> {
        let _entry = self.table.insert(key, handler, meta)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(key = %_entry.key(), sequence = _entry.sequence(), "registered handler");
        Ok(())
    }

    pub(crate) fn build(self) -> Engine<H> {
        Engine {
            table: RwLock::new(self.table),
            cache: RwLock::new(ResolutionCache::new(self.policy)),
            hierarchy: self.hierarchy,
            default: self.default,
        }
    }
}

/// Registration table, resolver and cache behind read-mostly locks.
pub struct Engine<H: ?Sized> {
    table: RwLock<RegistrationTable<H>>,
    cache: RwLock<ResolutionCache<H>>,
    hierarchy: Arc<TypeHierarchy>,
    default: Arc<H>,
}

impl<H: ?Sized> Engine<H> {
    /// Create an engine with the given default handler and hierarchy.
    pub fn new(default: Arc<H>, hierarchy: Arc<TypeHierarchy>, policy: CachePolicy) -> Self {
        let mut parts = EngineParts::new(default);
        parts.hierarchy = hierarchy;
        parts.policy = policy;
        parts.build()
    }

    /// Register `handler` under `key`, then flush the cache.
    pub fn register(
        &self,
        key: TypeKey,
        handler: Arc<H>,
        meta: RegistrationMeta,
    ) -> Result<(), RegistrationError> {
        let mut table = self.table.write();
        let _entry = table.insert(key, handler, meta)?;
        self.cache.write().invalidate_all();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            key = %_entry.key(),
            sequence = _entry.sequence(),
            "registered handler, resolution cache flushed"
        );
        Ok(())
    }

    /// Resolve the handler for `tag`, consulting the cache first.
    pub fn resolve(&self, tag: TypeTag) -> Result<Target<H>, DispatchError> {
        let table = self.table.read();
        let cached = self.cache.read().lookup(tag);
        let resolution = match cached {
            Some(resolution) => resolution,
            None => {
                let resolution = resolver::resolve(&table, &self.hierarchy, tag);
                #[cfg(feature = "tracing")]
                tracing::trace!(type_name = tag.name(), outcome = ?resolution, "resolved dispatch target");
                self.cache.write().store(tag, resolution.clone());
                resolution
            }
        };
        drop(table);

        match resolution {
            Resolution::Entry(entry) => Ok(Target {
                handler: entry.handler().clone(),
                entry: Some(entry),
            }),
            Resolution::Default => Ok(Target {
                handler: self.default.clone(),
                entry: None,
            }),
            Resolution::Ambiguous(candidates) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(type_name = tag.name(), ?candidates, "ambiguous dispatch");
                Err(DispatchError::Ambiguous {
                    type_name: tag.name(),
                    candidates: candidates.to_vec(),
                })
            }
        }
    }

    /// The default handler.
    pub fn default_handler(&self) -> &Arc<H> {
        &self.default
    }

    /// The hierarchy used for ancestry and structural matching.
    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// Snapshot of all registrations, ordered by sequence.
    pub fn registrations(&self) -> Vec<RegistrationInfo> {
        self.table
            .read()
            .entries()
            .iter()
            .map(|entry| entry.info())
            .collect()
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.read().stats()
    }

    /// Flush the resolution cache.
    pub fn clear_cache(&self) {
        self.cache.write().invalidate_all();
    }
}
