//! Registration table.
//!
//! Stores which handler is registered under which [`TypeKey`] and enforces
//! the registration rules:
//!
//! - an `Exact` key silently replaces a previous `Exact` entry for the same type
//! - a `Union` key may not take over a member another entry already covers
//! - two capabilities that the resolver could never tell apart are rejected
//! - the universal root, and any capability every type satisfies, are
//!   reserved for the default handler

use monodispatch_core::{Capability, RegistrationError, TypeKey, TypeTag};
use std::{any::TypeId, borrow::Cow, collections::HashMap, sync::Arc};

/// Metadata attached to a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationMeta {
    /// Optional human-readable label, shown in diagnostics.
    pub label: Option<Cow<'static, str>>,
}

impl RegistrationMeta {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A registered handler with its key and metadata.
pub struct HandlerEntry<H: ?Sized> {
    key: TypeKey,
    handler: Arc<H>,
    sequence: u64,
    meta: RegistrationMeta,
}

impl<H: ?Sized> HandlerEntry<H> {
    /// The key the handler was registered under.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// The handler.
    pub fn handler(&self) -> &Arc<H> {
        &self.handler
    }

    /// Registration order. Diagnostic only; never used to pick a winner.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The metadata.
    pub fn meta(&self) -> &RegistrationMeta {
        &self.meta
    }

    /// Snapshot for introspection.
    pub fn info(&self) -> RegistrationInfo {
        RegistrationInfo {
            key: self.key.clone(),
            sequence: self.sequence,
            label: self.meta.label.clone(),
        }
    }
}

impl<H: ?Sized> std::fmt::Debug for HandlerEntry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("key", &self.key)
            .field("sequence", &self.sequence)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// A handler-free view of one registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInfo {
    /// The key.
    pub key: TypeKey,
    /// Registration order.
    pub sequence: u64,
    /// The label, if any.
    pub label: Option<Cow<'static, str>>,
}

/// Mapping from keys to handler entries.
///
/// Union entries are indexed under each member type, so exact lookups stay a
/// single hash lookup.
pub struct RegistrationTable<H: ?Sized> {
    by_type: HashMap<TypeId, Arc<HandlerEntry<H>>>,
    structural: Vec<Arc<HandlerEntry<H>>>,
    next_sequence: u64,
}

impl<H: ?Sized> Default for RegistrationTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> RegistrationTable<H> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            by_type: HashMap::new(),
            structural: Vec::new(),
            next_sequence: 0,
        }
    }

    /// The entry covering `tag` directly, through an `Exact` or `Union` key.
    pub fn exact(&self, tag: TypeTag) -> Option<&Arc<HandlerEntry<H>>> {
        self.by_type.get(&tag.id())
    }

    /// Structural entries.
    pub fn structural(&self) -> &[Arc<HandlerEntry<H>>] {
        &self.structural
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty() && self.structural.is_empty()
    }

    /// All distinct entries ordered by registration sequence.
    pub fn entries(&self) -> Vec<Arc<HandlerEntry<H>>> {
        let mut entries: Vec<_> = self
            .by_type
            .values()
            .chain(self.structural.iter())
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.sequence);
        entries.dedup_by(|a, b| Arc::ptr_eq(a, b));
        entries
    }

    /// Insert a handler under `key`.
    pub fn insert(
        &mut self,
        key: TypeKey,
        handler: Arc<H>,
        meta: RegistrationMeta,
    ) -> Result<Arc<HandlerEntry<H>>, RegistrationError> {
        match &key {
            TypeKey::Exact(tag) => self.check_exact(&key, *tag)?,
            TypeKey::Union(members) => self.check_union(&key, members)?,
            TypeKey::Structural(capability) => self.check_structural(&key, capability)?,
        }

        let entry = Arc::new(HandlerEntry {
            key,
            handler,
            sequence: self.next_sequence,
            meta,
        });
        self.next_sequence += 1;

        match &entry.key {
            TypeKey::Exact(_) | TypeKey::Union(_) => {
                self.by_type.retain(|_, e| e.key != entry.key);
                for tag in entry.key.members() {
                    self.by_type.insert(tag.id(), entry.clone());
                }
            }
            TypeKey::Structural(capability) => {
                self.structural
                    .retain(|e| !matches!(&e.key, TypeKey::Structural(c) if c.name() == capability.name()));
                self.structural.push(entry.clone());
            }
        }
        Ok(entry)
    }

    fn check_exact(&self, key: &TypeKey, tag: TypeTag) -> Result<(), RegistrationError> {
        if tag.is_root() {
            return Err(frozen());
        }
        match self.by_type.get(&tag.id()) {
            Some(existing) if matches!(existing.key, TypeKey::Union(_)) => {
                Err(RegistrationError::DuplicateKey {
                    key: key.to_string(),
                    existing: existing.key.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn check_union(&self, key: &TypeKey, members: &[TypeTag]) -> Result<(), RegistrationError> {
        if members.is_empty() {
            return Err(RegistrationError::InvalidKey(
                "a union needs at least one member".into(),
            ));
        }
        if members.iter().any(TypeTag::is_root) {
            return Err(frozen());
        }
        for member in members {
            if let Some(existing) = self.by_type.get(&member.id()) {
                if existing.key != *key {
                    return Err(RegistrationError::AmbiguousUnion {
                        key: key.to_string(),
                        member: member.to_string(),
                        existing: existing.key.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_structural(
        &self,
        key: &TypeKey,
        capability: &Capability,
    ) -> Result<(), RegistrationError> {
        // Every type satisfies an empty capability, which would make it a
        // second default handler.
        if capability.requirements().is_empty() {
            return Err(RegistrationError::RegistryFrozen(format!(
                "capability `{}` has no requirements and would match every type",
                capability.name()
            )));
        }
        for existing in &self.structural {
            let TypeKey::Structural(other) = &existing.key else {
                continue;
            };
            let same_name = other.name() == capability.name();
            let same_requirements = other.requirements() == capability.requirements();
            if same_name != same_requirements {
                return Err(RegistrationError::DuplicateKey {
                    key: key.to_string(),
                    existing: existing.key.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn frozen() -> RegistrationError {
    RegistrationError::RegistryFrozen(
        "the universal root is reserved for the default handler".into(),
    )
}
