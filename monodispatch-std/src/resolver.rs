//! Dispatch resolution.
//!
//! # Algorithm Overview
//!
//! 1. **Exact**: an entry registered for the concrete type wins outright
//! 2. **Ancestry**: collect the entries registered for types on the
//!    [`AncestryPath`](monodispatch_core::AncestryPath), drop every candidate
//!    that is a supertype of another candidate, then pick the closest one;
//!    a tie between different entries is ambiguous
//! 3. **Structural**: only when no ancestor matched, collect the capabilities
//!    the type satisfies, drop every capability refined by another match; a
//!    single survivor wins, several are ambiguous
//! 4. **Default**: nothing matched
//!
//! Registration order never takes part in the decision.

use crate::registry::{HandlerEntry, RegistrationTable};
use monodispatch_core::{Capability, TypeHierarchy, TypeKey, TypeTag};
use std::sync::Arc;

/// Outcome of resolving a concrete type.
pub enum Resolution<H: ?Sized> {
    /// A registered entry applies.
    Entry(Arc<HandlerEntry<H>>),
    /// Nothing applies; the default handler runs.
    Default,
    /// Several equally specific entries apply.
    Ambiguous(Arc<[String]>),
}

impl<H: ?Sized> Clone for Resolution<H> {
    fn clone(&self) -> Self {
        match self {
            Resolution::Entry(entry) => Resolution::Entry(entry.clone()),
            Resolution::Default => Resolution::Default,
            Resolution::Ambiguous(candidates) => Resolution::Ambiguous(candidates.clone()),
        }
    }
}

impl<H: ?Sized> std::fmt::Debug for Resolution<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Entry(entry) => f.debug_tuple("Entry").field(entry).finish(),
            Resolution::Default => f.write_str("Default"),
            Resolution::Ambiguous(candidates) => {
                f.debug_tuple("Ambiguous").field(candidates).finish()
            }
        }
    }
}

impl<H: ?Sized> Resolution<H> {
    /// The entry, if one was selected.
    pub fn entry(&self) -> Option<&Arc<HandlerEntry<H>>> {
        match self {
            Resolution::Entry(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Resolve `tag` against `table`.
///
/// Pure: the same table contents and hierarchy always give the same outcome.
pub fn resolve<H: ?Sized>(
    table: &RegistrationTable<H>,
    hierarchy: &TypeHierarchy,
    tag: TypeTag,
) -> Resolution<H> {
    if let Some(entry) = table.exact(tag) {
        return Resolution::Entry(entry.clone());
    }

    let path = hierarchy.ancestry(tag);
    let candidates: Vec<(TypeTag, &Arc<HandlerEntry<H>>)> = path
        .supertypes()
        .iter()
        .filter_map(|t| table.exact(*t).map(|entry| (*t, entry)))
        .collect();

    if !candidates.is_empty() {
        return pick_ancestor(hierarchy, tag, candidates);
    }

    let matched: Vec<(&Capability, &Arc<HandlerEntry<H>>)> = table
        .structural()
        .iter()
        .filter_map(|entry| match entry.key() {
            TypeKey::Structural(capability) if hierarchy.satisfies(tag, capability) => {
                Some((capability, entry))
            }
            _ => None,
        })
        .collect();

    pick_structural(matched)
}

fn pick_ancestor<H: ?Sized>(
    hierarchy: &TypeHierarchy,
    tag: TypeTag,
    candidates: Vec<(TypeTag, &Arc<HandlerEntry<H>>)>,
) -> Resolution<H> {
    // A candidate is maximal if no other candidate is strictly more specific.
    let maximal: Vec<_> = candidates
        .iter()
        .filter(|(t, _)| {
            !candidates
                .iter()
                .any(|(other, _)| other != t && hierarchy.is_subtype(*other, *t))
        })
        .collect();
    // Only a supertype cycle can leave nothing maximal.
    let maximal = if maximal.is_empty() {
        candidates.iter().collect()
    } else {
        maximal
    };

    let distances = hierarchy.distances(tag);
    let distance = |t: &TypeTag| distances.get(&t.id()).copied().unwrap_or(usize::MAX);
    let closest = maximal
        .iter()
        .map(|(t, _)| distance(t))
        .min()
        .unwrap_or(usize::MAX);
    let tied: Vec<_> = maximal
        .into_iter()
        .filter(|(t, _)| distance(t) == closest)
        .collect();

    let (_, first) = tied[0];
    if tied.iter().all(|(_, entry)| Arc::ptr_eq(entry, first)) {
        return Resolution::Entry((*first).clone());
    }
    Resolution::Ambiguous(tied.iter().map(|(t, _)| t.to_string()).collect())
}

fn pick_structural<H: ?Sized>(
    matched: Vec<(&Capability, &Arc<HandlerEntry<H>>)>,
) -> Resolution<H> {
    let maximal: Vec<_> = matched
        .iter()
        .filter(|(mine, _)| !matched.iter().any(|(theirs, _)| theirs.refines(mine)))
        .collect();

    match maximal.as_slice() {
        [] => Resolution::Default,
        [(_, only)] => Resolution::Entry((*only).clone()),
        many => Resolution::Ambiguous(many.iter().map(|(c, _)| c.to_string()).collect()),
    }
}
