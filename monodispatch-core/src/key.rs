//! Registration keys.
//!
//! A [`TypeKey`] is the criterion a handler is registered under:
//!
//! - [`TypeKey::Exact`] - one type (and, through the hierarchy, its subtypes)
//! - [`TypeKey::Union`] - several types sharing one handler
//! - [`TypeKey::Structural`] - any type exposing the operations of a [`Capability`]

use crate::tag::TypeTag;
use std::{borrow::Cow, collections::BTreeSet, fmt};

/// An operation a type exposes: a name and an arity (receiver excluded).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Operation {
    name: Cow<'static, str>,
    arity: usize,
}

impl Operation {
    /// Create an operation signature.
    pub fn new(name: impl Into<Cow<'static, str>>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    /// The operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments, receiver excluded.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// A named set of required operations, matched structurally.
///
/// # Example
///
/// ```rust,ignore
/// let quacks = Capability::new("Quacks").requires("quack", 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capability {
    name: Cow<'static, str>,
    requires: BTreeSet<Operation>,
}

impl Capability {
    /// Create a capability with no requirements.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            requires: BTreeSet::new(),
        }
    }

    /// Add a required operation.
    pub fn requires(mut self, name: impl Into<Cow<'static, str>>, arity: usize) -> Self {
        self.requires.insert(Operation::new(name, arity));
        self
    }

    /// The capability name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The required operations.
    pub fn requirements(&self) -> &BTreeSet<Operation> {
        &self.requires
    }

    /// Whether `ops` contains every required operation.
    pub fn is_satisfied_by(&self, ops: &BTreeSet<Operation>) -> bool {
        self.requires.is_subset(ops)
    }

    /// Whether this capability asks for strictly more than `other`.
    pub fn refines(&self, other: &Capability) -> bool {
        self.requires.len() > other.requires.len() && other.requires.is_subset(&self.requires)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.name)?;
        for (i, op) in self.requires.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{op}")?;
        }
        f.write_str("}")
    }
}

/// The criterion a handler is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// A single type.
    Exact(TypeTag),
    /// Several types sharing one handler. Members are deduplicated and keep
    /// their first-seen order.
    Union(Vec<TypeTag>),
    /// Any type exposing the capability's operations.
    Structural(Capability),
}

impl TypeKey {
    /// Exact key for `T`.
    pub fn exact<T: ?Sized + 'static>() -> Self {
        TypeKey::Exact(TypeTag::of::<T>())
    }

    /// Union key over `members`.
    pub fn union(members: impl IntoIterator<Item = TypeTag>) -> Self {
        let mut seen = Vec::new();
        for tag in members {
            if !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        TypeKey::Union(seen)
    }

    /// The types this key covers directly. Empty for structural keys.
    pub fn members(&self) -> &[TypeTag] {
        match self {
            TypeKey::Exact(tag) => std::slice::from_ref(tag),
            TypeKey::Union(tags) => tags,
            TypeKey::Structural(_) => &[],
        }
    }
}

impl From<TypeTag> for TypeKey {
    fn from(tag: TypeTag) -> Self {
        TypeKey::Exact(tag)
    }
}

impl From<Capability> for TypeKey {
    fn from(capability: Capability) -> Self {
        TypeKey::Structural(capability)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Exact(tag) => write!(f, "{tag}"),
            TypeKey::Union(tags) => {
                for (i, tag) in tags.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{tag}")?;
                }
                Ok(())
            }
            TypeKey::Structural(capability) => write!(f, "{capability}"),
        }
    }
}

/// Build a [`TypeKey::Union`] from a list of types.
///
/// # Example
///
/// ```rust,ignore
/// dispatcher.register(type_set![i64, f64], |v: &dyn Dispatchable, _| Ok(format_number(v)))?;
/// ```
#[macro_export]
macro_rules! type_set {
    ($($ty:ty),+ $(,)?) => {
        $crate::TypeKey::union([$($crate::TypeTag::of::<$ty>()),+])
    };
}
