//! Runtime type identity.

use std::{
    any::TypeId,
    fmt,
    hash::{Hash, Hasher},
};

/// The universal root type.
///
/// Every ancestry path ends here. It cannot be registered against: the
/// default handler of a dispatcher plays its role.
pub enum Universal {}

/// Identity of a concrete (or abstract) type as seen by the dispatcher.
///
/// Equality and hashing only consider the [`TypeId`]; the name is carried for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Tag for `T`. Unsized types such as `dyn Trait` or `str` are allowed,
    /// which makes trait objects convenient names for abstract supertypes.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Tag for the universal root type.
    pub fn root() -> Self {
        Self {
            id: TypeId::of::<Universal>(),
            name: "Universal",
        }
    }

    /// The underlying type id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type name, as reported by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this is the universal root.
    pub fn is_root(&self) -> bool {
        self.id == TypeId::of::<Universal>()
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
