//! # Type Hierarchy
//!
//! Rust has no runtime inheritance, so the supertype relation the resolver
//! walks is declared explicitly: each [`TypeDecl`] names a type, its direct
//! supertypes (left to right) and the operations it exposes. Supertypes are
//! usually abstract, e.g. `dyn Animal` or a marker struct, but any `'static`
//! type can appear on either side.
//!
//! Undeclared types are leaves: their only ancestor is the universal root
//! and they expose no operations.
//!
//! # Linearization
//!
//! [`TypeHierarchy::ancestry`] produces a depth-first, left-to-right,
//! duplicate-removing order in which every type appears after all of its
//! subtypes. For the diamond `Duck: Bird, Swimmer` / `Bird: Animal` /
//! `Swimmer: Animal`, the path is `Duck, Bird, Swimmer, Animal, Universal`.

use crate::{
    key::{Capability, Operation},
    tag::TypeTag,
};
use std::{
    any::TypeId,
    borrow::Cow,
    collections::{BTreeSet, HashMap, HashSet, VecDeque},
    ops::Deref,
};

/// Declaration of one type's place in the hierarchy.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    tag: TypeTag,
    parents: Vec<TypeTag>,
    exposes: BTreeSet<Operation>,
}

impl TypeDecl {
    /// Start a declaration for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::for_tag(TypeTag::of::<T>())
    }

    /// Start a declaration for an arbitrary tag.
    pub fn for_tag(tag: TypeTag) -> Self {
        Self {
            tag,
            parents: Vec::new(),
            exposes: BTreeSet::new(),
        }
    }

    /// Declare `S` as the next direct supertype.
    pub fn extends<S: ?Sized + 'static>(self) -> Self {
        self.extends_tag(TypeTag::of::<S>())
    }

    /// Declare `parent` as the next direct supertype.
    ///
    /// Self-edges, duplicates and the root are ignored; the root is implied.
    pub fn extends_tag(mut self, parent: TypeTag) -> Self {
        if parent != self.tag && !parent.is_root() && !self.parents.contains(&parent) {
            self.parents.push(parent);
        }
        self
    }

    /// Declare an operation with the given arity (receiver excluded).
    pub fn exposes(mut self, name: impl Into<Cow<'static, str>>, arity: usize) -> Self {
        self.exposes.insert(Operation::new(name, arity));
        self
    }

    /// The declared type.
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Direct supertypes in declaration order.
    pub fn parents(&self) -> &[TypeTag] {
        &self.parents
    }

    /// Operations declared on this type itself.
    pub fn operations(&self) -> &BTreeSet<Operation> {
        &self.exposes
    }
}

/// A type that knows its own place in the hierarchy.
///
/// Implement by hand or with `#[derive(Describe)]` from the `macros` feature.
///
/// # Example
///
/// ```rust,ignore
/// struct Dog;
///
/// impl Describe for Dog {
///     fn describe() -> TypeDecl {
///         TypeDecl::of::<Self>().extends::<dyn Animal>().exposes("bark", 0)
///     }
/// }
/// ```
pub trait Describe: 'static {
    /// The declaration for `Self`.
    fn describe() -> TypeDecl;
}

/// An ordered ancestry: the type itself first, the universal root last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestryPath(Vec<TypeTag>);

impl AncestryPath {
    /// The type the path starts from.
    pub fn origin(&self) -> TypeTag {
        self.0[0]
    }

    /// Proper supertypes, excluding the origin and the root.
    pub fn supertypes(&self) -> &[TypeTag] {
        &self.0[1..self.0.len() - 1]
    }

    /// The full path as a vector.
    pub fn into_vec(self) -> Vec<TypeTag> {
        self.0
    }
}

impl Deref for AncestryPath {
    type Target = [TypeTag];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The explicit supertype graph consulted by the resolver.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    nodes: HashMap<TypeId, TypeDecl>,
}

impl TypeHierarchy {
    /// An empty hierarchy: every type is a leaf under the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a hierarchy.
    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::default()
    }

    /// The declaration for `tag`, if any.
    pub fn get(&self, tag: TypeTag) -> Option<&TypeDecl> {
        self.nodes.get(&tag.id())
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn parents(&self, tag: TypeTag) -> &[TypeTag] {
        self.get(tag).map(TypeDecl::parents).unwrap_or(&[])
    }

    /// Linearized ancestry of `tag`, ending at the root.
    pub fn ancestry(&self, tag: TypeTag) -> AncestryPath {
        // Reverse post-order, parents visited right to left. Equal to a
        // left-to-right walk that keeps the last occurrence of each duplicate.
        fn visit(
            hierarchy: &TypeHierarchy,
            tag: TypeTag,
            seen: &mut HashSet<TypeId>,
            post: &mut Vec<TypeTag>,
        ) {
            if !seen.insert(tag.id()) {
                return;
            }
            for parent in hierarchy.parents(tag).iter().rev() {
                visit(hierarchy, *parent, seen, post);
            }
            post.push(tag);
        }

        let mut seen = HashSet::new();
        let mut post = Vec::new();
        visit(self, tag, &mut seen, &mut post);
        post.reverse();
        post.push(TypeTag::root());
        AncestryPath(post)
    }

    /// Shortest supertype-edge count from `tag` to every reachable ancestor.
    pub fn distances(&self, tag: TypeTag) -> HashMap<TypeId, usize> {
        let mut distances = HashMap::from([(tag.id(), 0)]);
        let mut queue = VecDeque::from([tag]);
        while let Some(current) = queue.pop_front() {
            let next = distances[&current.id()] + 1;
            for parent in self.parents(current) {
                if !distances.contains_key(&parent.id()) {
                    distances.insert(parent.id(), next);
                    queue.push_back(*parent);
                }
            }
        }
        distances
    }

    /// Shortest distance from `tag` up to `ancestor`, if it is one.
    pub fn distance(&self, tag: TypeTag, ancestor: TypeTag) -> Option<usize> {
        if ancestor.is_root() {
            let deepest = self.distances(tag).into_values().max().unwrap_or(0);
            return Some(deepest + 1);
        }
        self.distances(tag).get(&ancestor.id()).copied()
    }

    /// Whether `sub` is `sup` or one of its (transitive) subtypes.
    pub fn is_subtype(&self, sub: TypeTag, sup: TypeTag) -> bool {
        if sub == sup || sup.is_root() {
            return true;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![sub];
        while let Some(current) = stack.pop() {
            for parent in self.parents(current) {
                if *parent == sup {
                    return true;
                }
                if seen.insert(parent.id()) {
                    stack.push(*parent);
                }
            }
        }
        false
    }

    /// Operations exposed by `tag`, including those inherited from supertypes.
    pub fn operations(&self, tag: TypeTag) -> BTreeSet<Operation> {
        self.ancestry(tag)
            .iter()
            .filter_map(|t| self.get(*t))
            .flat_map(|decl| decl.operations().iter().cloned())
            .collect()
    }

    /// Whether `tag` structurally satisfies `capability`.
    pub fn satisfies(&self, tag: TypeTag, capability: &Capability) -> bool {
        capability.is_satisfied_by(&self.operations(tag))
    }
}

/// Builder for a [`TypeHierarchy`].
///
/// Declaring the same type twice merges the declarations: parents are
/// appended in order and operations are unioned.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    nodes: HashMap<TypeId, TypeDecl>,
}

impl HierarchyBuilder {
    /// Add a declaration.
    pub fn declare(mut self, decl: TypeDecl) -> Self {
        self.declare_mut(decl);
        self
    }

    /// Add a declaration (mutable version).
    pub fn declare_mut(&mut self, decl: TypeDecl) {
        match self.nodes.get_mut(&decl.tag.id()) {
            Some(existing) => {
                for parent in decl.parents {
                    if !existing.parents.contains(&parent) {
                        existing.parents.push(parent);
                    }
                }
                existing.exposes.extend(decl.exposes);
            }
            None => {
                self.nodes.insert(decl.tag.id(), decl);
            }
        }
    }

    /// Add the declaration a [`Describe`] type provides.
    pub fn describe<T: Describe>(self) -> Self {
        self.declare(T::describe())
    }

    /// Build the hierarchy.
    pub fn build(self) -> TypeHierarchy {
        TypeHierarchy { nodes: self.nodes }
    }
}
