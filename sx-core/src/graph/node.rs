//! Graph Nodes
//!
//! This module defines the slots that live in the node store: a type-erased
//! cached value, a dirty flag, and the edges to sources and dependents.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::BoxError;

/// Type-erased cached value.
pub(crate) type ErasedValue = Box<dyn Any + Send>;

/// Type-erased derivation: maps the cached values of a node's sources, in
/// source order, to the node's new value.
pub(crate) type Derivation =
    Box<dyn Fn(&[&(dyn Any + Send)]) -> Result<ErasedValue, DeriveError> + Send>;

/// Box a value for storage in a slot.
pub(crate) fn erase<T: Any + Send>(value: T) -> ErasedValue {
    Box::new(value)
}

/// Box a derivation closure, fixing its signature.
pub(crate) fn derivation<F>(f: F) -> Derivation
where
    F: Fn(&[&(dyn Any + Send)]) -> Result<ErasedValue, DeriveError> + Send + 'static,
{
    Box::new(f)
}

/// Identifier of a node in the store.
///
/// Ids are arena indices. Slots are never reused, so an id that outlives its
/// node cannot alias a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Externally assignable source of truth. Never dirty.
    Root,

    /// Fixed value lifted into the graph. Never dirty, never written.
    Constant,

    /// Derived from a single source through a unary function.
    Map,

    /// Derived from several sources through an n-ary function.
    Zip,

    /// Mutable ordered sequence. Never dirty.
    List,

    /// Derived from a list by reading one index.
    ListAccess {
        /// The index the accessor is bound to.
        index: usize,
    },
}

impl NodeKind {
    /// Source kinds hold the truth and are written from outside the graph.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Root | Self::Constant | Self::List)
    }
}

/// Failure reported by a derivation function.
#[derive(Debug)]
pub(crate) enum DeriveError {
    /// The user function returned an error.
    Failed(BoxError),

    /// The input at `position` was not of the expected type.
    Input {
        position: usize,
        expected: &'static str,
    },
}

/// Borrow the input at `position` as a `T`.
pub(crate) fn downcast_input<'a, T: 'static>(
    inputs: &[&'a (dyn Any + Send)],
    position: usize,
) -> Result<&'a T, DeriveError> {
    inputs
        .get(position)
        .and_then(|input| input.downcast_ref::<T>())
        .ok_or_else(|| DeriveError::Input {
            position,
            expected: std::any::type_name::<T>(),
        })
}

/// A slot in the node store.
pub(crate) struct Slot {
    kind: NodeKind,

    /// Last computed or assigned value. `None` only for a derived node that
    /// has not been computed yet.
    value: Option<ErasedValue>,

    /// True if `value` may be stale relative to the sources.
    dirty: bool,

    /// Nodes this node reads from, in argument order.
    sources: SmallVec<[NodeId; 2]>,

    /// Nodes that must be told when this node may have changed.
    dependents: SmallVec<[NodeId; 4]>,

    derivation: Option<Derivation>,

    type_name: &'static str,
}

impl Slot {
    /// A source slot holding `value`.
    pub fn source(kind: NodeKind, value: ErasedValue, type_name: &'static str) -> Self {
        debug_assert!(kind.is_source());
        Self {
            kind,
            value: Some(value),
            dirty: false,
            sources: SmallVec::new(),
            dependents: SmallVec::new(),
            derivation: None,
            type_name,
        }
    }

    /// A derived slot. It starts dirty and is computed on first read.
    pub fn derived(
        kind: NodeKind,
        sources: &[NodeId],
        derivation: Derivation,
        type_name: &'static str,
    ) -> Self {
        debug_assert!(!kind.is_source());
        Self {
            kind,
            value: None,
            dirty: true,
            sources: SmallVec::from_slice(sources),
            dependents: SmallVec::new(),
            derivation: Some(derivation),
            type_name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag the cached value as stale. Returns `false` if it already was.
    pub fn mark_dirty(&mut self) -> bool {
        !std::mem::replace(&mut self.dirty, true)
    }

    pub fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    pub fn dependents(&self) -> &[NodeId] {
        &self.dependents
    }

    pub fn add_dependent(&mut self, node_id: NodeId) {
        self.dependents.push(node_id);
    }

    pub fn remove_dependent(&mut self, node_id: NodeId) {
        self.dependents.retain(|id| *id != node_id);
    }

    #[cfg(test)]
    pub fn add_source(&mut self, node_id: NodeId) {
        self.sources.push(node_id);
    }

    pub fn derivation(&self) -> Option<&Derivation> {
        self.derivation.as_ref()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The cached value, if one has ever been computed.
    pub fn cached(&self) -> Option<&(dyn Any + Send)> {
        self.value.as_deref()
    }

    pub fn cached_mut(&mut self) -> Option<&mut (dyn Any + Send)> {
        self.value.as_deref_mut()
    }

    /// Store a freshly computed or assigned value and clear the dirty flag.
    pub fn store(&mut self, value: ErasedValue) {
        self.value = Some(value);
        self.dirty = false;
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("kind", &self.kind)
            .field("dirty", &self.dirty)
            .field("has_value", &self.value.is_some())
            .field("sources", &self.sources)
            .field("dependents", &self.dependents)
            .field("type_name", &self.type_name)
            .finish()
    }
}
