//! State Handles
//!
//! Typed handles into a [`Graph`]. A handle is a graph reference plus a node
//! id; cloning one is cheap and every clone refers to the same node.
//!
//! # Reading
//!
//! [`Node::value`] returns the current value of any node. Source nodes
//! (roots, constants, lists) return their stored value. Derived nodes return
//! their cached value when clean and recompute it first when dirty. A
//! derivation function runs once per dirty-to-clean transition, never more.
//!
//! # Construction Policy
//!
//! Derived nodes are lazy: creating one does not run its function. The
//! first read computes it, and a derived node that is never read never
//! runs its function at all.
//!
//! # Panics
//!
//! Operations that do not return a [`Result`] panic if the node has been
//! disposed or if they are called from inside a derivation function of the
//! same graph.

use std::any::type_name;
use std::convert::Infallible;
use std::fmt::{self, Debug};
use std::marker::PhantomData;

use super::graph::{live, Graph};
use super::zip::zip_pair;
use crate::error::{BoxError, Result};
use crate::graph::{derivation, downcast_input, erase, DeriveError, Derivation, NodeId, NodeKind};

/// Values that can be stored in a graph.
///
/// Reads hand out clones, and graphs can move between threads.
pub trait Value: Clone + Send + 'static {}

impl<T: Clone + Send + 'static> Value for T {}

/// The read and derive contract shared by every node handle.
pub trait Node {
    /// Type of the node's value.
    type Output: Value;

    /// The untyped-kind read handle behind this node.
    fn as_state(&self) -> &State<Self::Output>;

    fn id(&self) -> NodeId {
        self.as_state().id
    }

    /// The graph this node belongs to.
    fn graph(&self) -> &Graph {
        &self.as_state().graph
    }

    /// Get the current value, recomputing if necessary.
    ///
    /// Fails if a derivation function on the way fails; the failing node
    /// then stays dirty and the next read retries it.
    fn value(&self) -> Result<Self::Output> {
        let state = self.as_state();
        state.graph.try_with_store(|store| {
            store.resolve(state.id)?;
            store.read::<Self::Output>(state.id).cloned()
        })
    }

    /// Check whether the cached value may be stale.
    fn is_dirty(&self) -> bool {
        let state = self.as_state();
        state.graph.with_store(|store| Ok(store.slot(state.id)?.is_dirty()))
    }

    fn kind(&self) -> NodeKind {
        let state = self.as_state();
        state.graph.with_store(|store| Ok(store.slot(state.id)?.kind()))
    }

    /// Number of nodes registered as dependents of this one.
    fn dependent_count(&self) -> usize {
        let state = self.as_state();
        state.graph.with_store(|store| Ok(store.slot(state.id)?.dependents().len()))
    }

    /// Create a node derived from this one through `f`.
    fn map<U, F>(&self, f: F) -> State<U>
    where
        U: Value,
        F: Fn(&Self::Output) -> U + Send + 'static,
    {
        let derive = map_derivation(move |input: &Self::Output| Ok::<U, Infallible>(f(input)));
        derive_from(self.as_state(), derive)
    }

    /// Create a node derived from this one through a fallible `f`.
    ///
    /// An error from `f` surfaces from [`Node::value`] as
    /// [`GraphError::Derivation`](crate::error::GraphError::Derivation).
    fn try_map<U, E, F>(&self, f: F) -> State<U>
    where
        U: Value,
        E: Into<BoxError>,
        F: Fn(&Self::Output) -> std::result::Result<U, E> + Send + 'static,
    {
        derive_from(self.as_state(), map_derivation(f))
    }

    /// Create a node derived from this one and `other` through `f`.
    fn zip_with<N, U, F>(&self, other: &N, f: F) -> Result<State<U>>
    where
        N: Node,
        U: Value,
        F: Fn(&Self::Output, &N::Output) -> U + Send + 'static,
    {
        zip_pair(self.as_state(), other.as_state(), f)
    }

    /// Remove this node from the graph.
    ///
    /// Fails with [`GraphError::HasDependents`](crate::error::GraphError::HasDependents)
    /// while other nodes still derive from it. Other handles to the node
    /// become invalid.
    fn dispose(self) -> Result<()>
    where
        Self: Sized,
    {
        let state = self.as_state();
        state.graph.try_with_store(|store| store.dispose(state.id))
    }
}

fn map_derivation<T, U, E, F>(f: F) -> Derivation
where
    T: Value,
    U: Value,
    E: Into<BoxError>,
    F: Fn(&T) -> std::result::Result<U, E> + Send + 'static,
{
    derivation(move |inputs| {
        let input = downcast_input::<T>(inputs, 0)?;
        f(input)
            .map(erase)
            .map_err(|err| DeriveError::Failed(err.into()))
    })
}

#[track_caller]
fn derive_from<T: Value, U: Value>(source: &State<T>, derive: Derivation) -> State<U> {
    live(source.graph.insert_derived(NodeKind::Map, &[source.id], derive))
}

/// Read handle to any node of a [`Graph`].
pub struct State<T> {
    graph: Graph,
    id: NodeId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Value> State<T> {
    pub(crate) fn from_parts(graph: Graph, id: NodeId) -> Self {
        Self {
            graph,
            id,
            _marker: PhantomData,
        }
    }
}

impl<T: Value> Node for State<T> {
    type Output = T;

    fn as_state(&self) -> &State<T> {
        self
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            id: self.id,
            _marker: PhantomData,
        }
    }
}

impl<T> Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("type", &type_name::<T>())
            .finish()
    }
}

/// Handle to a root node: the only kind of single value that can be
/// assigned from outside the graph.
pub struct MutableState<T> {
    state: State<T>,
}

impl<T: Value> MutableState<T> {
    pub(crate) fn from_state(state: State<T>) -> Self {
        Self { state }
    }

    /// Replace the value and mark every transitive dependent dirty.
    ///
    /// Dependents are not recomputed here; they pull the new value when
    /// next read.
    #[track_caller]
    pub fn set(&self, value: T) {
        let id = self.state.id;
        self.state
            .graph
            .with_store(|store| store.assign(id, erase(value)).map(drop));
    }

    /// Set the value to `f` applied to the current value.
    #[track_caller]
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let id = self.state.id;
        self.state.graph.with_store(|store| {
            let next = f(store.read::<T>(id)?);
            store.assign(id, erase(next)).map(drop)
        });
    }

    /// A read-only handle to the same node.
    pub fn read_only(&self) -> State<T> {
        self.state.clone()
    }
}

impl<T: Value> Node for MutableState<T> {
    type Output = T;

    fn as_state(&self) -> &State<T> {
        &self.state
    }
}

impl<T> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T> Debug for MutableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableState")
            .field("id", &self.state.id)
            .field("type", &type_name::<T>())
            .finish()
    }
}

impl<T: Value> From<MutableState<T>> for State<T> {
    fn from(state: MutableState<T>) -> Self {
        state.state
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
