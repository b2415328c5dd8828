//! Reactive Graph
//!
//! The [`Graph`] owns the node store and hands out typed handles into it.
//!
//! # Thread Safety
//!
//! A graph is a cheap-to-clone shared handle. The store sits behind a
//! re-entrant mutex so that handles can be sent to and used from other
//! threads; every operation runs to completion under the lock, so a write
//! is fully propagated before any other thread can read.
//!
//! Derivation functions run while the lock is held. A derivation that
//! touches its own graph gets [`GraphError::Reentrant`] (or a panic, for
//! operations that do not return a `Result`) instead of a deadlock.

use std::any::type_name;
use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::sync::Arc;

use parking_lot::ReentrantMutex;
use tracing::debug;

use super::list::StateList;
use super::maybe::MaybeState;
use super::state::{MutableState, Node, State, Value};
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::graph::{erase, Derivation, GraphSnapshot, NodeId, NodeKind, NodeStore, Slot};

/// A reactive state graph.
///
/// # Example
///
/// ```rust
/// use sx_core::prelude::*;
///
/// let graph = Graph::new();
/// let count = graph.state(0);
/// let text = count.map(|x| format!("Counter: {x}"));
/// let upper = text.map(|s| s.to_uppercase());
///
/// count.set(10);
/// assert_eq!(upper.value().unwrap(), "COUNTER: 10");
/// ```
#[derive(Clone)]
pub struct Graph {
    inner: Arc<ReentrantMutex<RefCell<NodeStore>>>,
}

impl Graph {
    /// Create an empty graph with default configuration.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Create an empty graph.
    pub fn with_config(config: GraphConfig) -> Self {
        debug!(
            graph = config.label.as_deref().unwrap_or("unnamed"),
            node_capacity = config.node_capacity,
            "graph created"
        );
        let store = NodeStore::with_capacity(config.label, config.node_capacity);
        Self {
            inner: Arc::new(ReentrantMutex::new(RefCell::new(store))),
        }
    }

    /// Run `f` with exclusive access to the store.
    pub(crate) fn try_with_store<R>(
        &self,
        f: impl FnOnce(&mut NodeStore) -> Result<R>,
    ) -> Result<R> {
        let guard = self.inner.lock();
        let mut store = guard.try_borrow_mut().map_err(|_| GraphError::Reentrant)?;
        f(&mut store)
    }

    /// Like [`Graph::try_with_store`], for operations whose only failure
    /// modes are misuse: a disposed handle or re-entrant access.
    #[track_caller]
    pub(crate) fn with_store<R>(&self, f: impl FnOnce(&mut NodeStore) -> Result<R>) -> R {
        live(self.try_with_store(f))
    }

    /// Returns `true` if both handles refer to the same graph.
    pub fn same_graph(&self, other: &Graph) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn check_owned<N: Node + ?Sized>(&self, node: &N) -> Result<()> {
        if self.same_graph(node.graph()) {
            Ok(())
        } else {
            Err(GraphError::ForeignNode(node.id()))
        }
    }

    /// The label the graph was configured with.
    pub fn label(&self) -> Option<String> {
        self.with_store(|store| Ok(store.label_opt().map(str::to_owned)))
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.with_store(|store| Ok(store.node_count()))
    }

    /// Capture the current topology (kinds, edges, dirty flags).
    pub fn snapshot(&self) -> GraphSnapshot {
        self.with_store(|store| Ok(store.snapshot()))
    }

    /// Create a mutable root node.
    pub fn state<T: Value>(&self, initial: T) -> MutableState<T> {
        MutableState::from_state(self.insert_source(NodeKind::Root, initial))
    }

    /// Lift a fixed value into the graph.
    pub fn constant<T: Value>(&self, value: T) -> State<T> {
        self.insert_source(NodeKind::Constant, value)
    }

    /// Create an indexed collection node.
    pub fn list<T: Value>(&self, items: impl IntoIterator<Item = T>) -> StateList<T> {
        let items: Vec<T> = items.into_iter().collect();
        StateList::from_state(self.insert_source(NodeKind::List, items))
    }

    /// Create an empty indexed collection node.
    pub fn empty_list<T: Value>(&self) -> StateList<T> {
        self.list(Vec::new())
    }

    /// Turn a maybe-reactive value into a node.
    ///
    /// Raw values become constants; nodes pass through unchanged.
    pub fn flat_wrap<T: Value>(&self, value: MaybeState<T>) -> Result<State<T>> {
        match value {
            MaybeState::Raw(value) => Ok(self.constant(value)),
            MaybeState::Reactive(state) => {
                self.check_owned(&state)?;
                Ok(state)
            }
        }
    }

    #[track_caller]
    fn insert_source<T: Value>(&self, kind: NodeKind, value: T) -> State<T> {
        let id = self.with_store(|store| {
            store.insert(Slot::source(kind, erase(value), type_name::<T>()))
        });
        State::from_parts(self.clone(), id)
    }

    /// Add a derived node over `sources`, which must belong to this graph.
    pub(crate) fn insert_derived<U: Value>(
        &self,
        kind: NodeKind,
        sources: &[NodeId],
        derive: Derivation,
    ) -> Result<State<U>> {
        let id = self.try_with_store(|store| {
            store.insert(Slot::derived(kind, sources, derive, type_name::<U>()))
        })?;
        Ok(State::from_parts(self.clone(), id))
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_with_store(|store| Ok((store.label_opt().map(str::to_owned), store.node_count()))) {
            Ok((label, node_count)) => f
                .debug_struct("Graph")
                .field("label", &label)
                .field("node_count", &node_count)
                .finish(),
            Err(_) => f.debug_struct("Graph").finish_non_exhaustive(),
        }
    }
}

/// Unwrap the result of an operation that can only fail through misuse.
#[track_caller]
pub(crate) fn live<R>(result: Result<R>) -> R {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}
