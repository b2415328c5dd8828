//! Indexed Collections
//!
//! A [`StateList`] is a source node holding an ordered sequence. Any write,
//! replacing an element or inserting one, invalidates the whole dependent
//! subgraph; there is no per-index tracking.
//!
//! Accessor nodes created with [`StateList::at`] are bound to an index
//! number, not to an element. After an insertion shifts the elements, an
//! accessor reads whatever now sits at its index.

use std::any::type_name;
use std::fmt::{self, Debug};

use super::state::{Node, State, Value};
use crate::error::{GraphError, Result};
use crate::graph::{derivation, downcast_input, erase, NodeKind};

/// Handle to an indexed collection node.
pub struct StateList<T> {
    state: State<Vec<T>>,
}

impl<T: Value> StateList<T> {
    pub(crate) fn from_state(state: State<Vec<T>>) -> Self {
        Self { state }
    }

    /// Read the element at `index` directly.
    ///
    /// Returns `None` when `index` is out of range.
    #[track_caller]
    pub fn get(&self, index: usize) -> Option<T> {
        self.with_items(|items| items.get(index).cloned())
    }

    #[track_caller]
    pub fn len(&self) -> usize {
        self.with_items(<[T]>::len)
    }

    #[track_caller]
    pub fn is_empty(&self) -> bool {
        self.with_items(<[T]>::is_empty)
    }

    /// Replace the element at `index` and invalidate all dependents.
    ///
    /// Requires `index < len`.
    pub fn set_at(&self, index: usize, value: T) -> Result<()> {
        let id = self.state.id();
        self.state.graph().try_with_store(|store| {
            let items = store.source_mut::<Vec<T>>(id)?;
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(GraphError::IndexOutOfRange { index, len })?;
            *slot = value;
            store.mark_changed(id)?;
            Ok(())
        })
    }

    /// Insert an element at `index`, shifting later elements, and
    /// invalidate all dependents.
    ///
    /// Requires `index <= len`.
    pub fn insert_at(&self, index: usize, value: T) -> Result<()> {
        let id = self.state.id();
        self.state.graph().try_with_store(|store| {
            let items = store.source_mut::<Vec<T>>(id)?;
            let len = items.len();
            if index > len {
                return Err(GraphError::IndexOutOfRange { index, len });
            }
            items.insert(index, value);
            store.mark_changed(id)?;
            Ok(())
        })
    }

    /// Append an element and invalidate all dependents.
    #[track_caller]
    pub fn push(&self, value: T) {
        let id = self.state.id();
        self.state.graph().with_store(|store| {
            store.source_mut::<Vec<T>>(id)?.push(value);
            store.mark_changed(id).map(drop)
        });
    }

    /// Create an accessor node bound to `index`.
    ///
    /// Its value is `None` while `index` is out of range.
    #[track_caller]
    pub fn at(&self, index: usize) -> State<Option<T>> {
        let derive = derivation(move |inputs| {
            let items = downcast_input::<Vec<T>>(inputs, 0)?;
            Ok(erase(items.get(index).cloned()))
        });
        super::graph::live(self.state.graph().insert_derived(
            NodeKind::ListAccess { index },
            &[self.state.id()],
            derive,
        ))
    }

    #[track_caller]
    fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let id = self.state.id();
        self.state
            .graph()
            .with_store(|store| Ok(f(store.read::<Vec<T>>(id)?.as_slice())))
    }
}

impl<T: Value> Node for StateList<T> {
    type Output = Vec<T>;

    fn as_state(&self) -> &State<Vec<T>> {
        &self.state
    }
}

impl<T> Clone for StateList<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T> Debug for StateList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateList")
            .field("state", &self.state)
            .field("item_type", &type_name::<T>())
            .finish()
    }
}
