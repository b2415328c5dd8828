//! Node Store
//!
//! The store owns every slot of a graph. Nodes address each other by
//! [`NodeId`], which is an index into the store, so edges never hold live
//! references and traversal never fights the borrow checker.

use std::any::Any;

use tracing::debug;

use super::node::{ErasedValue, NodeId, NodeKind, Slot};
use crate::error::{GraphError, Result};

/// Arena of graph slots.
///
/// Disposed slots are vacated but never reused.
pub(crate) struct NodeStore {
    label: Option<String>,
    slots: Vec<Option<Slot>>,
    live: usize,
}

impl NodeStore {
    /// Create an empty store with room for `capacity` nodes.
    pub fn with_capacity(label: Option<String>, capacity: usize) -> Self {
        Self {
            label,
            slots: Vec::with_capacity(capacity),
            live: 0,
        }
    }

    /// Label used in log events and snapshots.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("unnamed")
    }

    pub fn label_opt(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Add a slot and register it as a dependent of each of its sources.
    ///
    /// Fails if any source has been disposed.
    pub fn insert(&mut self, slot: Slot) -> Result<NodeId> {
        for &source in slot.sources() {
            self.slot(source)?;
        }

        let id = NodeId::from_raw(self.slots.len() as u64);
        for &source in slot.sources() {
            self.slot_mut(source)?.add_dependent(id);
        }

        debug!(
            graph = self.label(),
            node = %id,
            kind = ?slot.kind(),
            value_type = slot.type_name(),
            "node created"
        );

        self.slots.push(Some(slot));
        self.live += 1;
        Ok(id)
    }

    pub fn slot(&self, id: NodeId) -> Result<&Slot> {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(GraphError::Disposed(id))
    }

    pub fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(GraphError::Disposed(id))
    }

    /// Iterate over live slots in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Slot)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| Some((NodeId::from_raw(index as u64), slot.as_ref()?)))
    }

    /// Borrow the cached value of a clean node as a `T`.
    pub fn read<T: Any>(&self, id: NodeId) -> Result<&T> {
        let slot = self.slot(id)?;
        debug_assert!(!slot.is_dirty(), "read of dirty node {id}");
        slot.cached()
            .and_then(|value| value.downcast_ref::<T>())
            .ok_or_else(|| GraphError::TypeMismatch {
                node: id,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Mutably borrow the value of a source node as a `T`.
    ///
    /// The caller is responsible for calling [`NodeStore::mark_changed`]
    /// once the mutation is done.
    pub fn source_mut<T: Any>(&mut self, id: NodeId) -> Result<&mut T> {
        let slot = self.slot_mut(id)?;
        debug_assert!(slot.kind().is_source(), "write to derived node {id}");
        slot.cached_mut()
            .and_then(|value| value.downcast_mut::<T>())
            .ok_or_else(|| GraphError::TypeMismatch {
                node: id,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Replace the value of a source node and invalidate its dependents.
    ///
    /// Returns the number of nodes that became dirty.
    pub fn assign(&mut self, id: NodeId, value: ErasedValue) -> Result<usize> {
        let slot = self.slot_mut(id)?;
        debug_assert!(slot.kind().is_source(), "assignment to derived node {id}");
        slot.store(value);
        self.mark_changed(id)
    }

    /// Detach a node from the graph and vacate its slot.
    ///
    /// Only nodes without dependents can be disposed; dispose leaves first.
    pub fn dispose(&mut self, id: NodeId) -> Result<()> {
        let slot = self.slot(id)?;
        if !slot.dependents().is_empty() {
            return Err(GraphError::HasDependents {
                node: id,
                count: slot.dependents().len(),
            });
        }

        let slot = self.slots[id.index()]
            .take()
            .ok_or(GraphError::Disposed(id))?;
        for &source in slot.sources() {
            // A source listed twice (zip of a node with itself) is detached once.
            if let Ok(source_slot) = self.slot_mut(source) {
                source_slot.remove_dependent(id);
            }
        }
        self.live -= 1;

        debug!(graph = self.label(), node = %id, kind = ?slot.kind(), "node disposed");
        Ok(())
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.live
    }
}
