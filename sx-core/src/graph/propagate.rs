//! Push Propagation
//!
//! A write to a source node marks every node reachable through `dependents`
//! as dirty. Nothing is recomputed here; derived nodes pull their new value
//! lazily on the next read.
//!
//! # Algorithm
//!
//! Depth-first traversal with an explicit stack, visiting dependents in
//! registration order. A node that is already dirty is not descended into:
//! every dependent of a dirty node is itself dirty, because
//!
//! - derived nodes are created dirty, so a node created below a dirty
//!   source starts dirty, and
//! - resolution always cleans a node's sources before the node itself.
//!
//! This keeps a write linear in the number of newly dirtied nodes, even
//! when diamonds make the shared tail reachable along many paths.

use tracing::debug;

use super::node::NodeId;
use super::store::NodeStore;
use crate::error::Result;

impl NodeStore {
    /// Mark all transitive dependents of `source` dirty.
    ///
    /// Returns the number of nodes that were clean before the call.
    pub fn mark_changed(&mut self, source: NodeId) -> Result<usize> {
        let mut stack: Vec<NodeId> = self.slot(source)?.dependents().iter().rev().copied().collect();
        let mut marked = 0;

        while let Some(node_id) = stack.pop() {
            // Dependents are detached before their slot is vacated, so a
            // missing slot here means the edge list is stale; skip it.
            let Ok(node) = self.slot_mut(node_id) else {
                continue;
            };
            if !node.mark_dirty() {
                continue;
            }
            marked += 1;
            stack.extend(node.dependents().iter().rev().copied());
        }

        debug!(graph = self.label(), source = %source, marked, "source changed");
        Ok(marked)
    }
}
