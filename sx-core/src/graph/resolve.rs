//! Pull Resolution
//!
//! Reading a dirty node re-derives it from its sources. Dirty sources are
//! resolved first, so a read recomputes exactly the stale part of the
//! node's upstream cone, each node at most once, and nothing else.
//!
//! Resolution uses an explicit stack instead of recursion so that deep
//! chains cannot exhaust the call stack. Nodes that are expanded and still
//! waiting on their sources form the current path; meeting one of them
//! again means the graph has a cycle.

use std::any::Any;
use std::collections::HashSet;

use smallvec::SmallVec;
use tracing::{trace, warn};

use super::node::{DeriveError, NodeId};
use super::store::NodeStore;
use crate::error::{GraphError, Result};

struct Frame {
    node: NodeId,
    expanded: bool,
}

impl NodeStore {
    /// Bring `target` up to date.
    ///
    /// Returns the number of nodes that were recomputed. On error, the
    /// failing node and everything downstream of it stay dirty; nodes
    /// recomputed before the failure keep their (consistent) new values.
    pub fn resolve(&mut self, target: NodeId) -> Result<usize> {
        if !self.slot(target)?.is_dirty() {
            return Ok(0);
        }

        let mut stack = vec![Frame {
            node: target,
            expanded: false,
        }];
        let mut path: HashSet<NodeId> = HashSet::new();
        let mut recomputed = 0;

        while let Some(frame) = stack.last_mut() {
            let node_id = frame.node;
            let slot = self.slot(node_id)?;

            if !slot.is_dirty() {
                stack.pop();
                continue;
            }

            if !frame.expanded {
                frame.expanded = true;
                path.insert(node_id);

                let mut pending: SmallVec<[NodeId; 4]> = SmallVec::new();
                for &source in slot.sources().iter().rev() {
                    if path.contains(&source) {
                        return Err(GraphError::CycleDetected(source));
                    }
                    if self.slot(source)?.is_dirty() {
                        pending.push(source);
                    }
                }
                stack.extend(pending.into_iter().map(|node| Frame {
                    node,
                    expanded: false,
                }));
                continue;
            }

            self.recompute(node_id)?;
            recomputed += 1;
            path.remove(&node_id);
            stack.pop();
        }

        Ok(recomputed)
    }

    /// Run the derivation of `node_id` over its (clean) sources and cache
    /// the result.
    fn recompute(&mut self, node_id: NodeId) -> Result<()> {
        let value = {
            let slot = self.slot(node_id)?;
            let Some(derive) = slot.derivation() else {
                // Source kinds are never dirty.
                return Ok(());
            };

            let mut inputs: SmallVec<[&(dyn Any + Send); 4]> = SmallVec::new();
            for &source in slot.sources() {
                // A clean node always has a value; a missing one means the
                // source was never resolved, which only a cycle can cause.
                let value = self
                    .slot(source)?
                    .cached()
                    .ok_or(GraphError::CycleDetected(source))?;
                inputs.push(value);
            }

            derive(inputs.as_slice()).map_err(|err| match err {
                DeriveError::Failed(source) => {
                    warn!(graph = self.label(), node = %node_id, error = %source, "derivation failed");
                    GraphError::Derivation {
                        node: node_id,
                        source,
                    }
                }
                DeriveError::Input { position, expected } => GraphError::TypeMismatch {
                    node: slot.sources().get(position).copied().unwrap_or(node_id),
                    expected,
                },
            })?
        };

        trace!(graph = self.label(), node = %node_id, "recomputed");
        self.slot_mut(node_id)?.store(value);
        Ok(())
    }
}
