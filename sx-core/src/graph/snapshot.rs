//! Topology snapshots for debugging.
//!
//! A snapshot records the shape of a graph (kinds, edges, dirty flags) but
//! none of its values, so it can be dumped from any graph regardless of the
//! value types inside it.

use serde::{Deserialize, Serialize};

use super::node::{NodeId, NodeKind};
use super::store::NodeStore;

/// One node of a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub kind: NodeKind,
    pub dirty: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependents: Vec<NodeId>,
    pub value_type: String,
}

/// The topology of a graph at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub label: Option<String>,
    pub nodes: Vec<NodeSnapshot>,
}

impl GraphSnapshot {
    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Number of nodes currently flagged dirty.
    pub fn dirty_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.dirty).count()
    }
}

impl NodeStore {
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            label: self.label_opt().map(str::to_owned),
            nodes: self
                .iter()
                .map(|(id, slot)| NodeSnapshot {
                    id,
                    kind: slot.kind(),
                    dirty: slot.is_dirty(),
                    sources: slot.sources().to_vec(),
                    dependents: slot.dependents().to_vec(),
                    value_type: slot.type_name().to_owned(),
                })
                .collect(),
        }
    }
}
