//! Graph configuration.

use serde::{Deserialize, Serialize};

/// Options applied when a [`Graph`](crate::reactive::Graph) is created.
///
/// ```rust
/// use sx_core::config::GraphConfig;
///
/// let config = GraphConfig::new().label("counter").node_capacity(64);
/// assert_eq!(config.label.as_deref(), Some("counter"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Name of the graph in log events and snapshots.
    pub label: Option<String>,

    /// Number of nodes to reserve room for up front.
    pub node_capacity: usize,
}

impl GraphConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label used in log events and snapshots.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the number of nodes to reserve room for.
    pub fn node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }
}
