//! Everything needed to build and read a graph.
//!
//! ```rust
//! use sx_core::prelude::*;
//!
//! let graph = Graph::new();
//! let count = graph.state(1);
//! let label = count.map(|x| format!("{x} item(s)"));
//! assert_eq!(label.value().unwrap(), "1 item(s)");
//! ```

pub use crate::config::GraphConfig;
pub use crate::error::GraphError;
pub use crate::reactive::{Graph, MaybeState, MutableState, Node, State, StateList};
