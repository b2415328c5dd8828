//! Sx Core
//!
//! This crate provides a minimal reactive dataflow graph. A mutable root
//! value is transformed through pure functions into derived values that
//! stay consistent with the root without being recomputed on every change.
//!
//! - Writes push: assigning a root marks its whole dependent subgraph dirty.
//! - Reads pull: reading a dirty node recomputes it from its sources and
//!   caches the result until the next invalidation.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Untyped node store, push propagation and pull resolution
//! - `reactive`: Typed handles (roots, derived states, lists)
//! - `config`: Graph configuration
//! - `error`: Error taxonomy
//!
//! # Example
//!
//! ```rust
//! use sx_core::prelude::*;
//!
//! let graph = Graph::new();
//! let count = graph.state(0);
//! let shout = count
//!     .map(|x| format!("  Counter: {x}  "))
//!     .map(|s| s.to_uppercase())
//!     .map(|s| s.trim().to_string());
//!
//! count.set(10);
//! assert_eq!(shout.value().unwrap(), "COUNTER: 10");
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod reactive;
