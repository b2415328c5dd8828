//! Node Store
//!
//! This module implements the untyped dependency graph: an arena of slots
//! addressed by [`NodeId`], each holding a type-erased cached value, a dirty
//! flag, and its edges.
//!
//! # Overview
//!
//! The graph is a directed acyclic graph (DAG) where:
//!
//! - Source nodes (roots, constants, lists) hold values written from outside
//! - Derived nodes (maps, zips, list accessors) hold cached results of a
//!   pure function over their sources
//! - Edges run from a source to each of its dependents
//!
//! Writes push: a changed source marks its whole dependent cone dirty
//! (see `propagate`). Reads pull: a dirty node re-derives itself from its
//! sources, resolving stale sources first (see `resolve`).
//!
//! # Design Decisions
//!
//! 1. Nodes live in one arena and refer to each other by index, so edges
//!    never own their targets and there is no reference cycle to break.
//!
//! 2. A derived node can only be created over nodes that already exist, so
//!    every edge points from an older node to a newer one and the graph is
//!    acyclic by construction. Resolution still checks for cycles.
//!
//! 3. Edges are append-only. The one exception is explicit disposal of a
//!    node that has no dependents left.

mod node;
mod propagate;
mod resolve;
mod snapshot;
mod store;

pub use node::{NodeId, NodeKind};
pub use snapshot::{GraphSnapshot, NodeSnapshot};

pub(crate) use node::{derivation, downcast_input, erase, Derivation, DeriveError, Slot};
pub(crate) use store::NodeStore;
