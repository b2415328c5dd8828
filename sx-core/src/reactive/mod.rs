//! Reactive State
//!
//! This module implements the typed surface of the state graph: root
//! states, constants, single- and multi-source derived states, and indexed
//! lists with per-index accessors.
//!
//! # Concepts
//!
//! ## Roots
//!
//! A root ([`MutableState`]) is the source of truth. Setting it marks every
//! state derived from it, directly or through other derived states, as
//! dirty. Nothing is recomputed at that point.
//!
//! ## Derived States
//!
//! A derived [`State`] caches the result of a pure function over one source
//! ([`Node::map`]) or several ([`Graph::zip`], [`Graph::combine`]). Reading
//! a dirty derived state recomputes it from its sources, which resolve
//! themselves the same way first. Reading a clean one returns the cache.
//!
//! ## Lists
//!
//! A [`StateList`] is a root holding a sequence. Replacing or inserting an
//! element invalidates every dependent of the list, including every accessor
//! created with [`StateList::at`].
//!
//! # Implementation Notes
//!
//! Dependencies are explicit: a derived state is registered with its
//! sources when it is created, never by observing reads. This is the
//! push/pull hybrid of a dirty-flag push on write and a lazy pull on read.

mod graph;
mod list;
mod maybe;
mod state;
mod zip;

pub use graph::Graph;
pub use list::StateList;
pub use maybe::MaybeState;
pub use state::{MutableState, Node, State, Value};
pub use zip::Sources;
