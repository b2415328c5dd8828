//! Maybe-reactive values.
//!
//! Code that consumes graph values, such as an element builder taking
//! properties, often accepts either a plain value or a node. [`MaybeState`]
//! makes that choice explicit, and [`Graph::flat_wrap`](super::Graph::flat_wrap)
//! turns either form into a node.

use super::list::StateList;
use super::state::{MutableState, Node, State, Value};

/// Either a plain value or a node producing one.
#[derive(Debug, Clone)]
pub enum MaybeState<T> {
    /// A plain value, lifted into a constant node on demand.
    Raw(T),
    /// An existing node.
    Reactive(State<T>),
}

impl<T: Value> MaybeState<T> {
    /// Returns `true` if this is already a node.
    pub fn is_reactive(&self) -> bool {
        matches!(self, Self::Reactive(_))
    }

    /// The plain value, if this is not a node.
    pub fn as_raw(&self) -> Option<&T> {
        match self {
            Self::Raw(value) => Some(value),
            Self::Reactive(_) => None,
        }
    }
}

impl<T: Value> From<State<T>> for MaybeState<T> {
    fn from(state: State<T>) -> Self {
        Self::Reactive(state)
    }
}

impl<T: Value> From<MutableState<T>> for MaybeState<T> {
    fn from(state: MutableState<T>) -> Self {
        Self::Reactive(state.into())
    }
}

impl<T: Value> From<StateList<T>> for MaybeState<Vec<T>> {
    fn from(list: StateList<T>) -> Self {
        Self::Reactive(list.as_state().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Graph;

    #[test]
    fn discriminates_raw_and_reactive() {
        let graph = Graph::new();
        let raw = MaybeState::Raw("title".to_string());
        let reactive = MaybeState::from(graph.state("title".to_string()));

        assert!(!raw.is_reactive());
        assert_eq!(raw.as_raw().map(String::as_str), Some("title"));
        assert!(reactive.is_reactive());
        assert!(reactive.as_raw().is_none());
    }

    #[test]
    fn flat_wrap_keeps_reactivity() {
        let graph = Graph::new();
        let title = graph.state("a".to_string());
        let wrapped = graph.flat_wrap(MaybeState::from(title.clone())).unwrap();
        let fixed = graph.flat_wrap(MaybeState::Raw("b".to_string())).unwrap();

        title.set("c".to_string());
        assert_eq!(wrapped.value().unwrap(), "c");
        assert_eq!(fixed.value().unwrap(), "b");
    }

    #[test]
    fn lists_lift_as_their_sequence() {
        let graph = Graph::new();
        let list = graph.list(vec![1, 2]);
        let wrapped = graph.flat_wrap(MaybeState::from(list.clone())).unwrap();

        list.push(3);
        assert_eq!(wrapped.value().unwrap(), vec![1, 2, 3]);
    }
}
