//! Multi-source derived nodes.
//!
//! A zip node caches the result of a function over several sources and is
//! registered as a dependent of each of them. Sources are read in argument
//! order when the node recomputes.

use std::any::{type_name, Any};
use std::convert::Infallible;

use smallvec::{smallvec, SmallVec};

use super::graph::Graph;
use super::state::{Node, State, Value};
use crate::error::{BoxError, Result};
use crate::graph::{derivation, downcast_input, erase, DeriveError, NodeId, NodeKind};

/// A tuple of node handles that can feed a zip node.
///
/// Implemented for tuples of one to six node references, e.g.
/// `(&State<i32>, &MutableState<String>)`.
pub trait Sources {
    /// Tuple of the sources' values, in the same order.
    type Values: Send + 'static;

    fn node_ids(&self) -> SmallVec<[NodeId; 4]>;

    /// Fail if any source belongs to another graph.
    fn check_graph(&self, graph: &Graph) -> Result<()>;

    /// Clone the sources' values out of the type-erased inputs.
    ///
    /// On failure, returns the position and expected type of the input that
    /// did not match.
    #[doc(hidden)]
    fn extract(
        inputs: &[&(dyn Any + Send)],
    ) -> std::result::Result<Self::Values, (usize, &'static str)>;
}

fn input_at<'a, T: 'static>(
    inputs: &[&'a (dyn Any + Send)],
    position: usize,
) -> std::result::Result<&'a T, (usize, &'static str)> {
    inputs
        .get(position)
        .and_then(|input| input.downcast_ref::<T>())
        .ok_or((position, type_name::<T>()))
}

macro_rules! impl_sources {
    ($($node:ident => $idx:tt),+) => {
        impl<$($node: Node),+> Sources for ($(&$node,)+) {
            type Values = ($(<$node as Node>::Output,)+);

            fn node_ids(&self) -> SmallVec<[NodeId; 4]> {
                smallvec![$(self.$idx.id()),+]
            }

            fn check_graph(&self, graph: &Graph) -> Result<()> {
                $(graph.check_owned(self.$idx)?;)+
                Ok(())
            }

            fn extract(
                inputs: &[&(dyn Any + Send)],
            ) -> std::result::Result<Self::Values, (usize, &'static str)> {
                Ok(($(
                    input_at::< <$node as Node>::Output >(inputs, $idx)?.clone(),
                )+))
            }
        }
    };
}

impl_sources!(A => 0);
impl_sources!(A => 0, B => 1);
impl_sources!(A => 0, B => 1, C => 2);
impl_sources!(A => 0, B => 1, C => 2, D => 3);
impl_sources!(A => 0, B => 1, C => 2, D => 3, E => 4);
impl_sources!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);

impl Graph {
    /// Combine a tuple of nodes into one through an n-ary function.
    ///
    /// The function receives the sources' current values as a tuple, in
    /// argument order.
    ///
    /// ```rust
    /// use sx_core::prelude::*;
    ///
    /// let graph = Graph::new();
    /// let first = graph.state("Ada".to_string());
    /// let last = graph.state("Lovelace".to_string());
    /// let full = graph
    ///     .zip((&first, &last), |(first, last): (String, String)| format!("{first} {last}"))
    ///     .unwrap();
    ///
    /// assert_eq!(full.value().unwrap(), "Ada Lovelace");
    /// ```
    pub fn zip<S, U, F>(&self, sources: S, f: F) -> Result<State<U>>
    where
        S: Sources,
        U: Value,
        F: Fn(S::Values) -> U + Send + 'static,
    {
        self.try_zip(sources, move |values| Ok::<U, Infallible>(f(values)))
    }

    /// Like [`Graph::zip`], for a function that can fail.
    ///
    /// An error from `f` surfaces from [`Node::value`] as
    /// [`GraphError::Derivation`](crate::error::GraphError::Derivation) and
    /// leaves the node dirty, so the next read retries it.
    pub fn try_zip<S, U, E, F>(&self, sources: S, f: F) -> Result<State<U>>
    where
        S: Sources,
        U: Value,
        E: Into<BoxError>,
        F: Fn(S::Values) -> std::result::Result<U, E> + Send + 'static,
    {
        sources.check_graph(self)?;
        let derive = derivation(move |inputs| {
            let values = S::extract(inputs)
                .map_err(|(position, expected)| DeriveError::Input { position, expected })?;
            f(values)
                .map(erase)
                .map_err(|err| DeriveError::Failed(err.into()))
        });
        self.insert_derived(NodeKind::Zip, &sources.node_ids(), derive)
    }

    /// Combine any number of nodes of the same type into one.
    ///
    /// The function receives the sources' current values in slice order.
    pub fn combine<N, U, F>(&self, sources: &[N], f: F) -> Result<State<U>>
    where
        N: Node,
        U: Value,
        F: Fn(&[&N::Output]) -> U + Send + 'static,
    {
        self.try_combine(sources, move |values: &[&N::Output]| Ok::<U, Infallible>(f(values)))
    }

    /// Like [`Graph::combine`], for a function that can fail.
    pub fn try_combine<N, U, E, F>(&self, sources: &[N], f: F) -> Result<State<U>>
    where
        N: Node,
        U: Value,
        E: Into<BoxError>,
        F: Fn(&[&N::Output]) -> std::result::Result<U, E> + Send + 'static,
    {
        for source in sources {
            self.check_owned(source)?;
        }
        let ids: SmallVec<[NodeId; 4]> = sources.iter().map(|source| source.id()).collect();
        let count = ids.len();
        let derive = derivation(move |inputs| {
            let mut values: SmallVec<[&N::Output; 4]> = SmallVec::with_capacity(count);
            for position in 0..count {
                values.push(downcast_input::<N::Output>(inputs, position)?);
            }
            f(values.as_slice())
                .map(erase)
                .map_err(|err| DeriveError::Failed(err.into()))
        });
        self.insert_derived(NodeKind::Zip, &ids, derive)
    }
}

/// Derive a node from two sources.
pub(crate) fn zip_pair<A, B, U, F>(a: &State<A>, b: &State<B>, f: F) -> Result<State<U>>
where
    A: Value,
    B: Value,
    U: Value,
    F: Fn(&A, &B) -> U + Send + 'static,
{
    let graph = a.graph();
    graph.check_owned(b)?;
    let derive = derivation(move |inputs| {
        let left = downcast_input::<A>(inputs, 0)?;
        let right = downcast_input::<B>(inputs, 1)?;
        Ok(erase(f(left, right)))
    });
    graph.insert_derived(NodeKind::Zip, &[a.id(), b.id()], derive)
}
