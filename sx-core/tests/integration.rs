//! Integration Tests for the State Graph
//!
//! These tests exercise roots, derived states, zips and lists together
//! through the public API.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use sx_core::graph::NodeKind;
use sx_core::prelude::*;

fn counter() -> (Arc<AtomicI32>, Arc<AtomicI32>) {
    let calls = Arc::new(AtomicI32::new(0));
    (calls.clone(), calls)
}

/// A derived state equals its function applied to the initial value.
#[test]
fn derived_value_before_any_write() {
    let graph = Graph::new();
    let root = graph.state(7);
    let squared = root.map(|x| x * x);
    assert_eq!(squared.value().unwrap(), 49);
}

/// The counter scenario: root -> text -> upper case.
#[test]
fn counter_text_upper_case() {
    let graph = Graph::new();
    let count = graph.state(0);
    let text = count.map(|x| format!("Counter: {x}"));
    let upper = text.map(|s| s.to_uppercase());

    count.set(10);
    assert_eq!(upper.value().unwrap(), "COUNTER: 10");
}

/// The padded counter scenario: root -> padded text -> upper -> trim.
#[test]
fn counter_padded_upper_trim_chain() {
    let graph = Graph::new();
    let count = graph.state(0);
    let chain = count
        .map(|x| format!("  Counter: {x}  "))
        .map(|s| s.to_uppercase())
        .map(|s| s.trim().to_string());

    count.set(10);
    assert_eq!(chain.value().unwrap(), "COUNTER: 10");
}

/// A write reaches nodes any number of hops away.
#[test]
fn multi_hop_propagation() {
    let graph = Graph::new();
    let root = graph.state(1);
    let mut last = root.map(|x| x + 1);
    for _ in 0..20 {
        last = last.map(|x| x + 1);
    }
    let mixed = graph
        .zip((&last, &root), |(last, root): (i32, i32)| last * 100 + root)
        .unwrap();

    assert_eq!(mixed.value().unwrap(), 22 * 100 + 1);
    root.set(5);
    assert_eq!(last.value().unwrap(), 26);
    assert_eq!(mixed.value().unwrap(), 26 * 100 + 5);
}

/// Reading twice without a write in between recomputes nothing.
#[test]
fn repeated_reads_hit_the_cache() {
    let graph = Graph::new();
    let (calls, calls_clone) = counter();
    let root = graph.state(3);
    let tripled = root.map(move |x| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        x * 3
    });

    assert_eq!(tripled.value().unwrap(), 9);
    assert_eq!(tripled.value().unwrap(), 9);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    root.set(4);
    assert_eq!(tripled.value().unwrap(), 12);
    assert_eq!(tripled.value().unwrap(), 12);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// Diamond: R -> A, R -> B, (A, B) -> C.
#[test]
fn diamond_dependency() {
    let graph = Graph::new();
    let (c_calls, c_calls_clone) = counter();
    let (a_calls, a_calls_clone) = counter();

    let root = graph.state(2);
    let a = root.map(move |x| {
        a_calls_clone.fetch_add(1, Ordering::SeqCst);
        x + 1
    });
    let b = root.map(|x| x * 10);
    let c = graph
        .zip((&a, &b), move |(a, b): (i32, i32)| {
            c_calls_clone.fetch_add(1, Ordering::SeqCst);
            format!("{a}/{b}")
        })
        .unwrap();

    assert_eq!(c.value().unwrap(), "3/20");

    root.set(5);
    // Reading the arms first does not change how often C recomputes.
    assert_eq!(a.value().unwrap(), 6);
    assert_eq!(b.value().unwrap(), 50);
    assert_eq!(a.value().unwrap(), 6);
    assert_eq!(c.value().unwrap(), "6/50");
    assert_eq!(c.value().unwrap(), "6/50");

    assert_eq!(c_calls.load(Ordering::SeqCst), 2);
    assert_eq!(a_calls.load(Ordering::SeqCst), 2);
}

/// Set then get on a list, and an accessor following the write.
#[test]
fn list_set_and_accessor() {
    let graph = Graph::new();
    let list = graph.list(vec!["x".to_string(), "y".to_string()]);
    let second = list.at(1);
    assert_eq!(second.value().unwrap().as_deref(), Some("y"));

    list.set_at(1, "z".to_string()).unwrap();
    assert_eq!(list.get(1).as_deref(), Some("z"));
    assert_eq!(second.value().unwrap().as_deref(), Some("z"));
}

/// Writes out of range fail; reads out of range are absent.
#[test]
fn list_out_of_range_contract() {
    let graph = Graph::new();
    let list = graph.list(vec![1, 2, 3]);
    let len = list.len();

    let err = list.set_at(len, 4).unwrap_err();
    assert!(matches!(err, GraphError::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(list.get(len), None);
    assert_eq!(list.at(len).value().unwrap(), None);
}

/// Regression guard: inserting must invalidate dependents just like
/// replacing does, otherwise derived state silently desynchronizes.
#[test]
fn list_insert_invalidates_like_set() {
    let graph = Graph::new();
    let list = graph.list(vec![10, 20]);
    let head = list.at(0);
    let total = list.map(|items| items.iter().sum::<i32>());
    assert_eq!(head.value().unwrap(), Some(10));
    assert_eq!(total.value().unwrap(), 30);

    list.insert_at(0, 5).unwrap();
    assert!(head.is_dirty());
    assert!(total.is_dirty());
    assert_eq!(head.value().unwrap(), Some(5));
    assert_eq!(total.value().unwrap(), 35);
}

/// A failing derivation is retried on the next read rather than cached.
#[test]
fn derivation_error_is_retried() {
    let graph = Graph::new();
    let (calls, calls_clone) = counter();
    let divisor = graph.state(2);
    let quotient = divisor.try_map(move |d| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        if *d == 0 {
            Err("division by zero")
        } else {
            Ok(100 / d)
        }
    });
    let shown = quotient.map(|q| q.to_string());

    assert_eq!(shown.value().unwrap(), "50");

    divisor.set(0);
    let err = shown.value().unwrap_err();
    assert!(matches!(err, GraphError::Derivation { node, .. } if node == quotient.id()));
    assert!(shown.value().is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    divisor.set(4);
    assert_eq!(shown.value().unwrap(), "25");
}

/// Lazily created nodes never run their function unless read.
#[test]
fn unread_nodes_never_compute() {
    let graph = Graph::new();
    let (calls, calls_clone) = counter();
    let root = graph.state(1);
    let _unused = root.map(move |x| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        x + 1
    });

    root.set(2);
    root.set(3);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// Dispose leaves first, then their sources.
#[test]
fn disposal_unwinds_a_chain() {
    let graph = Graph::new();
    let root = graph.state(1);
    let a = root.map(|x| x + 1);
    let b = a.map(|x| x + 1);
    assert_eq!(graph.node_count(), 3);

    assert!(matches!(
        a.clone().dispose(),
        Err(GraphError::HasDependents { .. })
    ));
    b.dispose().unwrap();
    a.dispose().unwrap();
    root.dispose().unwrap();
    assert_eq!(graph.node_count(), 0);
}

/// Snapshots expose the topology and dirty flags.
#[test]
fn snapshot_reflects_dirty_state() {
    let graph = Graph::with_config(GraphConfig::new().label("counter"));
    let count = graph.state(0);
    let text = count.map(|x| x.to_string());

    let before = graph.snapshot();
    assert_eq!(before.dirty_count(), 1);
    assert_eq!(before.node(text.id()).unwrap().kind, NodeKind::Map);

    text.value().unwrap();
    assert_eq!(graph.snapshot().dirty_count(), 0);

    count.set(1);
    let json = graph.snapshot().to_json().unwrap();
    assert!(json.contains("\"label\": \"counter\""));
    assert!(json.contains("\"dirty\": true"));
}

/// Maybe-reactive inputs lift uniformly.
#[test]
fn flat_wrap_mixed_inputs() {
    let graph = Graph::new();
    let dynamic = graph.state("Hello".to_string());
    let inputs = vec![
        MaybeState::from(dynamic.clone()),
        MaybeState::Raw("world".to_string()),
    ];
    assert!(inputs[0].is_reactive());
    assert!(!inputs[1].is_reactive());

    let nodes: Vec<State<String>> = inputs
        .into_iter()
        .map(|input| graph.flat_wrap(input))
        .collect::<Result<_, _>>()
        .unwrap();
    let greeting = graph.combine(&nodes, |parts| {
        parts.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
    })
    .unwrap();

    assert_eq!(greeting.value().unwrap(), "Hello, world");
    dynamic.set("Goodbye".to_string());
    assert_eq!(greeting.value().unwrap(), "Goodbye, world");
}
