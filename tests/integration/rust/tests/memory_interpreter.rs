//! Memory Manager to Interpreter Integration Tests
//!
//! Tests that the interpreter's heap and the mark-and-sweep collector agree
//! on what is reachable from the global environment.

use interpreter::{Interpreter, Value};
use memory_manager::GcStats;
use pretty_assertions::assert_eq;

/// Test: collecting twice in a row frees nothing the second time
#[test]
fn test_collection_is_idempotent() {
    let mut interp = Interpreter::new();
    interp
        .eval("let a = [1, 2]; let o = { list: a, name: 'n' }; [3, 4];")
        .unwrap();

    let first = interp.collect_garbage();
    assert_eq!(first.freed, 1);

    let second = interp.collect_garbage();
    assert_eq!(
        second,
        GcStats {
            marked: first.live,
            freed: 0,
            live: first.live,
        }
    );
}

/// Test: values reachable through containers survive collection
#[test]
fn test_nested_values_survive() {
    let mut interp = Interpreter::new();
    interp
        .eval("let inner = [1, 2, 3]; let outer = { items: inner }; inner = 0;")
        .unwrap();
    interp.collect_garbage();

    let items = interp.eval("outer.items;").unwrap();
    assert_eq!(interp.display(&items), "[1, 2, 3]");
}

/// Test: rebinding a global releases the old value
#[test]
fn test_rebinding_releases_old_value() {
    let mut interp = Interpreter::new();
    interp.eval("let data = [1, 2, 3];").unwrap();
    interp.collect_garbage();
    let before = interp.live_objects();

    interp.eval("data = 0;").unwrap();
    let stats = interp.collect_garbage();
    assert_eq!(stats.freed, 1);
    assert_eq!(interp.live_objects(), before - 1);
}

/// Test: a self-referencing structure is freed once unreachable
#[test]
fn test_cycle_is_collected() {
    let mut interp = Interpreter::new();
    interp.eval("let a = []; Array.push(a, a);").unwrap();
    interp.collect_garbage();
    let before = interp.live_objects();

    let a = interp.global("a").unwrap();
    assert_eq!(interp.display(&a), "[[Circular]]");

    interp.eval("a = 1;").unwrap();
    interp.collect_garbage();
    assert_eq!(interp.live_objects(), before - 1);
}

/// Test: temporaries created by Array.map are garbage after the run
#[test]
fn test_map_temporaries_are_collected() {
    let mut interp = Interpreter::new();
    interp
        .eval("function double(x) { return x * 2; } let xs = [1, 2];")
        .unwrap();
    interp.collect_garbage();
    let before = interp.live_objects();

    let doubled = interp.eval("Array.map(xs, double);").unwrap();
    assert_eq!(
        interp.elements(&doubled),
        Some(&[Value::Number(2.0), Value::Number(4.0)][..])
    );

    interp.collect_garbage();
    assert_eq!(interp.live_objects(), before);
}
