//! Contract tests for ArrayPrototype

use builtins::ArrayPrototype;

#[test]
fn test_push_appends_in_place() {
    let mut items = Vec::new();
    assert_eq!(ArrayPrototype::push(&mut items, "a"), 1);
    assert_eq!(ArrayPrototype::push(&mut items, "b"), 2);
    assert_eq!(items, vec!["a", "b"]);
}

#[test]
fn test_pop_from_empty() {
    let mut items: Vec<f64> = Vec::new();
    assert_eq!(ArrayPrototype::pop(&mut items), None);
}

#[test]
fn test_map_preserves_order() {
    let words = ["x", "yy", "zzz"];
    let lengths: Result<Vec<usize>, ()> = ArrayPrototype::map(&words, |w, _| Ok(w.len()));
    assert_eq!(lengths, Ok(vec![1, 2, 3]));
}

#[test]
fn test_map_empty() {
    let empty: [i32; 0] = [];
    let out: Result<Vec<i32>, ()> = ArrayPrototype::map(&empty, |v, _| Ok(*v));
    assert_eq!(out, Ok(vec![]));
}
