//! Contract tests verifying the memory_manager API.

use memory_manager::{GcHandle, GcStats, Heap, Trace};
use proptest::prelude::*;

struct Value {
    refs: Vec<GcHandle>,
}

impl Trace for Value {
    fn trace(&self, visit: &mut dyn FnMut(GcHandle)) {
        self.refs.iter().copied().for_each(visit);
    }
}

/// Heap contract: new heap is empty
#[test]
fn contract_heap_new() {
    let heap: Heap<Value> = Heap::new();
    assert_eq!(heap.live_count(), 0);
    assert_eq!(heap.capacity(), 0);
    assert_eq!(heap.collections(), 0);
}

/// Heap contract: collecting with no roots frees everything
#[test]
fn contract_collect_without_roots() {
    let mut heap = Heap::new();
    for _ in 0..5 {
        heap.allocate(Value { refs: vec![] });
    }
    let stats = heap.collect(std::iter::empty());
    assert_eq!(stats, GcStats { marked: 0, freed: 5, live: 0 });
}

/// Heap contract: freed slots are reused before the arena grows
#[test]
fn contract_free_list_reuse() {
    let mut heap = Heap::new();
    for _ in 0..3 {
        heap.allocate(Value { refs: vec![] });
    }
    heap.collect([]);
    for _ in 0..3 {
        heap.allocate(Value { refs: vec![] });
    }
    assert_eq!(heap.capacity(), 3);
    assert_eq!(heap.live_count(), 3);
}

proptest! {
    /// Everything reachable from the root survives; a second run frees nothing.
    #[test]
    fn contract_reachable_set_survives(chain in 1usize..20, garbage in 0usize..20) {
        let mut heap = Heap::new();
        let mut previous: Option<GcHandle> = None;
        for _ in 0..chain {
            let refs = previous.into_iter().collect();
            previous = Some(heap.allocate(Value { refs }));
        }
        for _ in 0..garbage {
            heap.allocate(Value { refs: vec![] });
        }

        let root = previous.into_iter();
        let first = heap.collect(root.clone());
        prop_assert_eq!(first.marked, chain);
        prop_assert_eq!(first.freed, garbage);

        let second = heap.collect(root);
        prop_assert_eq!(second.freed, 0);
        prop_assert_eq!(second.live, chain);
    }
}
