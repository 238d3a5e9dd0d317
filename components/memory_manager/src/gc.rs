//! Mark-and-sweep collection over the slot arena.
//!
//! Marking is a depth-first walk from the root handles using an explicit
//! work stack. Container objects report their children through [`Trace`],
//! so arrays and records holding handles keep their elements alive.
//! Sweeping frees every unmarked slot, bumps its generation and pushes the
//! index onto the free list.

use crate::heap::{GcHandle, GcStats, Heap};

/// Objects that may hold handles to other heap objects.
pub trait Trace {
    /// Call `visit` once for every handle directly held by `self`
    fn trace(&self, visit: &mut dyn FnMut(GcHandle));
}

impl<T: Trace> Heap<T> {
    /// Run a full collection from the given roots.
    ///
    /// Stale root handles are ignored. With no allocation in between, a
    /// second call frees nothing.
    pub fn collect<I>(&mut self, roots: I) -> GcStats
    where
        I: IntoIterator<Item = GcHandle>,
    {
        let marked = self.mark(roots);
        let freed = self.sweep();
        self.collections += 1;

        let stats = GcStats {
            marked,
            freed,
            live: self.live_count(),
        };
        tracing::debug!(
            marked = stats.marked,
            freed = stats.freed,
            live = stats.live,
            "garbage collection finished"
        );
        stats
    }

    fn mark<I>(&mut self, roots: I) -> usize
    where
        I: IntoIterator<Item = GcHandle>,
    {
        let mut work: Vec<GcHandle> = roots.into_iter().collect();
        let mut marked = 0;

        while let Some(handle) = work.pop() {
            let Some(slot) = self.slots.get_mut(handle.index()) else {
                continue;
            };
            if slot.generation != handle.generation() || slot.marked {
                continue;
            }
            let Some(value) = slot.value.as_ref() else {
                continue;
            };
            slot.marked = true;
            marked += 1;
            value.trace(&mut |child| work.push(child));
        }

        marked
    }

    fn sweep(&mut self) -> usize {
        let mut freed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.is_none() {
                continue;
            }
            if slot.marked {
                slot.marked = false;
                continue;
            }
            slot.value = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(index);
            freed += 1;
        }
        freed
    }
}
