//! Stack growth for the recursive passes.
//!
//! The parser, the bytecode generator and the tree-walking executor recurse
//! once per nested expression or script call. Wrapping those recursion
//! points in [`ensure_sufficient_stack`] moves the work onto a fresh stack
//! segment when the current one runs low, so the depth bounds those passes
//! enforce are reported as errors instead of overflowing the host thread.

/// Remaining stack below which a new segment is allocated (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
