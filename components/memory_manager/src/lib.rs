//! Memory Manager - slot arena and garbage collector
//!
//! This component provides:
//! - [`Heap`]: an arena of indexed slots with per-slot generation counters
//! - [`GcHandle`]: a generation-checked reference into the arena
//! - [`Trace`]: the hook container objects use to expose their children
//! - Manual mark-and-sweep collection via [`Heap::collect`]
//!
//! Collection never runs on its own; the embedder decides when a point in
//! execution has no unrooted intermediate values and calls `collect` with
//! the roots it knows about.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod gc;
pub mod heap;

pub use gc::Trace;
pub use heap::{GcHandle, GcStats, Heap};
