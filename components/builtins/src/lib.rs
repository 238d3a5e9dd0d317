//! Host operations for the builtin namespaces
//!
//! This crate provides the typed operations behind the four namespaces
//! exposed to scripts:
//! - `Math`: numeric functions
//! - `Array`: push, pop, map over element vectors
//! - `String`: slicing, replacement, case mapping
//! - `Date`: the wall clock
//!
//! Argument checking and conversion from script values happen in the
//! interpreter; everything here works on plain Rust types.
//!
//! # Example
//!
//! ```
//! use builtins::{MathObject, StringPrototype};
//!
//! assert_eq!(MathObject::sqrt(16.0), 4.0);
//! assert_eq!(StringPrototype::slice("apple", 1.0, Some(3.0)), "pp");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod date;
pub mod math;
pub mod string;

// Re-export main types for convenience
pub use array::ArrayPrototype;
pub use date::DateObject;
pub use math::MathObject;
pub use string::StringPrototype;
