//! Execution backends for the scripting language
//!
//! This crate provides two independent ways to run a parsed program:
//! - [`Interpreter`] / [`Executor`]: a tree-walking evaluator over the AST,
//!   with lexical [`Environment`]s whose bindings live on a
//!   garbage-collected heap, and builtin namespaces supplied through an
//!   immutable [`BuiltinTable`]
//! - [`Vm`]: a stack machine for the bytecode subset produced by
//!   [`parser::BytecodeGenerator`]
//!
//! # Example
//!
//! ```
//! use interpreter::{Interpreter, Value};
//!
//! let mut interp = Interpreter::new();
//! interp.eval("let x = 1 + 2;").unwrap();
//! assert_eq!(interp.global("x"), Some(Value::Number(3.0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod environment;
pub mod executor;
pub mod native;
pub mod value;
pub mod vm;

// Re-export main types at crate root
pub use context::CallContext;
pub use environment::Environment;
pub use executor::{Executor, Interpreter, MAX_CALL_DEPTH};
pub use native::{BuiltinTable, NativeFunction};
pub use value::{HeapObject, Value};
pub use vm::Vm;
