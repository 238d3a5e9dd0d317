//! Shared source positions and error types.
//!
//! This crate is the leaf of the workspace: every other component reports
//! failures through the enums defined here.
//!
//! # Overview
//!
//! - [`SourcePosition`] - Line/column/offset of a character in the script
//! - [`LexError`], [`ParseError`], [`CompileError`], [`ExecutionError`],
//!   [`ModuleError`] - One error enum per pipeline stage
//! - [`ArgumentError`] - Typed builtin contract violation
//! - [`ScriptError`] - Umbrella error for the whole pipeline
//! - [`stack::ensure_sufficient_stack`] - Stack growth for recursive passes
//!
//! # Examples
//!
//! ```
//! use core_types::{ExecutionError, ScriptError};
//!
//! let err: ScriptError = ExecutionError::UndefinedIdentifier {
//!     name: "x".to_string(),
//! }
//! .into();
//! assert_eq!(err.to_string(), "execution error: x is not defined");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;
pub mod stack;

pub use error::{
    ArgumentError, CompileError, ExecutionError, LexError, ModuleError, ParseError, ScriptError,
};
pub use source::SourcePosition;
