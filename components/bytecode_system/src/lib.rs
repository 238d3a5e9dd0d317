//! Bytecode system for the stack machine backend
//!
//! This crate provides the instruction set and the chunk container that the
//! bytecode generator fills and the VM executes.
//!
//! # Features
//!
//! - Stack-based instruction set with absolute jump targets
//! - Name-indexed variables, constant pool with deduplication
//! - Jump target validation before execution
//!
//! # Example
//!
//! ```
//! use bytecode_system::{BytecodeChunk, Opcode, Value};
//!
//! let mut chunk = BytecodeChunk::new();
//!
//! let idx = chunk.add_constant(Value::Number(42.0));
//! chunk.emit(Opcode::LoadConst(idx));
//! chunk.emit(Opcode::StoreVar("x".to_string()));
//! chunk.emit(Opcode::Halt);
//!
//! assert!(chunk.validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod opcode;
pub mod value;

// Re-export main types at crate root
pub use chunk::BytecodeChunk;
pub use opcode::Opcode;
pub use value::{format_number, Value};
