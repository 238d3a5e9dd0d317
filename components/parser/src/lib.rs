//! Script Parser Component
//!
//! Provides the lexer, recursive descent parser, AST and bytecode generation
//! for the scripting language.
//!
//! # Overview
//!
//! - [`Lexer`] - Tokenizes source code lazily, one token of lookahead
//! - [`Token`] - Token types including identifiers, literals, keywords
//! - [`Parser`] - Recursive descent parser producing a [`Program`]
//! - [`Statement`], [`Expression`] - Closed AST node types
//! - [`BytecodeGenerator`] - Lowers a program to stack machine bytecode
//!
//! # Example
//!
//! ```
//! use parser::{BytecodeGenerator, Parser};
//!
//! let source = "let x = 42;";
//! let mut parser = Parser::new(source);
//! let program = parser.parse().unwrap();
//!
//! let mut gen = BytecodeGenerator::new();
//! let bytecode = gen.generate(&program).unwrap();
//! assert!(bytecode.validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod bytecode_gen;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{
    AssignmentOperator, BinaryOperator, Callee, Expression, FunctionDeclaration, Literal,
    Program, Property, Statement, VariableKind,
};
pub use bytecode_gen::BytecodeGenerator;
pub use lexer::{tokenize, Keyword, Lexer, Punctuator, Token};
pub use parser::{parse_program, Parser, MAX_NESTING_DEPTH};
