//! Error taxonomy for every stage of the runtime.
//!
//! Each stage has its own enum so callers can match on the precise failure;
//! [`ScriptError`] unifies them for hosts that run the whole pipeline.
//! All stages fail fast: the first error aborts the current evaluation unit.

use std::path::PathBuf;

use thiserror::Error;

use crate::SourcePosition;

/// Failure while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A quoted string reached end of input before its closing quote
    #[error("unterminated string literal starting at {position}")]
    UnterminatedString {
        /// Position of the opening quote
        position: SourcePosition,
    },
    /// A `/*` comment reached end of input before `*/`
    #[error("unterminated block comment starting at {position}")]
    UnterminatedComment {
        /// Position of the opening `/*`
        position: SourcePosition,
    },
    /// Back-tick template text reached end of input before its closing back-tick
    #[error("unterminated template literal starting at {position}")]
    UnterminatedTemplate {
        /// Position where the template text segment began
        position: SourcePosition,
    },
    /// A character that starts no token
    #[error("unexpected character '{character}' at {position}")]
    UnexpectedCharacter {
        /// The offending character
        character: char,
        /// Where it was found
        position: SourcePosition,
    },
}

/// Failure while building the AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The next token is not the one the grammar requires
    #[error("expected {expected}, got {actual} at {position}")]
    UnexpectedToken {
        /// Human readable description of what the grammar wanted
        expected: String,
        /// Description of the token actually found
        actual: String,
        /// Start of the offending token
        position: SourcePosition,
    },
    /// Parentheses, brackets or templates nested past the parser's bound
    #[error("expressions nested deeper than {limit} levels at {position}")]
    NestingTooDeep {
        /// The nesting bound
        limit: usize,
        /// Start of the token that went past it
        position: SourcePosition,
    },
    /// The lexer failed while the parser was pulling tokens
    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Failure while lowering an AST to bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The node kind has no bytecode lowering
    #[error("{kind} cannot be compiled to bytecode")]
    UnsupportedNode {
        /// AST node kind name
        kind: &'static str,
    },
    /// A jump operand points outside the instruction array
    #[error("instruction {index} jumps to {target}, outside 0..{len}")]
    InvalidJumpTarget {
        /// Index of the jump instruction
        index: usize,
        /// Its target
        target: usize,
        /// Number of instructions in the chunk
        len: usize,
    },
    /// A `LoadConst` operand points outside the constant pool
    #[error("instruction {index} loads constant {constant}, outside 0..{len}")]
    InvalidConstant {
        /// Index of the load instruction
        index: usize,
        /// Its constant index
        constant: usize,
        /// Size of the constant pool
        len: usize,
    },
}

/// A builtin was called with arguments that violate its contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{function}: {message}")]
pub struct ArgumentError {
    /// Qualified builtin name, e.g. `Array.push`
    pub function: String,
    /// What was wrong with the arguments
    pub message: String,
}

impl ArgumentError {
    /// Create an argument error for the named builtin
    pub fn new(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            message: message.into(),
        }
    }
}

/// Failure while evaluating a program on either backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// An operator symbol outside the supported set
    #[error("unknown operator '{operator}'")]
    UnknownOperator {
        /// The operator text
        operator: String,
    },
    /// A name that is bound in no environment of the chain
    #[error("{name} is not defined")]
    UndefinedIdentifier {
        /// The unresolved name
        name: String,
    },
    /// A call to a name that is not bound
    #[error("function {name} is not defined")]
    FunctionNotFound {
        /// The callee name
        name: String,
    },
    /// A call to a name bound to something other than a function
    #[error("{name} is not a function")]
    NotCallable {
        /// The callee name
        name: String,
    },
    /// `Namespace.operation` where the namespace has no such operation
    #[error("{namespace}.{operation} is not a builtin operation")]
    UnknownBuiltin {
        /// Namespace name
        namespace: String,
        /// Requested operation
        operation: String,
    },
    /// Operand types the operator does not accept
    #[error("cannot apply '{operator}' to {left} and {right}")]
    TypeMismatch {
        /// Operator symbol
        operator: String,
        /// Type name of the left operand
        left: &'static str,
        /// Type name of the right operand
        right: &'static str,
    },
    /// Property read on a value that has no properties
    #[error("cannot read property '{property}' of a non-object")]
    NotAnObject {
        /// Property name
        property: String,
    },
    /// A builtin rejected its arguments
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    /// A bytecode call site passed the wrong number of arguments
    #[error("{name} expects {expected} arguments, got {found}")]
    ArityMismatch {
        /// Callee name
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Arguments at the call site
        found: usize,
    },
    /// The VM popped from an empty operand stack
    #[error("operand stack underflow at instruction {pc}")]
    StackUnderflow {
        /// Program counter of the failing instruction
        pc: usize,
    },
    /// The VM dispatched more instructions than its configured bound
    #[error("step limit of {limit} instructions exceeded")]
    StepLimitExceeded {
        /// The configured bound
        limit: u64,
    },
    /// Script function calls nested past the executor's bound
    #[error("maximum call depth of {limit} exceeded")]
    CallDepthExceeded {
        /// The depth bound
        limit: usize,
    },
    /// The VM was handed a chunk that fails validation
    #[error("invalid bytecode: {0}")]
    InvalidBytecode(#[from] CompileError),
}

/// Failure while loading a script module from disk.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// The path does not exist
    #[error("module not found: {}", path.display())]
    NotFound {
        /// Requested path
        path: PathBuf,
    },
    /// The path exists but could not be read
    #[error("cannot read module {}: {source}", path.display())]
    Io {
        /// Requested path
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },
    /// The module text failed to lex, parse or run
    #[error("module {} failed: {source}", path.display())]
    Script {
        /// Module path
        path: PathBuf,
        /// The pipeline failure
        source: Box<ScriptError>,
    },
}

/// Any failure of the lex, parse, compile, execute pipeline.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Lexing failed
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    /// Parsing failed
    #[error("parse error: {0}")]
    Parse(ParseError),
    /// Bytecode generation failed
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
    /// Evaluation failed
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),
    /// Module loading failed
    #[error(transparent)]
    Module(#[from] ModuleError),
}

impl From<ParseError> for ScriptError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(lex) => ScriptError::Lex(lex),
            other => ScriptError::Parse(other),
        }
    }
}

impl From<ArgumentError> for ScriptError {
    fn from(err: ArgumentError) -> Self {
        ScriptError::Execution(ExecutionError::Argument(err))
    }
}
