//! Bytecode opcodes for the stack machine
//!
//! Jump operands are absolute instruction indices.

use std::fmt;

/// Bytecode opcodes
#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    // Literals and variables
    /// Push the constant at the given pool index
    LoadConst(usize),
    /// Push the value of a named variable
    LoadVar(String),
    /// Pop a value and store it under a name
    StoreVar(String),

    // Arithmetic operations, each pops `b` then `a` and pushes the result
    /// a + b
    Add,
    /// a - b
    Sub,
    /// a * b
    Mul,
    /// a / b
    Div,

    // Comparison operations
    /// a == b
    Equal,
    /// a != b
    NotEqual,
    /// a < b
    Less,
    /// a > b
    Greater,
    /// a <= b
    LessEqual,
    /// a >= b
    GreaterEqual,

    // Stack manipulation
    /// Duplicate the top of stack
    Dup,
    /// Discard the top of stack
    Pop,

    // Calls
    /// Pop `argc` arguments, call the named host function, push its result
    CallFunction {
        /// Function name as written at the call site
        name: String,
        /// Number of arguments at the call site
        argc: usize,
    },

    // Control flow
    /// Unconditional jump
    Jump(usize),
    /// Pop a value and jump if it is falsy
    JumpIfFalse(usize),
    /// Stop execution
    Halt,
}

impl Opcode {
    /// Target of a jump instruction
    pub fn jump_target(&self) -> Option<usize> {
        match self {
            Opcode::Jump(target) | Opcode::JumpIfFalse(target) => Some(*target),
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::LoadConst(idx) => write!(f, "LOAD_CONST {}", idx),
            Opcode::LoadVar(name) => write!(f, "LOAD_VAR {}", name),
            Opcode::StoreVar(name) => write!(f, "STORE_VAR {}", name),
            Opcode::Add => write!(f, "ADD"),
            Opcode::Sub => write!(f, "SUB"),
            Opcode::Mul => write!(f, "MUL"),
            Opcode::Div => write!(f, "DIV"),
            Opcode::Equal => write!(f, "EQUAL"),
            Opcode::NotEqual => write!(f, "NOT_EQUAL"),
            Opcode::Less => write!(f, "LESS"),
            Opcode::Greater => write!(f, "GREATER"),
            Opcode::LessEqual => write!(f, "LESS_EQUAL"),
            Opcode::GreaterEqual => write!(f, "GREATER_EQUAL"),
            Opcode::Dup => write!(f, "DUP"),
            Opcode::Pop => write!(f, "POP"),
            Opcode::CallFunction { name, argc } => write!(f, "CALL_FUNCTION {} {}", name, argc),
            Opcode::Jump(target) => write!(f, "JUMP {}", target),
            Opcode::JumpIfFalse(target) => write!(f, "JUMP_IF_FALSE {}", target),
            Opcode::Halt => write!(f, "HALT"),
        }
    }
}
