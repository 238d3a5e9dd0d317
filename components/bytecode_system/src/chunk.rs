//! Bytecode chunk - compiled bytecode container
//!
//! Contains the flat instruction array and the constant pool. Variables are
//! addressed by name, not by slot.

use crate::opcode::Opcode;
use crate::value::Value;
use core_types::CompileError;
use std::fmt;

/// A compiled program
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BytecodeChunk {
    /// Sequence of bytecode instructions
    pub instructions: Vec<Opcode>,
    /// Constant pool for literal values
    pub constants: Vec<Value>,
}

impl BytecodeChunk {
    /// Create a new empty bytecode chunk
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an instruction and return its index
    pub fn emit(&mut self, opcode: Opcode) -> usize {
        self.instructions.push(opcode);
        self.instructions.len() - 1
    }

    /// Add a constant to the constant pool and return its index
    pub fn add_constant(&mut self, value: Value) -> usize {
        if let Some(idx) = self.constants.iter().position(|c| *c == value) {
            return idx;
        }
        self.constants.push(value);
        self.constants.len() - 1
    }

    /// Get the number of instructions
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Rewrite the target of the jump at `index`; false if it is not a jump
    pub fn patch_jump(&mut self, index: usize, target: usize) -> bool {
        match self.instructions.get_mut(index) {
            Some(Opcode::Jump(addr)) | Some(Opcode::JumpIfFalse(addr)) => {
                *addr = target;
                true
            }
            _ => false,
        }
    }

    /// Check that every jump lands inside the instruction array and every
    /// `LoadConst` names a pooled constant
    pub fn validate(&self) -> Result<(), CompileError> {
        let len = self.instructions.len();
        for (index, opcode) in self.instructions.iter().enumerate() {
            if let Some(target) = opcode.jump_target() {
                if target >= len {
                    return Err(CompileError::InvalidJumpTarget { index, target, len });
                }
            }
            if let Opcode::LoadConst(constant) = opcode {
                if *constant >= self.constants.len() {
                    return Err(CompileError::InvalidConstant {
                        index,
                        constant: *constant,
                        len: self.constants.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for BytecodeChunk {
    /// Human readable listing, one instruction per line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, constant) in self.constants.iter().enumerate() {
            writeln!(f, "const {:>4}  {:?}", idx, constant)?;
        }
        for (idx, opcode) in self.instructions.iter().enumerate() {
            writeln!(f, "{:>10}  {}", idx, opcode)?;
        }
        Ok(())
    }
}
