//! Contract tests for the bytecode_system public API

use bytecode_system::{format_number, BytecodeChunk, Opcode, Value};
use core_types::CompileError;

/// Contract: arithmetic and comparison opcodes carry no operand
#[test]
fn contract_operand_free_opcodes() {
    for opcode in [
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Equal,
        Opcode::NotEqual,
        Opcode::Less,
        Opcode::Greater,
        Opcode::LessEqual,
        Opcode::GreaterEqual,
        Opcode::Dup,
        Opcode::Pop,
        Opcode::Halt,
    ] {
        assert_eq!(opcode.jump_target(), None);
    }
}

/// Contract: validate reports the first offending jump
#[test]
fn contract_validate_reports_first_bad_jump() {
    let chunk = BytecodeChunk {
        instructions: vec![Opcode::Jump(1), Opcode::JumpIfFalse(9), Opcode::Jump(7)],
        constants: vec![],
    };
    assert_eq!(
        chunk.validate(),
        Err(CompileError::InvalidJumpTarget {
            index: 1,
            target: 9,
            len: 3
        })
    );
}

/// Contract: validate rejects a LoadConst past the constant pool
#[test]
fn contract_validate_rejects_missing_constant() {
    let chunk = BytecodeChunk {
        instructions: vec![Opcode::LoadConst(0), Opcode::LoadConst(1), Opcode::Halt],
        constants: vec![Value::Number(1.0)],
    };
    assert_eq!(
        chunk.validate(),
        Err(CompileError::InvalidConstant {
            index: 1,
            constant: 1,
            len: 1
        })
    );
}

/// Contract: numbers print without a trailing fraction when integral
#[test]
fn contract_number_formatting() {
    assert_eq!(format_number(5.0), "5");
    assert_eq!(format_number(-0.5), "-0.5");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(Value::String("hi".to_string()).to_string(), "hi");
}
