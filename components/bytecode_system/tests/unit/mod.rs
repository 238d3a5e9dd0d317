//! Unit tests for bytecode_system

use bytecode_system::{BytecodeChunk, Opcode, Value};

// ============================================================================
// Chunk Tests
// ============================================================================

#[test]
fn test_forward_jump_patched_to_halt_is_valid() {
    let mut chunk = BytecodeChunk::new();
    let cond = chunk.add_constant(Value::Boolean(false));
    chunk.emit(Opcode::LoadConst(cond));
    let jump = chunk.emit(Opcode::JumpIfFalse(0));
    chunk.emit(Opcode::Pop);
    let end = chunk.emit(Opcode::Halt);
    chunk.patch_jump(jump, end);

    assert_eq!(chunk.instructions[jump].jump_target(), Some(end));
    assert!(chunk.validate().is_ok());
}

#[test]
fn test_backward_jump_is_valid() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::LoadVar("x".to_string()));
    chunk.emit(Opcode::Pop);
    chunk.emit(Opcode::Jump(0));
    chunk.emit(Opcode::Halt);
    assert!(chunk.validate().is_ok());
}

#[test]
fn test_empty_chunk_is_valid() {
    assert!(BytecodeChunk::new().validate().is_ok());
}

// ============================================================================
// Value Tests
// ============================================================================

#[test]
fn test_value_type_names() {
    assert_eq!(Value::Undefined.type_name(), "undefined");
    assert_eq!(Value::Boolean(true).type_name(), "boolean");
    assert_eq!(Value::Number(1.0).type_name(), "number");
    assert_eq!(Value::String("s".to_string()).type_name(), "string");
}

#[test]
fn test_value_as_number() {
    assert_eq!(Value::Number(2.5).as_number(), Some(2.5));
    assert_eq!(Value::Boolean(true).as_number(), None);
}
