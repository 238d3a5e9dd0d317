//! Unit tests for interpreter components

use bytecode_system::Value as BcValue;
use core_types::{ExecutionError, ScriptError};
use interpreter::{BuiltinTable, Environment, HeapObject, Interpreter, Value, Vm};
use memory_manager::Heap;
use parser::{parse_program, BytecodeGenerator};
use pretty_assertions::assert_eq;

fn run_bytecode(source: &str) -> Result<(Vm, BcValue), ExecutionError> {
    let program = parse_program(source).unwrap();
    let chunk = BytecodeGenerator::new().generate(&program).unwrap();
    let mut vm = Vm::new().with_step_limit(10_000);
    let result = vm.run(&chunk)?;
    Ok((vm, result))
}

// ============================================================================
// Tree-walking executor
// ============================================================================

#[test]
fn test_let_binds_in_global_environment() {
    let mut interp = Interpreter::new();
    interp.eval("let x = 1 + 2;").unwrap();
    assert_eq!(interp.global("x"), Some(Value::Number(3.0)));
}

#[test]
fn test_if_body_binds_in_enclosing_environment() {
    let mut interp = Interpreter::new();
    interp
        .eval(r#"if (5 > 3) { let result = "Greater"; } else { let result = "Lesser"; }"#)
        .unwrap();
    assert_eq!(interp.global("result"), Some(Value::from("Greater")));
}

#[test]
fn test_for_loop_accumulates() {
    let mut interp = Interpreter::new();
    interp
        .eval("let total = 0; for (let i = 0; i < 5; i += 1) { total += i; }")
        .unwrap();
    assert_eq!(interp.global("total"), Some(Value::Number(10.0)));
    assert_eq!(interp.global("i"), Some(Value::Number(5.0)));
}

#[test]
fn test_program_value_is_last_statement() {
    let mut interp = Interpreter::new();
    assert_eq!(interp.eval("1; 2; 3;").unwrap(), Value::Number(3.0));
    assert_eq!(interp.eval("let unused = 4;").unwrap(), Value::Undefined);
}

#[test]
fn test_top_level_return_ends_program() {
    let mut interp = Interpreter::new();
    let result = interp.eval("return 7; let never = 1;").unwrap();
    assert_eq!(result, Value::Number(7.0));
    assert_eq!(interp.global("never"), None);
}

#[test]
fn test_template_literal() {
    let mut interp = Interpreter::new();
    let result = interp.eval("let n = 2; `n is ${n * 3}!`;").unwrap();
    assert_eq!(result, Value::from("n is 6!"));
}

#[test]
fn test_recursion() {
    let mut interp = Interpreter::new();
    let source = "function fact(n) { if (n <= 1) { return 1; } return n * fact(n - 1); } fact(5);";
    assert_eq!(interp.eval(source).unwrap(), Value::Number(120.0));
}

#[test]
fn test_state_persists_between_evals() {
    let mut interp = Interpreter::new();
    interp.eval("let n = 1;").unwrap();
    interp.eval("n += 41;").unwrap();
    assert_eq!(interp.eval("n;").unwrap(), Value::Number(42.0));
}

#[test]
fn test_failed_eval_keeps_earlier_bindings() {
    let mut interp = Interpreter::new();
    interp.eval("let keep = 1;").unwrap();
    assert!(interp.eval("let broken = nope;").is_err());
    assert_eq!(interp.global("keep"), Some(Value::Number(1.0)));
    assert_eq!(interp.global("broken"), None);
}

#[test]
fn test_undefined_identifier() {
    let mut interp = Interpreter::new();
    match interp.eval("y + 1;") {
        Err(ScriptError::Execution(ExecutionError::UndefinedIdentifier { name })) => {
            assert_eq!(name, "y")
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_assignment_to_undeclared_name_fails() {
    let mut interp = Interpreter::new();
    assert!(matches!(
        interp.eval("z = 1;"),
        Err(ScriptError::Execution(ExecutionError::UndefinedIdentifier { .. }))
    ));
}

#[test]
fn test_shadowed_namespace_is_not_a_builtin() {
    let mut interp = Interpreter::new();
    interp.eval("let Math = { pow: 1 };").unwrap();
    assert!(matches!(
        interp.eval("Math.pow(2, 2);"),
        Err(ScriptError::Execution(ExecutionError::NotCallable { .. }))
    ));
}

#[test]
fn test_custom_builtin_table() {
    let table = BuiltinTable::empty().with_function("Answer", "get", |_, _| Ok(Value::Number(42.0)));
    let mut interp = Interpreter::with_builtins(table);
    assert_eq!(interp.eval("Answer.get();").unwrap(), Value::Number(42.0));
    assert!(matches!(
        interp.eval("Math.abs(1);"),
        Err(ScriptError::Execution(ExecutionError::UndefinedIdentifier { .. }))
    ));
}

// ============================================================================
// Environment and collector
// ============================================================================

#[test]
fn test_gc_twice_is_idempotent() {
    let mut interp = Interpreter::new();
    interp.eval("let a = [1, 2]; let b = { k: a }; [3];").unwrap();
    let first = interp.collect_garbage();
    let second = interp.collect_garbage();
    assert_eq!(first.live, second.live);
    assert_eq!(second.freed, 0);
}

#[test]
fn test_gc_keeps_values_reachable_through_containers() {
    let mut interp = Interpreter::new();
    interp.eval("let outer = { inner: [[1]] };").unwrap();
    interp.collect_garbage();
    let value = interp.eval("outer.inner;").unwrap();
    assert_eq!(interp.display(&value), "[[1]]");
}

#[test]
fn test_gc_frees_rebound_values() {
    let mut interp = Interpreter::new();
    interp.eval("let a = [1]; let a = [2];").unwrap();
    let stats = interp.collect_garbage();
    // The first array and its binding cell
    assert_eq!(stats.freed, 2);
}

#[test]
fn test_environment_chain_roots() {
    let mut heap: Heap<HeapObject> = Heap::new();
    let mut global = Environment::new();
    global.define("g", Value::Number(1.0), &mut heap);
    let mut local = Environment::with_parent(&global);
    local.define("l", Value::Number(2.0), &mut heap);

    assert_eq!(local.roots().len(), 2);
    assert_eq!(local.run_gc(&mut heap).live, 2);
}

// ============================================================================
// Bytecode VM
// ============================================================================

#[test]
fn test_vm_round_trip_declaration() {
    let (vm, _) = run_bytecode("let x = 1 + 2;").unwrap();
    assert_eq!(vm.variable("x"), Some(&BcValue::Number(3.0)));
}

#[test]
fn test_vm_while_loop() {
    let (vm, _) = run_bytecode("let i = 0; let sum = 0; while (i < 4) { sum += i; i += 1; }").unwrap();
    assert_eq!(vm.variable("sum"), Some(&BcValue::Number(6.0)));
}

#[test]
fn test_vm_if_else() {
    let (vm, _) =
        run_bytecode(r#"if (5 > 3) { let result = "Greater"; } else { let result = "Lesser"; }"#)
            .unwrap();
    assert_eq!(vm.variable("result"), Some(&BcValue::String("Greater".to_string())));
}

#[test]
fn test_vm_final_expression_is_result() {
    let (_, result) = run_bytecode("let x = 2; Math.pow(x, 10);").unwrap();
    assert_eq!(result, BcValue::Number(1024.0));
}

#[test]
fn test_vm_subtraction_order() {
    let (_, result) = run_bytecode("10 - 3;").unwrap();
    assert_eq!(result, BcValue::Number(7.0));
}

#[test]
fn test_vm_infinite_loop_hits_step_limit() {
    let err = run_bytecode("while (true) { }").unwrap_err();
    assert_eq!(err, ExecutionError::StepLimitExceeded { limit: 10_000 });
}
