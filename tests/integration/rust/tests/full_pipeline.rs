//! Full Pipeline Integration Tests
//!
//! Tests the complete flow on both backends:
//! Source -> Parser -> AST -> Interpreter, and
//! Source -> Parser -> AST -> BytecodeGenerator -> Bytecode -> VM.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use bytecode_system::Value as BytecodeValue;
use core_types::{ArgumentError, ExecutionError, ScriptError};
use interpreter::{Interpreter, Value, Vm};
use parser::{parse_program, BytecodeGenerator};
use pretty_assertions::assert_eq;

/// Run source on the bytecode backend
fn execute_bytecode(vm: &mut Vm, source: &str) -> Result<BytecodeValue, String> {
    let ast = parse_program(source).map_err(|e| format!("Parse error: {}", e))?;
    let chunk = BytecodeGenerator::new()
        .generate(&ast)
        .map_err(|e| format!("Bytecode generation error: {}", e))?;
    vm.run(&chunk).map_err(|e| format!("Execution error: {}", e))
}

#[test]
fn test_declaration_on_both_backends() {
    let mut interp = Interpreter::new();
    interp.eval("let x = 1 + 2;").unwrap();
    assert_eq!(interp.global("x"), Some(Value::Number(3.0)));

    let mut vm = Vm::new();
    execute_bytecode(&mut vm, "let x = 1 + 2;").unwrap();
    assert_eq!(vm.variable("x"), Some(&BytecodeValue::Number(3.0)));
}

#[test]
fn test_function_call_tree_backend() {
    let mut interp = Interpreter::new();
    let result = interp
        .eval("function add(a, b) { return a + b; } add(2, 3);")
        .unwrap();
    assert_eq!(result, Value::Number(5.0));
}

#[test]
fn test_if_scenario_on_both_backends() {
    let source = "let x = 10; if (x > 5) { let y = 20; } else { let y = 30; }";

    let mut interp = Interpreter::new();
    interp.eval(source).unwrap();
    assert_eq!(interp.global("y"), Some(Value::Number(20.0)));

    let mut vm = Vm::new();
    execute_bytecode(&mut vm, source).unwrap();
    assert_eq!(vm.variable("y"), Some(&BytecodeValue::Number(20.0)));
}

#[test]
fn test_loops_agree_across_backends() {
    let source = "let total = 0; for (let i = 1; i <= 4; i += 1) { total += i; } total;";

    let tree = Interpreter::new().eval(source).unwrap();
    assert_eq!(tree, Value::Number(10.0));

    let bytecode = execute_bytecode(&mut Vm::new(), source).unwrap();
    assert_eq!(bytecode, BytecodeValue::Number(10.0));
}

/// A trailing `if` or loop yields its last block value on the tree backend
/// but `undefined` on the VM, which keeps only a top-level expression value.
#[test]
fn test_trailing_control_flow_result_differs_by_backend() {
    for (source, tree_result) in [
        ("let i = 0; while (i < 2) { i = i + 1; }", Value::Number(2.0)),
        ("let x = 10; if (x > 5) { x + 1; }", Value::Number(11.0)),
    ] {
        let mut interp = Interpreter::new();
        assert_eq!(interp.eval(source).unwrap(), tree_result);

        let mut vm = Vm::new();
        assert_eq!(
            execute_bytecode(&mut vm, source).unwrap(),
            BytecodeValue::Undefined
        );
    }

    let source = "let x = 10; if (x > 5) { x = 1; } x;";
    assert_eq!(Interpreter::new().eval(source).unwrap(), Value::Number(1.0));
    assert_eq!(
        execute_bytecode(&mut Vm::new(), source).unwrap(),
        BytecodeValue::Number(1.0)
    );
}

#[test]
fn test_math_builtins_agree_across_backends() {
    let source = "Math.pow(2, 10) - Math.sqrt(16);";
    assert_eq!(Interpreter::new().eval(source).unwrap(), Value::Number(1020.0));
    assert_eq!(
        execute_bytecode(&mut Vm::new(), source).unwrap(),
        BytecodeValue::Number(1020.0)
    );
}

#[test]
fn test_argument_error_leaves_environment_unmodified() {
    let mut interp = Interpreter::new();
    interp.eval("let x = 5;").unwrap();
    let live = interp.live_objects();

    match interp.eval("Array.push(x, 1);") {
        Err(ScriptError::Execution(ExecutionError::Argument(err))) => assert_eq!(
            err,
            ArgumentError::new("Array.push", "argument 1 must be an array, got number")
        ),
        other => panic!("expected an argument error, got {:?}", other),
    }
    assert_eq!(interp.global("x"), Some(Value::Number(5.0)));
    assert_eq!(interp.live_objects(), live);
}

#[test]
fn test_undefined_identifier_on_both_backends() {
    let err = Interpreter::new().eval("missing + 1;").unwrap_err();
    assert!(matches!(
        err,
        ScriptError::Execution(ExecutionError::UndefinedIdentifier { .. })
    ));

    let err = execute_bytecode(&mut Vm::new(), "missing + 1;").unwrap_err();
    assert!(err.starts_with("Execution error:"), "{}", err);
}

#[test]
fn test_infinite_loop_bounded_on_bytecode_backend() {
    let mut vm = Vm::new().with_step_limit(10_000);
    let ast = parse_program("let i = 0; while (true) { i = i + 1; }").unwrap();
    let chunk = BytecodeGenerator::new().generate(&ast).unwrap();
    assert_eq!(
        vm.run(&chunk),
        Err(ExecutionError::StepLimitExceeded { limit: 10_000 })
    );
}

/// The tree backend has no step bound: a non-terminating program keeps its
/// thread busy. The caller observes that through a timeout and moves on;
/// the worker is detached and ends with the test process.
#[test]
fn test_infinite_loop_does_not_block_caller_on_tree_backend() {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let outcome = Interpreter::new().eval("while (true) { }").is_ok();
        let _ = tx.send(outcome);
    });

    assert_eq!(
        rx.recv_timeout(Duration::from_millis(200)),
        Err(mpsc::RecvTimeoutError::Timeout)
    );
}
