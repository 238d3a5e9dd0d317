//! Contract tests for interpreter API
//!
//! These tests pin the builtin argument contracts and the public surface of
//! the executor and the VM.

use core_types::{ArgumentError, ExecutionError, ScriptError};
use interpreter::{Interpreter, Value};

fn argument_error(interp: &mut Interpreter, source: &str) -> ArgumentError {
    match interp.eval(source) {
        Err(ScriptError::Execution(ExecutionError::Argument(err))) => err,
        other => panic!("expected argument error for {:?}, got {:?}", source, other),
    }
}

/// Array.push on a non-array fails and changes nothing
#[test]
fn test_array_push_requires_array() {
    let mut interp = Interpreter::new();
    interp.eval("let n = 5;").unwrap();
    let live = interp.live_objects();

    let err = argument_error(&mut interp, "Array.push(n, 1);");
    assert_eq!(err.function, "Array.push");
    assert_eq!(err.message, "argument 1 must be an array, got number");
    assert_eq!(interp.global("n"), Some(Value::Number(5.0)));
    assert_eq!(interp.live_objects(), live);
}

#[test]
fn test_array_push_mutates_and_returns_array() {
    let mut interp = Interpreter::new();
    interp.eval("let a = [1]; let same = Array.push(a, 2, 3);").unwrap();
    let a = interp.global("a").unwrap();
    assert_eq!(interp.global("same"), Some(a.clone()));
    assert_eq!(
        interp.elements(&a),
        Some(&[Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)][..])
    );
}

#[test]
fn test_array_pop_and_length() {
    let mut interp = Interpreter::new();
    assert_eq!(interp.eval("let a = [1, 2]; Array.pop(a);").unwrap(), Value::Number(2.0));
    assert_eq!(interp.eval("Array.length(a);").unwrap(), Value::Number(1.0));
    assert_eq!(interp.eval("Array.pop([]);").unwrap(), Value::Undefined);
    assert_eq!(interp.eval("a.length;").unwrap(), Value::Number(1.0));
}

#[test]
fn test_array_map_requires_function() {
    let mut interp = Interpreter::new();
    let err = argument_error(&mut interp, "Array.map([1], 2);");
    assert_eq!(err.message, "argument 2 must be a function, got number");
}

#[test]
fn test_array_map_propagates_callback_errors() {
    let mut interp = Interpreter::new();
    let result = interp.eval("function bad(x) { return x - 'a'; } Array.map([1], bad);");
    assert!(matches!(
        result,
        Err(ScriptError::Execution(ExecutionError::TypeMismatch { .. }))
    ));
}

#[test]
fn test_math_contracts() {
    let mut interp = Interpreter::new();
    assert_eq!(interp.eval("Math.pow(2, 8);").unwrap(), Value::Number(256.0));
    assert_eq!(interp.eval("Math.abs(0 - 4);").unwrap(), Value::Number(4.0));
    assert_eq!(interp.eval("Math.sin(0);").unwrap(), Value::Number(0.0));
    assert_eq!(interp.eval("Math.max(1, 9, 3);").unwrap(), Value::Number(9.0));
    assert_eq!(interp.eval("Math.min();").unwrap(), Value::Number(f64::INFINITY));

    let err = argument_error(&mut interp, "Math.pow(2);");
    assert_eq!(err.message, "missing argument 2");
    let err = argument_error(&mut interp, "Math.sqrt('9');");
    assert_eq!(err.to_string(), "Math.sqrt: argument 1 must be a number, got string");
}

#[test]
fn test_string_contracts() {
    let mut interp = Interpreter::new();
    assert_eq!(
        interp.eval("String.slice('orchard', 0 - 4);").unwrap(),
        Value::from("hard")
    );
    assert_eq!(
        interp.eval("String.slice('orchard', 1, 3);").unwrap(),
        Value::from("rc")
    );
    assert_eq!(
        interp.eval("String.replace('a-b-c', '-', '+');").unwrap(),
        Value::from("a+b-c")
    );
    assert_eq!(interp.eval("String.toUpperCase('ok');").unwrap(), Value::from("OK"));
    assert_eq!(interp.eval("String.length('four');").unwrap(), Value::Number(4.0));

    let err = argument_error(&mut interp, "String.slice(5, 1);");
    assert_eq!(err.function, "String.slice");
}

#[test]
fn test_date_now_is_a_number() {
    let mut interp = Interpreter::new();
    let now = interp.eval("Date.now();").unwrap();
    assert!(matches!(now, Value::Number(ms) if ms > 0.0));
}

#[test]
fn test_unknown_builtin_operation() {
    let mut interp = Interpreter::new();
    assert!(matches!(
        interp.eval("Date.parse('x');"),
        Err(ScriptError::Execution(ExecutionError::UnknownBuiltin { .. }))
    ));
}

#[test]
fn test_namespaces_are_bound_globally() {
    let interp = Interpreter::new();
    for name in ["Math", "Array", "String", "Date"] {
        assert_eq!(interp.global(name), Some(Value::Namespace(name)));
    }
}

#[test]
fn test_display_contract() {
    let mut interp = Interpreter::new();
    let cases = [
        ("1 / 0;", "Infinity"),
        ("0 / 0;", "NaN"),
        ("'text';", "text"),
        ("true;", "true"),
        ("{};", "{}"),
        ("Math;", "[object Math]"),
    ];
    for (source, expected) in cases {
        let value = interp.eval(source).unwrap();
        assert_eq!(interp.display(&value), expected, "{}", source);
    }
}
