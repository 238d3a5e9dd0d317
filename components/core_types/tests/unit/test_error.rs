//! Unit tests for the error taxonomy

use core_types::{
    ArgumentError, CompileError, ExecutionError, LexError, ModuleError, ParseError, ScriptError,
    SourcePosition,
};
use std::error::Error;
use std::path::PathBuf;

#[test]
fn test_unexpected_token_message() {
    let err = ParseError::UnexpectedToken {
        expected: "';'".to_string(),
        actual: "identifier 'y'".to_string(),
        position: SourcePosition::new(1, 11, 10),
    };
    assert_eq!(err.to_string(), "expected ';', got identifier 'y' at 1:11");
}

#[test]
fn test_unterminated_comment_message() {
    let err = LexError::UnterminatedComment {
        position: SourcePosition::new(3, 1, 20),
    };
    assert_eq!(err.to_string(), "unterminated block comment starting at 3:1");
}

#[test]
fn test_script_error_wraps_each_stage() {
    let compile: ScriptError = CompileError::UnsupportedNode {
        kind: "FunctionDeclaration",
    }
    .into();
    assert!(matches!(compile, ScriptError::Compile(_)));

    let exec: ScriptError = ExecutionError::FunctionNotFound {
        name: "f".to_string(),
    }
    .into();
    assert!(matches!(exec, ScriptError::Execution(_)));

    let parse: ScriptError = ParseError::UnexpectedToken {
        expected: "'('".to_string(),
        actual: "end of input".to_string(),
        position: SourcePosition::start(),
    }
    .into();
    assert!(matches!(parse, ScriptError::Parse(_)));
}

#[test]
fn test_argument_error_converts_to_script_error() {
    let err: ScriptError = ArgumentError::new("Math.abs", "expected a number").into();
    assert!(matches!(
        err,
        ScriptError::Execution(ExecutionError::Argument(ref a)) if a.function == "Math.abs"
    ));
}

#[test]
fn test_module_io_error_exposes_source() {
    let err = ModuleError::Io {
        path: PathBuf::from("dir"),
        source: std::io::Error::new(std::io::ErrorKind::Other, "is a directory"),
    };
    assert!(err.source().is_some());
}

#[test]
fn test_type_mismatch_message() {
    let err = ExecutionError::TypeMismatch {
        operator: "-".to_string(),
        left: "string",
        right: "number",
    };
    assert_eq!(err.to_string(), "cannot apply '-' to string and number");
}

#[test]
fn test_depth_bound_messages() {
    assert_eq!(
        ExecutionError::CallDepthExceeded { limit: 400 }.to_string(),
        "maximum call depth of 400 exceeded"
    );
    let nested = ParseError::NestingTooDeep {
        limit: 256,
        position: SourcePosition::new(1, 300, 299),
    };
    assert_eq!(
        nested.to_string(),
        "expressions nested deeper than 256 levels at 1:300"
    );
}

#[test]
fn test_invalid_bytecode_wraps_compile_error() {
    let err: ExecutionError = CompileError::InvalidConstant {
        index: 0,
        constant: 3,
        len: 1,
    }
    .into();
    assert_eq!(
        err.to_string(),
        "invalid bytecode: instruction 0 loads constant 3, outside 0..1"
    );
}
