//! End-to-end tests through the runtime the `apple` binary drives
//!
//! Scripts are written to disk and executed the way `apple SCRIPT` runs
//! them, with the configuration the command-line flags produce.

use std::fs;

use apple_cli::{Backend, Cli, CliError, Runtime};
use clap::Parser as ClapParser;
use core_types::{ExecutionError, ScriptError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn runtime_for(args: &[&str]) -> Runtime {
    let cli = Cli::try_parse_from(args).expect("valid arguments");
    Runtime::with_config(cli.runtime_config())
}

#[test]
fn test_script_file_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("program.apl");
    fs::write(
        &path,
        r#"
function greet(name) {
    return `hello ${name}`;
}
let words = Array.map(["ada", "bob"], greet);
String.toUpperCase(greet("world"));
"#,
    )
    .unwrap();

    let mut runtime = runtime_for(&["apple"]);
    let output = runtime.execute_file(&path).unwrap();
    assert_eq!(output.text(), "HELLO WORLD");

    let words = runtime.execute_string("words;").unwrap();
    assert_eq!(words.text(), r#"["hello ada", "hello bob"]"#);
}

#[test]
fn test_bytecode_flag_selects_vm() {
    let mut runtime = runtime_for(&["apple", "--backend", "bytecode"]);
    assert_eq!(runtime.config().backend, Backend::Bytecode);

    let output = runtime
        .execute_string("let n = 0; while (n < 5) { n += 1; } n;")
        .unwrap();
    assert_eq!(output.text(), "5");
}

#[test]
fn test_step_limit_flag_bounds_loop() {
    let mut runtime = runtime_for(&["apple", "--backend", "bytecode", "--step-limit", "500"]);
    let err = runtime.execute_string("for (;;) { }").unwrap_err();
    assert!(matches!(
        err,
        CliError::Script(ScriptError::Execution(ExecutionError::StepLimitExceeded {
            limit: 500
        }))
    ));
}

#[test]
fn test_no_gc_flag_keeps_garbage() {
    let mut runtime = runtime_for(&["apple", "--no-gc"]);
    let before = runtime.interpreter().live_objects();
    runtime.execute_string("[1]; [2];").unwrap();
    assert_eq!(runtime.interpreter().live_objects(), before + 2);
}

#[test]
fn test_error_leaves_session_usable() {
    let mut runtime = runtime_for(&["apple"]);
    runtime.execute_string("let kept = 1;").unwrap();
    assert!(runtime.execute_string("kept(;").is_err());
    assert!(runtime.execute_string("Math.nope(1);").is_err());
    assert_eq!(runtime.execute_string("kept + 1;").unwrap().text(), "2");
}
