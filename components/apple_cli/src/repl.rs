//! REPL (Read-Eval-Print Loop) implementation
//!
//! Each complete input is one evaluation unit: a failure is printed and
//! the loop keeps going with the globals defined so far.

use clap::ValueEnum;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::cli::VERSION;
use crate::error::{CliError, CliResult};
use crate::runtime::{Backend, Runtime};

/// What the loop should do after a dot-command
#[derive(Debug, PartialEq, Eq)]
enum CommandOutcome {
    Continue,
    StartEditor,
}

/// Run the interactive REPL
pub fn run_repl(runtime: &mut Runtime) -> CliResult<()> {
    let mut editor = DefaultEditor::new()
        .map_err(|e| CliError::Repl(format!("failed to initialize editor: {}", e)))?;

    println!("Apple v{} ({} backend)", VERSION, runtime.config().backend);
    println!("Type .help for commands or 'exit' to quit.");

    let mut line_buffer = String::new();
    let mut in_multiline = false;
    let mut in_editor = false;

    loop {
        let prompt = if in_editor {
            "| "
        } else if in_multiline {
            "... "
        } else {
            "> "
        };

        match editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if in_editor {
                    if trimmed == "done" {
                        in_editor = false;
                        if line_buffer.trim().is_empty() {
                            println!("No code to execute.");
                        } else {
                            let _ = editor.add_history_entry(line_buffer.as_str());
                            evaluate(runtime, &line_buffer);
                        }
                        line_buffer.clear();
                    } else {
                        line_buffer.push_str(&line);
                        line_buffer.push('\n');
                    }
                    continue;
                }

                if !in_multiline && matches!(trimmed, "exit" | ".exit" | "quit") {
                    println!("Exiting Apple...");
                    break;
                }

                if !in_multiline && trimmed.starts_with('.') {
                    if handle_repl_command(trimmed, runtime) == CommandOutcome::StartEditor {
                        in_editor = true;
                        line_buffer.clear();
                    }
                    continue;
                }

                if in_multiline {
                    line_buffer.push('\n');
                }
                line_buffer.push_str(&line);

                if is_input_complete(&line_buffer) {
                    in_multiline = false;
                    let _ = editor.add_history_entry(line_buffer.as_str());
                    evaluate(runtime, &line_buffer);
                    line_buffer.clear();
                } else {
                    in_multiline = true;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                if in_multiline || in_editor {
                    println!("^C");
                    line_buffer.clear();
                    in_multiline = false;
                    in_editor = false;
                } else {
                    println!("Press Ctrl-D or type 'exit' to quit");
                }
            }
            Err(ReadlineError::Eof) => {
                println!("\nExiting Apple...");
                break;
            }
            Err(err) => {
                return Err(CliError::Repl(format!("readline error: {}", err)));
            }
        }
    }

    Ok(())
}

fn evaluate(runtime: &mut Runtime, source: &str) {
    match runtime.execute_string(source) {
        Ok(output) => {
            if !output.is_undefined() {
                println!("{}", output);
            }
        }
        Err(e) => eprintln!("apple: {}", e),
    }
}

/// Handle special REPL commands
fn handle_repl_command(command: &str, runtime: &mut Runtime) -> CommandOutcome {
    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        ".help" => {
            println!("REPL Commands:");
            println!("  .help              - Show this help message");
            println!("  .gc                - Collect garbage and show statistics");
            println!("  .backend [NAME]    - Show or switch backend (tree, bytecode)");
            println!("  .load PATH         - Load a module and print its exports");
            println!("  .editor            - Enter multi-line mode; 'done' runs the buffer");
            println!("  .clear             - Clear the screen");
            println!("  exit               - Exit the REPL");
        }
        ".gc" => {
            let stats = runtime.collect_garbage();
            println!(
                "marked {}, freed {}, live {}",
                stats.marked, stats.freed, stats.live
            );
        }
        ".backend" if argument.is_empty() => {
            println!("backend: {}", runtime.config().backend);
        }
        ".backend" => match Backend::from_str(argument, true) {
            Ok(backend) => {
                runtime.set_backend(backend);
                println!("backend: {}", backend);
            }
            Err(_) => println!("Unknown backend: {} (expected tree or bytecode)", argument),
        },
        ".load" if argument.is_empty() => println!("Usage: .load PATH"),
        ".load" => match runtime.load_module(argument) {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("apple: {}", e),
        },
        ".editor" => {
            println!("Entering editor mode. Type 'done' to run.");
            return CommandOutcome::StartEditor;
        }
        ".clear" => {
            print!("\x1B[2J\x1B[1;1H");
        }
        _ => {
            println!("Unknown command: {}", command);
            println!("Type .help for available commands");
        }
    }
    CommandOutcome::Continue
}

/// Check if the input appears to be complete
///
/// A heuristic: brackets are balanced and no string, template or block
/// comment is open. Brackets inside comments and strings do not count.
fn is_input_complete(input: &str) -> bool {
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut escape_next = false;
    let mut line_comment = false;
    let mut block_comment = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if escape_next {
            escape_next = false;
            continue;
        }
        if line_comment {
            line_comment = c != '\n';
            continue;
        }
        if block_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                block_comment = false;
            }
            continue;
        }

        match quote {
            Some(_) if c == '\\' => escape_next = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' | '`' => quote = Some(c),
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    line_comment = true;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    block_comment = true;
                }
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' => depth -= 1,
                _ => {}
            },
        }
    }

    depth <= 0 && quote.is_none() && !block_comment
}
