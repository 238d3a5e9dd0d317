//! Runtime orchestration for script execution
//!
//! The Runtime coordinates the pipeline:
//! - Lexer and Parser for the front end
//! - The tree-walking Interpreter (default) or BytecodeGenerator + Vm
//! - Garbage collection between top-level executions
//! - The ModuleLoader for `.load`

use std::fmt;
use std::path::Path;

use bytecode_system::Value as BytecodeValue;
use core_types::ScriptError;
use interpreter::{Interpreter, Value, Vm};
use memory_manager::GcStats;
use parser::{parse_program, tokenize, BytecodeGenerator};

use crate::error::{CliError, CliResult};
use crate::module_loader::ModuleLoader;

/// Execution backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// Tree-walking interpreter over the AST
    #[default]
    Tree,
    /// Bytecode compiler and stack VM; supports the control-flow subset
    Bytecode,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Tree => write!(f, "tree"),
            Backend::Bytecode => write!(f, "bytecode"),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Which backend executes programs
    pub backend: Backend,
    /// Print the token stream before parsing
    pub print_tokens: bool,
    /// Print the AST before execution
    pub print_ast: bool,
    /// Print compiled bytecode (bytecode backend only)
    pub print_bytecode: bool,
    /// Collect garbage after every top-level execution (tree backend)
    pub collect_after_run: bool,
    /// Bound on dispatched VM instructions per run (bytecode backend)
    pub step_limit: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Tree,
            print_tokens: false,
            print_ast: false,
            print_bytecode: false,
            collect_after_run: true,
            step_limit: None,
        }
    }
}

/// Rendered result of one top-level execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    text: String,
    undefined: bool,
}

impl Output {
    fn new(text: String, undefined: bool) -> Self {
        Self { text, undefined }
    }

    /// Whether the program produced `undefined`
    pub fn is_undefined(&self) -> bool {
        self.undefined
    }

    /// The value as the shell prints it
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Main runtime that orchestrates all execution components
///
/// Global state persists across calls on the same backend, so the REPL
/// can build a program line by line.
#[derive(Debug)]
pub struct Runtime {
    config: RuntimeConfig,
    /// Persistent tree-walking interpreter
    interpreter: Interpreter,
    /// Persistent VM for the bytecode backend
    vm: Vm,
    modules: ModuleLoader,
}

impl Runtime {
    /// Create a runtime with the default configuration
    ///
    /// # Example
    /// ```
    /// use apple_cli::Runtime;
    ///
    /// let mut runtime = Runtime::new();
    /// let output = runtime.execute_string("let x = 40; x + 2;").unwrap();
    /// assert_eq!(output.text(), "42");
    /// ```
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a runtime from an explicit configuration
    pub fn with_config(config: RuntimeConfig) -> Self {
        let vm = build_vm(config.step_limit);
        Self {
            config,
            interpreter: Interpreter::new(),
            vm,
            modules: ModuleLoader::new(),
        }
    }

    /// Select the backend
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Enable token printing
    pub fn with_print_tokens(mut self, enabled: bool) -> Self {
        self.config.print_tokens = enabled;
        self
    }

    /// Enable AST printing
    pub fn with_print_ast(mut self, enabled: bool) -> Self {
        self.config.print_ast = enabled;
        self
    }

    /// Enable bytecode printing
    pub fn with_print_bytecode(mut self, enabled: bool) -> Self {
        self.config.print_bytecode = enabled;
        self
    }

    /// Enable or disable collection after each top-level execution
    pub fn with_collect_after_run(mut self, enabled: bool) -> Self {
        self.config.collect_after_run = enabled;
        self
    }

    /// Bound VM runs; replaces the VM, dropping its variables
    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.config.step_limit = limit;
        self.vm = build_vm(limit);
        self
    }

    /// Current configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Switch backend; each backend keeps its own globals
    pub fn set_backend(&mut self, backend: Backend) {
        self.config.backend = backend;
    }

    /// The tree-walking interpreter
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// The bytecode VM
    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    /// Execute a script file against the persistent globals
    ///
    /// # Errors
    /// Returns `CliError::Io` if the file cannot be read, or
    /// `CliError::Script` if any pipeline stage fails
    pub fn execute_file(&mut self, path: impl AsRef<Path>) -> CliResult<Output> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.execute_string(&source)
    }

    /// Execute source text as one evaluation unit
    ///
    /// # Errors
    /// Returns `CliError::Script` for the first failure of any stage
    pub fn execute_string(&mut self, source: &str) -> CliResult<Output> {
        if self.config.print_tokens {
            for token in tokenize(source).map_err(ScriptError::from)? {
                println!("{:?}", token);
            }
        }

        let program = parse_program(source).map_err(ScriptError::from)?;
        if self.config.print_ast {
            println!("{:#?}", program);
        }

        match self.config.backend {
            Backend::Tree => {
                let result = self.interpreter.run(&program);
                // Render before collecting: an unbound result is garbage
                let output = result.map(|value| {
                    Output::new(
                        self.interpreter.display(&value),
                        matches!(value, Value::Undefined),
                    )
                });
                if self.config.collect_after_run {
                    self.collect_garbage();
                }
                Ok(output.map_err(ScriptError::from)?)
            }
            Backend::Bytecode => {
                let chunk = BytecodeGenerator::new()
                    .generate(&program)
                    .map_err(ScriptError::from)?;
                if self.config.print_bytecode {
                    print!("{}", chunk);
                }
                let value = self.vm.run(&chunk).map_err(ScriptError::from)?;
                Ok(Output::new(
                    value.to_string(),
                    value == BytecodeValue::Undefined,
                ))
            }
        }
    }

    /// Load a module through the cache and render its exports
    pub fn load_module(&mut self, path: impl AsRef<Path>) -> CliResult<Output> {
        let module = self.modules.load(path).map_err(ScriptError::from)?;
        Ok(Output::new(
            module.render_exports(),
            matches!(module.exports(), Value::Undefined),
        ))
    }

    /// The module cache
    pub fn modules(&self) -> &ModuleLoader {
        &self.modules
    }

    /// Collect garbage in the tree-walking interpreter's heap
    pub fn collect_garbage(&mut self) -> GcStats {
        self.interpreter.collect_garbage()
    }

    /// Start the REPL (Read-Eval-Print Loop)
    ///
    /// # Errors
    /// Returns `CliError::Repl` if the line editor fails
    pub fn repl(&mut self) -> CliResult<()> {
        crate::repl::run_repl(self)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

fn build_vm(step_limit: Option<u64>) -> Vm {
    match step_limit {
        Some(limit) => Vm::new().with_step_limit(limit),
        None => Vm::new(),
    }
}
