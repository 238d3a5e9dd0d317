//! Command-line arguments

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::runtime::{Backend, RuntimeConfig};

/// Language version reported by `-v`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Apple scripting language runner
#[derive(Debug, Parser)]
#[command(name = "apple", about, disable_version_flag = true)]
pub struct Cli {
    /// Script to run
    #[arg(value_name = "SCRIPT", conflicts_with = "file")]
    pub script: Option<PathBuf>,

    /// Script to run
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Evaluate source text
    #[arg(short, long, value_name = "CODE")]
    pub eval: Option<String>,

    /// Start the interactive shell (after --eval, if given)
    #[arg(short, long)]
    pub repl: bool,

    /// Execution backend
    #[arg(long, value_enum, default_value_t = Backend::Tree)]
    pub backend: Backend,

    /// Print the token stream before parsing
    #[arg(long)]
    pub print_tokens: bool,

    /// Print the AST before execution
    #[arg(long)]
    pub print_ast: bool,

    /// Print compiled bytecode (bytecode backend)
    #[arg(long)]
    pub print_bytecode: bool,

    /// Do not collect garbage after each execution
    #[arg(long)]
    pub no_gc: bool,

    /// Stop bytecode runs after N instructions
    #[arg(long, value_name = "N")]
    pub step_limit: Option<u64>,

    /// Log filter, e.g. `debug` or `interpreter=trace`; overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Print the language version and exit
    #[arg(short = 'v', long)]
    pub version: bool,
}

impl Cli {
    /// Script path from either the positional argument or `--file`
    pub fn script_path(&self) -> Option<&Path> {
        self.file.as_deref().or(self.script.as_deref())
    }

    /// Runtime configuration selected by the flags
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            backend: self.backend,
            print_tokens: self.print_tokens,
            print_ast: self.print_ast,
            print_bytecode: self.print_bytecode,
            collect_after_run: !self.no_gc,
            step_limit: self.step_limit,
        }
    }
}

/// Text printed by `-v`
pub fn version_banner() -> String {
    format!(
        "Your current Apple version: {}\nCopyright the Apple authors 2025, under the Mozilla Public License v2.0.",
        VERSION
    )
}
