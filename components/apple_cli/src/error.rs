//! Error types for the CLI

use std::path::PathBuf;

use core_types::ScriptError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Lexing, parsing, compiling, executing or loading a module failed
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// A script file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The file that was requested
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// The line editor failed
    #[error("REPL error: {0}")]
    Repl(String),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
