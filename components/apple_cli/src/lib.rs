//! Apple scripting language host
//!
//! Provides the Runtime, the module loader, command-line parsing and the
//! interactive shell behind the `apple` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod module_loader;
pub mod repl;
pub mod runtime;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use module_loader::{Module, ModuleLoader};
pub use runtime::{Backend, Output, Runtime, RuntimeConfig};
