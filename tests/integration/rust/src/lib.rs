//! Integration test suite for the Apple scripting language
//!
//! These tests drive components across their boundaries: source text
//! through the parser into either backend, heap state observed through the
//! interpreter, and the runtime as the `apple` binary uses it.

/// Re-export components for test convenience
pub mod components {
    pub use apple_cli;
    pub use builtins;
    pub use bytecode_system;
    pub use core_types;
    pub use interpreter;
    pub use memory_manager;
    pub use parser;
}
