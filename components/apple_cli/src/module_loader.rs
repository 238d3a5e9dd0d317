//! Script module loading
//!
//! A module is a script file run once in its own interpreter; its exports
//! are the program result (the value of its last statement or top-level
//! `return`). Modules are cached by canonical path for the lifetime of the
//! loader.
//!
//! Scripts have no import form and [`ModuleLoader::load`] takes `&mut self`,
//! so a load can never re-enter the loader: circular loads cannot arise.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use core_types::ModuleError;
use interpreter::{Interpreter, Value};

/// A loaded module
#[derive(Debug)]
pub struct Module {
    path: PathBuf,
    interpreter: Interpreter,
    exports: Value,
}

impl Module {
    /// Canonical path the module was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The module's program result
    pub fn exports(&self) -> &Value {
        &self.exports
    }

    /// The interpreter holding the module's globals
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Exports rendered for printing
    pub fn render_exports(&self) -> String {
        self.interpreter.display(&self.exports)
    }
}

/// Loads script files and memoizes them by path
#[derive(Debug, Default)]
pub struct ModuleLoader {
    cache: HashMap<PathBuf, Rc<Module>>,
}

impl ModuleLoader {
    /// Create a loader with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a module, returning the cached one if the path was loaded before
    ///
    /// # Errors
    ///
    /// [`ModuleError::NotFound`] if the path does not exist,
    /// [`ModuleError::Io`] if it cannot be read, and
    /// [`ModuleError::Script`] if the module fails to parse or run. Failed
    /// loads are not cached.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Rc<Module>, ModuleError> {
        let requested = path.as_ref();
        let canonical = std::fs::canonicalize(requested).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ModuleError::NotFound {
                    path: requested.to_path_buf(),
                }
            } else {
                ModuleError::Io {
                    path: requested.to_path_buf(),
                    source,
                }
            }
        })?;

        if let Some(module) = self.cache.get(&canonical) {
            tracing::debug!(path = %canonical.display(), "module cache hit");
            return Ok(Rc::clone(module));
        }

        let source = std::fs::read_to_string(&canonical).map_err(|source| ModuleError::Io {
            path: canonical.clone(),
            source,
        })?;

        let mut interpreter = Interpreter::new();
        let exports = interpreter
            .eval(&source)
            .map_err(|err| ModuleError::Script {
                path: canonical.clone(),
                source: Box::new(err),
            })?;
        tracing::debug!(path = %canonical.display(), "module loaded");

        let module = Rc::new(Module {
            path: canonical.clone(),
            interpreter,
            exports,
        });
        self.cache.insert(canonical, Rc::clone(&module));
        Ok(module)
    }

    /// Whether the path has been loaded successfully
    pub fn is_cached(&self, path: impl AsRef<Path>) -> bool {
        std::fs::canonicalize(path)
            .map(|canonical| self.cache.contains_key(&canonical))
            .unwrap_or(false)
    }

    /// Number of cached modules
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no module has been loaded
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
