//! Lexical environments
//!
//! An environment maps names to binding cells on the heap and borrows its
//! parent. Lookups walk outwards; definitions always land in the innermost
//! environment, so a child shadows but never mutates a parent's binding.

use std::collections::HashMap;

use core_types::ExecutionError;
use memory_manager::{GcHandle, GcStats, Heap};

use crate::value::{HeapObject, Value};

/// A scope frame
#[derive(Debug, Default)]
pub struct Environment<'p> {
    variables: HashMap<String, GcHandle>,
    parent: Option<&'p Environment<'p>>,
}

impl<'p> Environment<'p> {
    /// Create a root environment
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
            parent: None,
        }
    }

    /// Create a child of `parent`
    pub fn with_parent(parent: &'p Environment<'p>) -> Self {
        Self {
            variables: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Bind `name` in this environment, allocating a fresh cell for the value
    pub fn define(&mut self, name: impl Into<String>, value: Value, heap: &mut Heap<HeapObject>) {
        let cell = heap.allocate(HeapObject::Binding(value));
        self.variables.insert(name.into(), cell);
    }

    /// Resolve `name` through the parent chain
    pub fn lookup(&self, name: &str, heap: &Heap<HeapObject>) -> Option<Value> {
        let cell = self.resolve(name)?;
        match heap.get(cell) {
            Some(HeapObject::Binding(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Overwrite the nearest existing binding of `name`
    pub fn assign(
        &self,
        name: &str,
        value: Value,
        heap: &mut Heap<HeapObject>,
    ) -> Result<(), ExecutionError> {
        let undefined = || ExecutionError::UndefinedIdentifier {
            name: name.to_string(),
        };
        let cell = self.resolve(name).ok_or_else(undefined)?;
        match heap.get_mut(cell) {
            Some(HeapObject::Binding(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(undefined()),
        }
    }

    /// Whether `name` is bound in this environment itself, ignoring parents
    pub fn has_own(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Names bound in this environment itself
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// The outermost environment of the chain
    pub fn global(&self) -> &Environment<'_> {
        let mut env: &Environment<'_> = self;
        while let Some(parent) = env.parent {
            env = parent;
        }
        env
    }

    /// Every binding cell reachable through the parent chain
    pub fn roots(&self) -> Vec<GcHandle> {
        let mut roots = Vec::new();
        let mut env = Some(self);
        while let Some(current) = env {
            roots.extend(current.variables.values().copied());
            env = current.parent;
        }
        roots
    }

    /// Collect garbage with this environment chain as the root set
    ///
    /// Must only run between top-level executions: intermediate values
    /// that are not yet bound to a name are not roots.
    pub fn run_gc(&self, heap: &mut Heap<HeapObject>) -> GcStats {
        heap.collect(self.roots())
    }

    fn resolve(&self, name: &str) -> Option<GcHandle> {
        let mut env = Some(self);
        while let Some(current) = env {
            if let Some(cell) = current.variables.get(name) {
                return Some(*cell);
            }
            env = current.parent;
        }
        None
    }
}
