//! Call context handed to builtin host functions

use std::rc::Rc;

use core_types::{ArgumentError, ExecutionError};
use memory_manager::{GcHandle, Heap};
use parser::FunctionDeclaration;

use crate::environment::Environment;
use crate::executor::Executor;
use crate::value::{HeapObject, Value};

/// What a builtin can reach while it runs: the heap, the caller's
/// environment (for calling back into script functions) and its own name
/// for error reporting.
pub struct CallContext<'a, 'p> {
    executor: &'a mut Executor,
    env: &'a Environment<'p>,
    name: String,
}

impl<'a, 'p> CallContext<'a, 'p> {
    pub(crate) fn new(
        executor: &'a mut Executor,
        env: &'a Environment<'p>,
        namespace: &str,
        operation: &str,
    ) -> Self {
        Self {
            executor,
            env,
            name: format!("{}.{}", namespace, operation),
        }
    }

    /// Qualified builtin name, e.g. `Array.push`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared view of the heap
    pub fn heap(&self) -> &Heap<HeapObject> {
        self.executor.heap()
    }

    /// Mutable view of the heap
    pub fn heap_mut(&mut self) -> &mut Heap<HeapObject> {
        self.executor.heap_mut()
    }

    /// Call a script function with positional arguments
    pub fn call(
        &mut self,
        function: &Rc<FunctionDeclaration>,
        args: Vec<Value>,
    ) -> Result<Value, ExecutionError> {
        self.executor.call_function(function, args, self.env)
    }

    /// Argument error attributed to this builtin
    pub fn error(&self, message: impl Into<String>) -> ArgumentError {
        ArgumentError::new(self.name.clone(), message)
    }

    /// The argument at `index`, which must be present
    pub fn argument<'v>(&self, args: &'v [Value], index: usize) -> Result<&'v Value, ArgumentError> {
        args.get(index)
            .ok_or_else(|| self.error(format!("missing argument {}", index + 1)))
    }

    /// A number argument
    pub fn number(&self, args: &[Value], index: usize) -> Result<f64, ArgumentError> {
        match self.argument(args, index)? {
            Value::Number(n) => Ok(*n),
            other => Err(self.mismatch(index, "a number", other)),
        }
    }

    /// An optional number argument; absent and `undefined` both yield `None`
    pub fn optional_number(&self, args: &[Value], index: usize) -> Result<Option<f64>, ArgumentError> {
        match args.get(index) {
            None | Some(Value::Undefined) => Ok(None),
            Some(_) => self.number(args, index).map(Some),
        }
    }

    /// A string argument
    pub fn string<'v>(&self, args: &'v [Value], index: usize) -> Result<&'v str, ArgumentError> {
        match self.argument(args, index)? {
            Value::String(s) => Ok(s.as_str()),
            other => Err(self.mismatch(index, "a string", other)),
        }
    }

    /// An array argument
    pub fn array(&self, args: &[Value], index: usize) -> Result<GcHandle, ArgumentError> {
        match self.argument(args, index)? {
            Value::Array(handle) => Ok(*handle),
            other => Err(self.mismatch(index, "an array", other)),
        }
    }

    /// A script function argument
    pub fn function(
        &self,
        args: &[Value],
        index: usize,
    ) -> Result<Rc<FunctionDeclaration>, ArgumentError> {
        match self.argument(args, index)? {
            Value::Function(decl) => Ok(Rc::clone(decl)),
            other => Err(self.mismatch(index, "a function", other)),
        }
    }

    /// Elements of the array behind `handle`
    pub fn elements(&self, handle: GcHandle) -> Result<&[Value], ArgumentError> {
        match self.heap().get(handle) {
            Some(HeapObject::Array(elements)) => Ok(elements),
            _ => Err(self.error("array has been freed")),
        }
    }

    /// Mutable elements of the array behind `handle`
    pub fn elements_mut(&mut self, handle: GcHandle) -> Result<&mut Vec<Value>, ArgumentError> {
        let freed = self.error("array has been freed");
        match self.heap_mut().get_mut(handle) {
            Some(HeapObject::Array(elements)) => Ok(elements),
            _ => Err(freed),
        }
    }

    fn mismatch(&self, index: usize, expected: &str, got: &Value) -> ArgumentError {
        self.error(format!(
            "argument {} must be {}, got {}",
            index + 1,
            expected,
            got.type_name()
        ))
    }
}
