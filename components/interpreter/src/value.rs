//! Runtime values of the tree-walking executor
//!
//! Scalars are stored inline. Arrays and objects live in the executor's
//! [`Heap`](memory_manager::Heap) and are referenced by handle, so two
//! values naming the same array observe each other's mutations.

use std::collections::BTreeMap;
use std::rc::Rc;

use bytecode_system::format_number;
use memory_manager::{GcHandle, Trace};
use parser::FunctionDeclaration;

/// A value produced by evaluating an expression
#[derive(Debug, Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// Boolean
    Boolean(bool),
    /// IEEE 754 double
    Number(f64),
    /// String
    String(String),
    /// Array stored on the heap
    Array(GcHandle),
    /// Object literal stored on the heap
    Object(GcHandle),
    /// User-declared function
    Function(Rc<FunctionDeclaration>),
    /// Builtin namespace such as `Math`
    Namespace(&'static str),
}

impl Value {
    /// Falsy values are `undefined`, `false`, `0`, `NaN` and `""`
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Namespace(_) => true,
        }
    }

    /// Type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Namespace(_) => "namespace",
        }
    }

    /// Try to get the number value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Heap handle held by this value, if any
    pub fn handle(&self) -> Option<GcHandle> {
        match self {
            Value::Array(h) | Value::Object(h) => Some(*h),
            _ => None,
        }
    }
}

/// Strict equality: same type and same value, heap values by identity
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Namespace(a), Value::Namespace(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Objects stored in the executor heap
#[derive(Debug, Clone)]
pub enum HeapObject {
    /// Cell holding the current value of one variable binding
    Binding(Value),
    /// Array elements
    Array(Vec<Value>),
    /// Object properties, ordered by key
    Record(BTreeMap<String, Value>),
}

impl Trace for HeapObject {
    fn trace(&self, visit: &mut dyn FnMut(GcHandle)) {
        let mut visit_value = |value: &Value| {
            if let Some(handle) = value.handle() {
                visit(handle);
            }
        };
        match self {
            HeapObject::Binding(value) => visit_value(value),
            HeapObject::Array(elements) => elements.iter().for_each(visit_value),
            HeapObject::Record(properties) => properties.values().for_each(visit_value),
        }
    }
}

/// Render a scalar without consulting the heap; heap values render as their type
pub(crate) fn display_scalar(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.clone(),
        Value::Array(_) => "[array]".to_string(),
        Value::Object(_) => "[object]".to_string(),
        Value::Function(decl) => format!("[Function: {}]", decl.name),
        Value::Namespace(name) => format!("[object {}]", name),
    }
}
