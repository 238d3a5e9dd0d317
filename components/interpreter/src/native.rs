//! Builtin capability table
//!
//! The table maps a namespace name (`Math`) and an operation name (`pow`)
//! to a host function. It is built once, before the interpreter starts, and
//! never changes afterwards; the interpreter binds each namespace name in
//! its global environment.

use std::collections::BTreeMap;

use builtins::{ArrayPrototype, DateObject, MathObject, StringPrototype};
use core_types::ExecutionError;

use crate::context::CallContext;
use crate::value::{HeapObject, Value};

/// Signature of a builtin host function
pub type NativeFunction = fn(&mut CallContext<'_, '_>, &[Value]) -> Result<Value, ExecutionError>;

/// Immutable mapping from `Namespace.operation` to host functions
#[derive(Clone, Default)]
pub struct BuiltinTable {
    namespaces: BTreeMap<&'static str, BTreeMap<&'static str, NativeFunction>>,
}

impl std::fmt::Debug for BuiltinTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (namespace, operations) in &self.namespaces {
            map.entry(namespace, &operations.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

impl BuiltinTable {
    /// A table with no namespaces
    pub fn empty() -> Self {
        Self::default()
    }

    /// The `Math`, `Array`, `String` and `Date` namespaces
    pub fn standard() -> Self {
        Self::empty()
            .with_function("Math", "pow", math_pow)
            .with_function("Math", "abs", |ctx, args| math_unary(ctx, args, MathObject::abs))
            .with_function("Math", "sin", |ctx, args| math_unary(ctx, args, MathObject::sin))
            .with_function("Math", "cos", |ctx, args| math_unary(ctx, args, MathObject::cos))
            .with_function("Math", "sqrt", |ctx, args| math_unary(ctx, args, MathObject::sqrt))
            .with_function("Math", "floor", |ctx, args| {
                math_unary(ctx, args, MathObject::floor)
            })
            .with_function("Math", "ceil", |ctx, args| math_unary(ctx, args, MathObject::ceil))
            .with_function("Math", "round", |ctx, args| {
                math_unary(ctx, args, MathObject::round)
            })
            .with_function("Math", "max", |ctx, args| math_fold(ctx, args, MathObject::max))
            .with_function("Math", "min", |ctx, args| math_fold(ctx, args, MathObject::min))
            .with_function("Array", "push", array_push)
            .with_function("Array", "pop", array_pop)
            .with_function("Array", "map", array_map)
            .with_function("Array", "length", array_length)
            .with_function("String", "slice", string_slice)
            .with_function("String", "replace", string_replace)
            .with_function("String", "length", |ctx, args| {
                Ok(Value::Number(StringPrototype::length(ctx.string(args, 0)?) as f64))
            })
            .with_function("String", "toUpperCase", |ctx, args| {
                Ok(Value::String(StringPrototype::to_upper_case(ctx.string(args, 0)?)))
            })
            .with_function("String", "toLowerCase", |ctx, args| {
                Ok(Value::String(StringPrototype::to_lower_case(ctx.string(args, 0)?)))
            })
            .with_function("Date", "now", |_, _| Ok(Value::Number(DateObject::now())))
    }

    /// Add or replace one operation; used while building a table
    pub fn with_function(
        mut self,
        namespace: &'static str,
        operation: &'static str,
        function: NativeFunction,
    ) -> Self {
        self.namespaces
            .entry(namespace)
            .or_default()
            .insert(operation, function);
        self
    }

    /// Look up `namespace.operation`
    pub fn get(&self, namespace: &str, operation: &str) -> Option<NativeFunction> {
        self.namespaces.get(namespace)?.get(operation).copied()
    }

    /// Namespace names in sorted order
    pub fn namespaces(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.namespaces.keys().copied()
    }

    /// Operation names of one namespace in sorted order
    pub fn operations(&self, namespace: &str) -> Vec<&'static str> {
        self.namespaces
            .get(namespace)
            .map(|ops| ops.keys().copied().collect())
            .unwrap_or_default()
    }
}

fn math_pow(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, ExecutionError> {
    let base = ctx.number(args, 0)?;
    let exponent = ctx.number(args, 1)?;
    Ok(Value::Number(MathObject::pow(base, exponent)))
}

fn math_unary(
    ctx: &mut CallContext<'_, '_>,
    args: &[Value],
    op: fn(f64) -> f64,
) -> Result<Value, ExecutionError> {
    Ok(Value::Number(op(ctx.number(args, 0)?)))
}

fn math_fold(
    ctx: &mut CallContext<'_, '_>,
    args: &[Value],
    op: fn(&[f64]) -> f64,
) -> Result<Value, ExecutionError> {
    let numbers = (0..args.len())
        .map(|idx| ctx.number(args, idx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Number(op(&numbers)))
}

/// `Array.push(arr, ...values)` appends in place and returns the array
fn array_push(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, ExecutionError> {
    let handle = ctx.array(args, 0)?;
    let elements = ctx.elements_mut(handle)?;
    for value in &args[1..] {
        ArrayPrototype::push(elements, value.clone());
    }
    Ok(Value::Array(handle))
}

fn array_pop(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, ExecutionError> {
    let handle = ctx.array(args, 0)?;
    let elements = ctx.elements_mut(handle)?;
    Ok(ArrayPrototype::pop(elements).unwrap_or(Value::Undefined))
}

/// `Array.map(arr, fn)` calls `fn(element, index)` and collects the results
/// into a new array
fn array_map(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, ExecutionError> {
    let handle = ctx.array(args, 0)?;
    let function = ctx.function(args, 1)?;
    // The callback may push to the source array; map over a snapshot
    let elements = ctx.elements(handle)?.to_vec();

    let mapped = ArrayPrototype::map(&elements, |element, idx| {
        ctx.call(&function, vec![element.clone(), Value::Number(idx as f64)])
    })?;
    Ok(Value::Array(ctx.heap_mut().allocate(HeapObject::Array(mapped))))
}

fn array_length(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, ExecutionError> {
    let handle = ctx.array(args, 0)?;
    Ok(Value::Number(ctx.elements(handle)?.len() as f64))
}

/// `String.slice(s, start[, end])`
fn string_slice(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, ExecutionError> {
    let s = ctx.string(args, 0)?;
    let start = ctx.number(args, 1)?;
    let end = ctx.optional_number(args, 2)?;
    Ok(Value::String(StringPrototype::slice(s, start, end)))
}

fn string_replace(ctx: &mut CallContext<'_, '_>, args: &[Value]) -> Result<Value, ExecutionError> {
    let s = ctx.string(args, 0)?;
    let search = ctx.string(args, 1)?;
    let replacement = ctx.string(args, 2)?;
    Ok(Value::String(StringPrototype::replace(s, search, replacement)))
}
