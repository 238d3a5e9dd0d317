//! Virtual machine for bytecode execution
//!
//! The VM runs a [`BytecodeChunk`] on an explicit operand stack with a flat,
//! name-indexed variable store. Calls resolve against a table of host
//! functions with a fixed arity.

use std::collections::HashMap;

use builtins::{DateObject, MathObject};
use bytecode_system::{BytecodeChunk, Opcode, Value};
use core_types::{ArgumentError, CompileError, ExecutionError};

/// Host function callable from bytecode
#[derive(Clone, Copy)]
pub struct HostFunction {
    /// Number of arguments popped from the stack
    pub arity: usize,
    /// Implementation; receives exactly `arity` arguments in call order
    pub func: fn(&[Value]) -> Result<Value, ExecutionError>,
}

impl std::fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostFunction")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Stack-based bytecode virtual machine
///
/// Variables persist across [`Vm::run`] calls, so a shell can feed it one
/// chunk per input line.
///
/// # Example
///
/// ```
/// use interpreter::Vm;
/// use bytecode_system::{BytecodeChunk, Opcode, Value};
///
/// let mut chunk = BytecodeChunk::new();
/// let a = chunk.add_constant(Value::Number(7.0));
/// let b = chunk.add_constant(Value::Number(2.0));
/// chunk.emit(Opcode::LoadConst(a));
/// chunk.emit(Opcode::LoadConst(b));
/// chunk.emit(Opcode::Sub);
/// chunk.emit(Opcode::Halt);
///
/// let mut vm = Vm::new();
/// assert_eq!(vm.run(&chunk).unwrap(), Value::Number(5.0));
/// ```
#[derive(Debug)]
pub struct Vm {
    stack: Vec<Value>,
    variables: HashMap<String, Value>,
    functions: HashMap<String, HostFunction>,
    step_limit: Option<u64>,
}

impl Vm {
    /// Create a VM with the default host functions and no step limit
    pub fn new() -> Self {
        let mut vm = Self {
            stack: Vec::with_capacity(64),
            variables: HashMap::new(),
            functions: HashMap::new(),
            step_limit: None,
        };
        vm.register_defaults();
        vm
    }

    /// Bound the number of instructions a single run may dispatch
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Register or replace a host function
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        func: fn(&[Value]) -> Result<Value, ExecutionError>,
    ) {
        self.functions
            .insert(name.into(), HostFunction { arity, func });
    }

    /// Current value of a variable
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Execute a chunk and return the value left on top of the stack,
    /// or `undefined` if the stack is empty
    ///
    /// The chunk is validated first; a bad jump target or constant index
    /// fails with [`ExecutionError::InvalidBytecode`] before anything runs.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, chunk: &BytecodeChunk) -> Result<Value, ExecutionError> {
        chunk.validate()?;
        self.stack.clear();
        let mut pc = 0;
        let mut steps: u64 = 0;

        while let Some(op) = chunk.instructions.get(pc) {
            steps += 1;
            if let Some(limit) = self.step_limit {
                if steps > limit {
                    return Err(ExecutionError::StepLimitExceeded { limit });
                }
            }
            tracing::trace!(pc, %op, depth = self.stack.len(), "dispatch");

            let mut next = pc + 1;
            match op {
                Opcode::LoadConst(idx) => {
                    let value = chunk.constants.get(*idx).cloned().ok_or(
                        CompileError::InvalidConstant {
                            index: pc,
                            constant: *idx,
                            len: chunk.constants.len(),
                        },
                    )?;
                    self.stack.push(value);
                }
                Opcode::LoadVar(name) => {
                    let value = self.variables.get(name).cloned().ok_or_else(|| {
                        ExecutionError::UndefinedIdentifier { name: name.clone() }
                    })?;
                    self.stack.push(value);
                }
                Opcode::StoreVar(name) => {
                    let value = self.pop(pc)?;
                    self.variables.insert(name.clone(), value);
                }
                Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::Div
                | Opcode::Equal
                | Opcode::NotEqual
                | Opcode::Less
                | Opcode::Greater
                | Opcode::LessEqual
                | Opcode::GreaterEqual => {
                    let b = self.pop(pc)?;
                    let a = self.pop(pc)?;
                    self.stack.push(binary(op, a, b)?);
                }
                Opcode::Dup => {
                    let top = self
                        .stack
                        .last()
                        .cloned()
                        .ok_or(ExecutionError::StackUnderflow { pc })?;
                    self.stack.push(top);
                }
                Opcode::Pop => {
                    self.pop(pc)?;
                }
                Opcode::CallFunction { name, argc } => {
                    let function = *self
                        .functions
                        .get(name)
                        .ok_or_else(|| ExecutionError::FunctionNotFound { name: name.clone() })?;
                    if *argc != function.arity {
                        return Err(ExecutionError::ArityMismatch {
                            name: name.clone(),
                            expected: function.arity,
                            found: *argc,
                        });
                    }
                    if self.stack.len() < function.arity {
                        return Err(ExecutionError::StackUnderflow { pc });
                    }
                    let args = self.stack.split_off(self.stack.len() - function.arity);
                    self.stack.push((function.func)(&args)?);
                }
                Opcode::Jump(target) => next = *target,
                Opcode::JumpIfFalse(target) => {
                    if !self.pop(pc)?.is_truthy() {
                        next = *target;
                    }
                }
                Opcode::Halt => break,
            }
            pc = next;
        }

        tracing::debug!(steps, "bytecode run finished");
        Ok(self.stack.last().cloned().unwrap_or(Value::Undefined))
    }

    fn pop(&mut self, pc: usize) -> Result<Value, ExecutionError> {
        self.stack.pop().ok_or(ExecutionError::StackUnderflow { pc })
    }

    fn register_defaults(&mut self) {
        self.register_function("Math.pow", 2, |args| {
            Ok(Value::Number(MathObject::pow(
                number("Math.pow", args, 0)?,
                number("Math.pow", args, 1)?,
            )))
        });
        let unary: [(&str, fn(&[Value]) -> Result<Value, ExecutionError>); 7] = [
            ("Math.abs", |args: &[Value]| unary_math("Math.abs", args, MathObject::abs)),
            ("Math.sin", |args: &[Value]| unary_math("Math.sin", args, MathObject::sin)),
            ("Math.cos", |args: &[Value]| unary_math("Math.cos", args, MathObject::cos)),
            ("Math.sqrt", |args: &[Value]| unary_math("Math.sqrt", args, MathObject::sqrt)),
            ("Math.floor", |args: &[Value]| unary_math("Math.floor", args, MathObject::floor)),
            ("Math.ceil", |args: &[Value]| unary_math("Math.ceil", args, MathObject::ceil)),
            ("Math.round", |args: &[Value]| unary_math("Math.round", args, MathObject::round)),
        ];
        for (name, func) in unary {
            self.register_function(name, 1, func);
        }
        // Bytecode calls have fixed arity, so the variadic pair takes two
        self.register_function("Math.max", 2, |args| {
            binary_math("Math.max", args, MathObject::max)
        });
        self.register_function("Math.min", 2, |args| {
            binary_math("Math.min", args, MathObject::min)
        });
        self.register_function("Date.now", 0, |_| Ok(Value::Number(DateObject::now())));
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

fn number(function: &str, args: &[Value], index: usize) -> Result<f64, ExecutionError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(ArgumentError::new(
            function,
            format!("argument {} must be a number, got {}", index + 1, other.type_name()),
        )
        .into()),
        None => Err(ArgumentError::new(function, format!("missing argument {}", index + 1)).into()),
    }
}

fn unary_math(function: &str, args: &[Value], op: fn(f64) -> f64) -> Result<Value, ExecutionError> {
    Ok(Value::Number(op(number(function, args, 0)?)))
}

fn binary_math(
    function: &str,
    args: &[Value],
    op: fn(&[f64]) -> f64,
) -> Result<Value, ExecutionError> {
    let pair = [number(function, args, 0)?, number(function, args, 1)?];
    Ok(Value::Number(op(&pair)))
}

/// Apply an arithmetic or comparison opcode to `a op b`
fn binary(op: &Opcode, a: Value, b: Value) -> Result<Value, ExecutionError> {
    let mismatch = |a: &Value, b: &Value| {
        let symbol = match op {
            Opcode::Add => "+",
            Opcode::Sub => "-",
            Opcode::Mul => "*",
            Opcode::Div => "/",
            Opcode::Less => "<",
            Opcode::Greater => ">",
            Opcode::LessEqual => "<=",
            _ => ">=",
        };
        ExecutionError::TypeMismatch {
            operator: symbol.to_string(),
            left: a.type_name(),
            right: b.type_name(),
        }
    };

    let result = match op {
        Opcode::Add => match (&a, &b) {
            (Value::Number(x), Value::Number(y)) => Value::Number(x + y),
            (Value::String(_), _) | (_, Value::String(_)) => Value::String(format!("{}{}", a, b)),
            _ => return Err(mismatch(&a, &b)),
        },
        Opcode::Sub | Opcode::Mul | Opcode::Div => {
            let (Some(x), Some(y)) = (a.as_number(), b.as_number()) else {
                return Err(mismatch(&a, &b));
            };
            Value::Number(match op {
                Opcode::Sub => x - y,
                Opcode::Mul => x * y,
                _ => x / y,
            })
        }
        Opcode::Equal => Value::Boolean(a == b),
        Opcode::NotEqual => Value::Boolean(a != b),
        _ => {
            let ordering = match (&a, &b) {
                (Value::Number(x), Value::Number(y)) => x.partial_cmp(y),
                (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
                _ => return Err(mismatch(&a, &b)),
            };
            Value::Boolean(ordering.is_some_and(|ord| match op {
                Opcode::Less => ord.is_lt(),
                Opcode::Greater => ord.is_gt(),
                Opcode::LessEqual => ord.is_le(),
                _ => ord.is_ge(),
            }))
        }
    };
    Ok(result)
}
