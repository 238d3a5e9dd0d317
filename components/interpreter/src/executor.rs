//! Tree-walking executor
//!
//! Evaluation is syntax directed: every statement and expression kind has
//! one arm in an exhaustive `match`. The current environment is passed
//! explicitly to each call. A function call evaluates its body in a fresh
//! child of the global environment and hands back a [`Completion`] so that
//! `return` inside an `if` or loop body leaves the whole function.

use std::collections::BTreeMap;
use std::rc::Rc;

use core_types::stack::ensure_sufficient_stack;
use core_types::{ExecutionError, ScriptError};
use memory_manager::{GcHandle, GcStats, Heap};
use parser::{
    parse_program, BinaryOperator, Callee, Expression, FunctionDeclaration, Literal, Program,
    Statement,
};

use crate::context::CallContext;
use crate::environment::Environment;
use crate::native::BuiltinTable;
use crate::value::{display_scalar, HeapObject, Value};

/// How a statement list finished
#[derive(Debug, Clone, PartialEq)]
enum Completion {
    /// Ran to the end; carries the value of the last statement
    Normal(Value),
    /// Hit a `return`
    Return(Value),
}

/// Deepest chain of nested script function calls
pub const MAX_CALL_DEPTH: usize = 10_000;

/// Evaluates programs against a heap and a builtin table
#[derive(Debug)]
pub struct Executor {
    heap: Heap<HeapObject>,
    builtins: BuiltinTable,
    depth: usize,
}

impl Executor {
    /// Create an executor with an empty heap
    pub fn new(builtins: BuiltinTable) -> Self {
        Self {
            heap: Heap::new(),
            builtins,
            depth: 0,
        }
    }

    /// The object heap
    pub fn heap(&self) -> &Heap<HeapObject> {
        &self.heap
    }

    /// The object heap, mutably
    pub fn heap_mut(&mut self) -> &mut Heap<HeapObject> {
        &mut self.heap
    }

    /// The builtin capability table
    pub fn builtins(&self) -> &BuiltinTable {
        &self.builtins
    }

    /// Run a program in `env` and return the value of its last statement,
    /// or the argument of a top-level `return`
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run_program(
        &mut self,
        program: &Program,
        env: &mut Environment<'_>,
    ) -> Result<Value, ExecutionError> {
        match self.execute_block(&program.body, env)? {
            Completion::Normal(value) | Completion::Return(value) => Ok(value),
        }
    }

    /// Call a script function; missing trailing arguments bind `undefined`
    ///
    /// Fails with [`ExecutionError::CallDepthExceeded`] once
    /// [`MAX_CALL_DEPTH`] calls are active.
    pub fn call_function(
        &mut self,
        function: &Rc<FunctionDeclaration>,
        args: Vec<Value>,
        env: &Environment<'_>,
    ) -> Result<Value, ExecutionError> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(ExecutionError::CallDepthExceeded {
                limit: MAX_CALL_DEPTH,
            });
        }
        tracing::trace!(function = %function.name, argc = args.len(), depth = self.depth, "call");

        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.invoke(function, args, env));
        self.depth -= 1;
        result
    }

    fn invoke(
        &mut self,
        function: &FunctionDeclaration,
        args: Vec<Value>,
        env: &Environment<'_>,
    ) -> Result<Value, ExecutionError> {
        let mut local = Environment::with_parent(env.global());
        let mut args = args.into_iter();
        for param in &function.params {
            let value = args.next().unwrap_or(Value::Undefined);
            local.define(param.clone(), value, &mut self.heap);
        }

        match self.execute_block(&function.body, &mut local)? {
            Completion::Return(value) => Ok(value),
            Completion::Normal(_) => Ok(Value::Undefined),
        }
    }

    fn execute_block(
        &mut self,
        statements: &[Statement],
        env: &mut Environment<'_>,
    ) -> Result<Completion, ExecutionError> {
        let mut last = Value::Undefined;
        for stmt in statements {
            match self.execute_statement(stmt, env)? {
                Completion::Normal(value) => last = value,
                done @ Completion::Return(_) => return Ok(done),
            }
        }
        Ok(Completion::Normal(last))
    }

    fn execute_statement(
        &mut self,
        stmt: &Statement,
        env: &mut Environment<'_>,
    ) -> Result<Completion, ExecutionError> {
        match stmt {
            Statement::VariableDeclaration { name, init, .. } => {
                let value = self.evaluate(init, env)?;
                env.define(name.clone(), value, &mut self.heap);
                Ok(Completion::Normal(Value::Undefined))
            }

            Statement::FunctionDeclaration(decl) => {
                let function = Value::Function(Rc::clone(decl));
                env.define(decl.name.clone(), function, &mut self.heap);
                Ok(Completion::Normal(Value::Undefined))
            }

            Statement::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                if self.evaluate(test, env)?.is_truthy() {
                    self.execute_block(consequent, env)
                } else if let Some(alternate) = alternate {
                    self.execute_block(alternate, env)
                } else {
                    Ok(Completion::Normal(Value::Undefined))
                }
            }

            Statement::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.execute_statement(init, env)?;
                }
                let mut last = Value::Undefined;
                loop {
                    if let Some(test) = test {
                        if !self.evaluate(test, env)?.is_truthy() {
                            break;
                        }
                    }
                    match self.execute_block(body, env)? {
                        Completion::Normal(value) => last = value,
                        done @ Completion::Return(_) => return Ok(done),
                    }
                    if let Some(update) = update {
                        self.evaluate(update, env)?;
                    }
                }
                Ok(Completion::Normal(last))
            }

            Statement::WhileStatement { test, body } => {
                let mut last = Value::Undefined;
                while self.evaluate(test, env)?.is_truthy() {
                    match self.execute_block(body, env)? {
                        Completion::Normal(value) => last = value,
                        done @ Completion::Return(_) => return Ok(done),
                    }
                }
                Ok(Completion::Normal(last))
            }

            Statement::ReturnStatement { argument } => {
                let value = match argument {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }

            Statement::ExpressionStatement { expression } => {
                Ok(Completion::Normal(self.evaluate(expression, env)?))
            }
        }
    }

    fn evaluate(&mut self, expr: &Expression, env: &Environment<'_>) -> Result<Value, ExecutionError> {
        ensure_sufficient_stack(|| self.evaluate_node(expr, env))
    }

    fn evaluate_node(
        &mut self,
        expr: &Expression,
        env: &Environment<'_>,
    ) -> Result<Value, ExecutionError> {
        match expr {
            Expression::Literal(lit) => Ok(match lit {
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::String(s.clone()),
                Literal::Boolean(b) => Value::Boolean(*b),
            }),

            Expression::Identifier(name) => {
                env.lookup(name, &self.heap)
                    .ok_or_else(|| ExecutionError::UndefinedIdentifier { name: name.clone() })
            }

            Expression::BinaryExpression {
                operator,
                left,
                right,
            } => {
                let left = self.evaluate(left, env)?;
                let right = self.evaluate(right, env)?;
                self.binary(*operator, left, right)
            }

            Expression::AssignmentExpression {
                operator,
                target,
                value,
            } => {
                let current = match operator.binary_operator() {
                    Some(op) => {
                        let current = env.lookup(target, &self.heap).ok_or_else(|| {
                            ExecutionError::UndefinedIdentifier {
                                name: target.clone(),
                            }
                        })?;
                        Some((op, current))
                    }
                    None => None,
                };
                let mut value = self.evaluate(value, env)?;
                if let Some((op, current)) = current {
                    value = self.binary(op, current, value)?;
                }
                env.assign(target, value.clone(), &mut self.heap)?;
                Ok(value)
            }

            Expression::CallExpression { callee, arguments } => {
                self.evaluate_call(callee, arguments, env)
            }

            Expression::MemberExpression { object, property } => {
                let object = self.evaluate(object, env)?;
                self.read_property(&object, property)
            }

            Expression::ArrayExpression { elements } => {
                let values = self.evaluate_all(elements, env)?;
                Ok(Value::Array(self.heap.allocate(HeapObject::Array(values))))
            }

            Expression::ObjectExpression { properties } => {
                let mut record = BTreeMap::new();
                for property in properties {
                    let value = self.evaluate(&property.value, env)?;
                    record.insert(property.key.clone(), value);
                }
                Ok(Value::Object(self.heap.allocate(HeapObject::Record(record))))
            }
        }
    }

    fn evaluate_all(
        &mut self,
        expressions: &[Expression],
        env: &Environment<'_>,
    ) -> Result<Vec<Value>, ExecutionError> {
        expressions
            .iter()
            .map(|expr| self.evaluate(expr, env))
            .collect()
    }

    fn evaluate_call(
        &mut self,
        callee: &Callee,
        arguments: &[Expression],
        env: &Environment<'_>,
    ) -> Result<Value, ExecutionError> {
        match callee {
            Callee::Identifier(name) => {
                let target = env
                    .lookup(name, &self.heap)
                    .ok_or_else(|| ExecutionError::FunctionNotFound { name: name.clone() })?;
                let Value::Function(function) = target else {
                    return Err(ExecutionError::NotCallable { name: name.clone() });
                };
                let args = self.evaluate_all(arguments, env)?;
                self.call_function(&function, args, env)
            }

            Callee::Member { object, property } => {
                let target = env.lookup(object, &self.heap).ok_or_else(|| {
                    ExecutionError::UndefinedIdentifier {
                        name: object.clone(),
                    }
                })?;
                self.call_method(target, property, callee, arguments, env)
            }

            Callee::Expression(target) => match &**target {
                Expression::MemberExpression { object, property } => {
                    let object = self.evaluate(object, env)?;
                    self.call_method(object, property, callee, arguments, env)
                }
                other => match self.evaluate(other, env)? {
                    Value::Function(function) => {
                        let args = self.evaluate_all(arguments, env)?;
                        self.call_function(&function, args, env)
                    }
                    _ => Err(ExecutionError::NotCallable {
                        name: callee.display_name(),
                    }),
                },
            },
        }
    }

    /// `target.property(arguments)`: a builtin when `target` is a namespace,
    /// otherwise the function stored under `property`
    fn call_method(
        &mut self,
        target: Value,
        property: &str,
        callee: &Callee,
        arguments: &[Expression],
        env: &Environment<'_>,
    ) -> Result<Value, ExecutionError> {
        if let Value::Namespace(namespace) = target {
            let native = self.builtins.get(namespace, property).ok_or_else(|| {
                ExecutionError::UnknownBuiltin {
                    namespace: namespace.to_string(),
                    operation: property.to_string(),
                }
            })?;
            let args = self.evaluate_all(arguments, env)?;
            tracing::trace!(namespace, operation = %property, argc = args.len(), "builtin call");
            let mut ctx = CallContext::new(self, env, namespace, property);
            return native(&mut ctx, &args);
        }

        match self.read_property(&target, property)? {
            Value::Function(function) => {
                let args = self.evaluate_all(arguments, env)?;
                self.call_function(&function, args, env)
            }
            _ => Err(ExecutionError::NotCallable {
                name: callee.display_name(),
            }),
        }
    }

    fn read_property(&self, object: &Value, property: &str) -> Result<Value, ExecutionError> {
        match object {
            Value::Object(handle) => match self.heap.get(*handle) {
                Some(HeapObject::Record(record)) => {
                    Ok(record.get(property).cloned().unwrap_or(Value::Undefined))
                }
                _ => Ok(Value::Undefined),
            },
            Value::Array(handle) if property == "length" => match self.heap.get(*handle) {
                Some(HeapObject::Array(elements)) => Ok(Value::Number(elements.len() as f64)),
                _ => Ok(Value::Undefined),
            },
            Value::String(s) if property == "length" => Ok(Value::Number(s.chars().count() as f64)),
            Value::Array(_) | Value::String(_) => Ok(Value::Undefined),
            _ => Err(ExecutionError::NotAnObject {
                property: property.to_string(),
            }),
        }
    }

    fn binary(
        &self,
        operator: BinaryOperator,
        left: Value,
        right: Value,
    ) -> Result<Value, ExecutionError> {
        let mismatch = |left: &Value, right: &Value| ExecutionError::TypeMismatch {
            operator: operator.symbol().to_string(),
            left: left.type_name(),
            right: right.type_name(),
        };

        let result = match operator {
            BinaryOperator::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
                (Value::String(_), _) | (_, Value::String(_)) => {
                    Value::String(format!("{}{}", self.display(&left), self.display(&right)))
                }
                _ => return Err(mismatch(&left, &right)),
            },
            BinaryOperator::Subtract | BinaryOperator::Multiply | BinaryOperator::Divide => {
                let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
                    return Err(mismatch(&left, &right));
                };
                Value::Number(match operator {
                    BinaryOperator::Subtract => a - b,
                    BinaryOperator::Multiply => a * b,
                    _ => a / b,
                })
            }
            BinaryOperator::Equal => Value::Boolean(left == right),
            BinaryOperator::NotEqual => Value::Boolean(left != right),
            BinaryOperator::LessThan
            | BinaryOperator::GreaterThan
            | BinaryOperator::LessThanEqual
            | BinaryOperator::GreaterThanEqual => {
                let ordering = match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                    (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                    _ => return Err(mismatch(&left, &right)),
                };
                // NaN compares false with everything
                Value::Boolean(ordering.is_some_and(|ord| match operator {
                    BinaryOperator::LessThan => ord.is_lt(),
                    BinaryOperator::GreaterThan => ord.is_gt(),
                    BinaryOperator::LessThanEqual => ord.is_le(),
                    _ => ord.is_ge(),
                }))
            }
        };
        Ok(result)
    }

    /// Render a value the way the shell prints it
    pub fn display(&self, value: &Value) -> String {
        let mut out = String::new();
        self.write_value(value, &mut Vec::new(), false, &mut out);
        out
    }

    fn write_value(&self, value: &Value, open: &mut Vec<GcHandle>, nested: bool, out: &mut String) {
        let handle = match value {
            Value::String(s) if nested => {
                out.push('"');
                out.push_str(s);
                out.push('"');
                return;
            }
            Value::Array(h) | Value::Object(h) => *h,
            scalar => {
                out.push_str(&display_scalar(scalar));
                return;
            }
        };
        if open.contains(&handle) {
            out.push_str("[Circular]");
            return;
        }

        open.push(handle);
        match self.heap.get(handle) {
            Some(HeapObject::Array(elements)) => {
                out.push('[');
                for (idx, element) in elements.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    self.write_value(element, open, true, out);
                }
                out.push(']');
            }
            Some(HeapObject::Record(record)) if record.is_empty() => out.push_str("{}"),
            Some(HeapObject::Record(record)) => {
                out.push_str("{ ");
                for (idx, (key, element)) in record.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(key);
                    out.push_str(": ");
                    self.write_value(element, open, true, out);
                }
                out.push_str(" }");
            }
            Some(HeapObject::Binding(_)) | None => out.push_str(&display_scalar(value)),
        }
        open.pop();
    }
}

/// A tree-walking interpreter with its own global environment
///
/// # Examples
///
/// ```
/// use interpreter::{Interpreter, Value};
///
/// let mut interp = Interpreter::new();
/// let result = interp
///     .eval("function add(a, b) { return a + b; } add(2, 3);")
///     .unwrap();
/// assert_eq!(result, Value::Number(5.0));
/// ```
#[derive(Debug)]
pub struct Interpreter {
    executor: Executor,
    global: Environment<'static>,
}

impl Interpreter {
    /// Interpreter with the standard builtin namespaces
    pub fn new() -> Self {
        Self::with_builtins(BuiltinTable::standard())
    }

    /// Interpreter with a custom builtin table; each namespace in the table
    /// is bound by name in the global environment
    pub fn with_builtins(builtins: BuiltinTable) -> Self {
        let namespaces: Vec<&'static str> = builtins.namespaces().collect();
        let mut executor = Executor::new(builtins);
        let mut global = Environment::new();
        for namespace in namespaces {
            global.define(namespace, Value::Namespace(namespace), executor.heap_mut());
        }
        Self { executor, global }
    }

    /// Run a parsed program against the global environment
    pub fn run(&mut self, program: &Program) -> Result<Value, ExecutionError> {
        self.executor.run_program(program, &mut self.global)
    }

    /// Parse and run source text
    pub fn eval(&mut self, source: &str) -> Result<Value, ScriptError> {
        let program = parse_program(source)?;
        Ok(self.run(&program)?)
    }

    /// Current value of a global binding
    pub fn global(&self, name: &str) -> Option<Value> {
        self.global.lookup(name, self.executor.heap())
    }

    /// Elements of an array value
    pub fn elements(&self, value: &Value) -> Option<&[Value]> {
        match value {
            Value::Array(handle) => match self.executor.heap().get(*handle) {
                Some(HeapObject::Array(elements)) => Some(elements),
                _ => None,
            },
            _ => None,
        }
    }

    /// Render a value the way the shell prints it
    pub fn display(&self, value: &Value) -> String {
        self.executor.display(value)
    }

    /// Collect everything unreachable from the global environment
    ///
    /// Values held only by the caller (such as a program result that was
    /// never bound to a name) are freed.
    pub fn collect_garbage(&mut self) -> GcStats {
        self.global.run_gc(self.executor.heap_mut())
    }

    /// Number of live heap objects, binding cells included
    pub fn live_objects(&self) -> usize {
        self.executor.heap().live_count()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
