//! Abstract Syntax Tree node definitions
//!
//! The tree is a closed set of node kinds: consumers match exhaustively, so
//! an unhandled node kind is a compile-time error rather than a runtime one.

use core_types::ExecutionError;
use std::rc::Rc;
use std::str::FromStr;

/// Root of a parsed script
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements in source order
    pub body: Vec<Statement>,
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let name = init;` or `const name = init;`
    VariableDeclaration {
        /// Declaration kind
        kind: VariableKind,
        /// Bound name
        name: String,
        /// Initializer
        init: Expression,
    },

    /// Function declaration; shared so the runtime can keep it after the
    /// program that declared it is dropped
    FunctionDeclaration(Rc<FunctionDeclaration>),

    /// If statement with an optional single alternate block
    IfStatement {
        /// Condition
        test: Expression,
        /// Statements run when the condition is truthy
        consequent: Vec<Statement>,
        /// Statements run otherwise
        alternate: Option<Vec<Statement>>,
    },

    /// C-style three-clause loop
    ForStatement {
        /// Initialization, a declaration or expression statement
        init: Option<Box<Statement>>,
        /// Condition; absent means always true
        test: Option<Expression>,
        /// Update evaluated after each iteration
        update: Option<Expression>,
        /// Loop body
        body: Vec<Statement>,
    },

    /// While loop
    WhileStatement {
        /// Loop condition
        test: Expression,
        /// Loop body
        body: Vec<Statement>,
    },

    /// Return statement
    ReturnStatement {
        /// Returned value; `undefined` when absent
        argument: Option<Expression>,
    },

    /// Expression statement
    ExpressionStatement {
        /// The expression
        expression: Expression,
    },
}

impl Statement {
    /// Node kind name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::VariableDeclaration { .. } => "VariableDeclaration",
            Statement::FunctionDeclaration(_) => "FunctionDeclaration",
            Statement::IfStatement { .. } => "IfStatement",
            Statement::ForStatement { .. } => "ForStatement",
            Statement::WhileStatement { .. } => "WhileStatement",
            Statement::ReturnStatement { .. } => "ReturnStatement",
            Statement::ExpressionStatement { .. } => "ExpressionStatement",
        }
    }
}

/// A named function with positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    /// Function name
    pub name: String,
    /// Parameter names
    pub params: Vec<String>,
    /// Function body
    pub body: Vec<Statement>,
}

/// Variable declaration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// let
    Let,
    /// const
    Const,
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal value
    Literal(Literal),

    /// Identifier reference
    Identifier(String),

    /// Binary operation
    BinaryExpression {
        /// Operator
        operator: BinaryOperator,
        /// Left operand
        left: Box<Expression>,
        /// Right operand
        right: Box<Expression>,
    },

    /// Assignment to an existing binding
    AssignmentExpression {
        /// Operator
        operator: AssignmentOperator,
        /// Assigned name
        target: String,
        /// Assigned value
        value: Box<Expression>,
    },

    /// Function or builtin call
    CallExpression {
        /// What is being called
        callee: Callee,
        /// Arguments in source order
        arguments: Vec<Expression>,
    },

    /// Property read, `object.property`
    MemberExpression {
        /// Object expression
        object: Box<Expression>,
        /// Property name
        property: String,
    },

    /// Array literal
    ArrayExpression {
        /// Elements in source order
        elements: Vec<Expression>,
    },

    /// Object literal
    ObjectExpression {
        /// Properties in source order
        properties: Vec<Property>,
    },
}

impl Expression {
    /// Node kind name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "Literal",
            Expression::Identifier(_) => "Identifier",
            Expression::BinaryExpression { .. } => "BinaryExpression",
            Expression::AssignmentExpression { .. } => "AssignmentExpression",
            Expression::CallExpression { .. } => "CallExpression",
            Expression::MemberExpression { .. } => "MemberExpression",
            Expression::ArrayExpression { .. } => "ArrayExpression",
            Expression::ObjectExpression { .. } => "ObjectExpression",
        }
    }
}

/// Target of a call expression
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    /// `name(...)`
    Identifier(String),
    /// `object.property(...)`, the form used for builtin namespaces
    Member {
        /// Object name
        object: String,
        /// Property name
        property: String,
    },
    /// Any other callee: `o.a.f(...)`, `f(1)(2)`, `(g)(...)`
    Expression(Box<Expression>),
}

impl Callee {
    /// Classify the expression in front of an argument list
    pub fn from_expression(expr: Expression) -> Self {
        match expr {
            Expression::Identifier(name) => Callee::Identifier(name),
            Expression::MemberExpression { object, property } => match *object {
                Expression::Identifier(object) => Callee::Member { object, property },
                object => Callee::Expression(Box::new(Expression::MemberExpression {
                    object: Box::new(object),
                    property,
                })),
            },
            other => Callee::Expression(Box::new(other)),
        }
    }

    /// Dotted display name, e.g. `Math.pow`
    pub fn display_name(&self) -> String {
        match self {
            Callee::Identifier(name) => name.clone(),
            Callee::Member { object, property } => format!("{}.{}", object, property),
            Callee::Expression(expr) => describe(expr),
        }
    }
}

fn describe(expr: &Expression) -> String {
    match expr {
        Expression::Identifier(name) => name.clone(),
        Expression::MemberExpression { object, property } => {
            format!("{}.{}", describe(object), property)
        }
        Expression::CallExpression { callee, .. } => format!("{}(...)", callee.display_name()),
        other => format!("<{}>", other.kind()),
    }
}

/// Object literal property
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property key
    pub key: String,
    /// Property value
    pub value: Expression,
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Number literal
    Number(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Boolean(bool),
}

/// Binary operators; all share one precedence level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// <
    LessThan,
    /// >
    GreaterThan,
    /// <=
    LessThanEqual,
    /// >=
    GreaterThanEqual,
}

impl BinaryOperator {
    /// Source spelling of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanEqual => "<=",
            BinaryOperator::GreaterThanEqual => ">=",
        }
    }
}

impl FromStr for BinaryOperator {
    type Err = ExecutionError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        let op = match symbol {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Subtract,
            "*" => BinaryOperator::Multiply,
            "/" => BinaryOperator::Divide,
            "==" => BinaryOperator::Equal,
            "!=" => BinaryOperator::NotEqual,
            "<" => BinaryOperator::LessThan,
            ">" => BinaryOperator::GreaterThan,
            "<=" => BinaryOperator::LessThanEqual,
            ">=" => BinaryOperator::GreaterThanEqual,
            other => {
                return Err(ExecutionError::UnknownOperator {
                    operator: other.to_string(),
                })
            }
        };
        Ok(op)
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// =
    Assign,
    /// +=
    AddAssign,
    /// -=
    SubtractAssign,
}

impl AssignmentOperator {
    /// The binary operator applied before storing, if any
    pub fn binary_operator(&self) -> Option<BinaryOperator> {
        match self {
            AssignmentOperator::Assign => None,
            AssignmentOperator::AddAssign => Some(BinaryOperator::Add),
            AssignmentOperator::SubtractAssign => Some(BinaryOperator::Subtract),
        }
    }
}
