//! Bytecode generation from AST
//!
//! Lowers the control-flow subset of the language (declarations,
//! assignments, `if`, `while`, `for`, binary expressions, literals,
//! identifiers and calls) to the stack machine. Function declarations,
//! `return`, array/object literals and member reads have no lowering and
//! fail with [`CompileError::UnsupportedNode`].
//!
//! Every chunk ends in `Halt`, so a jump patched to "the end" always lands
//! on a real instruction.

use crate::ast::*;
use bytecode_system::{BytecodeChunk, Opcode, Value as BytecodeValue};
use core_types::stack::ensure_sufficient_stack;
use core_types::CompileError;

/// Bytecode generator that converts AST to bytecode
pub struct BytecodeGenerator {
    chunk: BytecodeChunk,
}

impl BytecodeGenerator {
    /// Create a new bytecode generator
    pub fn new() -> Self {
        Self {
            chunk: BytecodeChunk::new(),
        }
    }

    /// Generate bytecode from a program
    ///
    /// The value of a trailing expression statement is left on the stack as
    /// the program result; every other expression statement is popped.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn generate(&mut self, program: &Program) -> Result<BytecodeChunk, CompileError> {
        self.chunk = BytecodeChunk::new();

        let count = program.body.len();
        for (idx, stmt) in program.body.iter().enumerate() {
            self.visit_statement(stmt, idx + 1 == count)?;
        }
        self.chunk.emit(Opcode::Halt);
        self.chunk.validate()?;

        tracing::debug!(
            instructions = self.chunk.instruction_count(),
            constants = self.chunk.constants.len(),
            "generated bytecode"
        );
        Ok(std::mem::take(&mut self.chunk))
    }

    fn visit_block(&mut self, statements: &[Statement]) -> Result<(), CompileError> {
        for stmt in statements {
            self.visit_statement(stmt, false)?;
        }
        Ok(())
    }

    fn visit_statement(&mut self, stmt: &Statement, keep_value: bool) -> Result<(), CompileError> {
        match stmt {
            Statement::VariableDeclaration { name, init, .. } => {
                self.visit_expression(init)?;
                self.chunk.emit(Opcode::StoreVar(name.clone()));
            }

            Statement::ExpressionStatement { expression } => {
                self.visit_expression(expression)?;
                if !keep_value {
                    self.chunk.emit(Opcode::Pop);
                }
            }

            Statement::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expression(test)?;
                let else_jump = self.chunk.emit(Opcode::JumpIfFalse(0)); // Placeholder

                self.visit_block(consequent)?;

                if let Some(alt) = alternate {
                    let end_jump = self.chunk.emit(Opcode::Jump(0)); // Placeholder
                    self.patch_to_here(else_jump);
                    self.visit_block(alt)?;
                    self.patch_to_here(end_jump);
                } else {
                    self.patch_to_here(else_jump);
                }
            }

            Statement::WhileStatement { test, body } => {
                let loop_start = self.chunk.instruction_count();
                self.visit_expression(test)?;
                let exit_jump = self.chunk.emit(Opcode::JumpIfFalse(0)); // Placeholder

                self.visit_block(body)?;
                self.chunk.emit(Opcode::Jump(loop_start));

                self.patch_to_here(exit_jump);
            }

            Statement::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.visit_statement(init, false)?;
                }

                let loop_start = self.chunk.instruction_count();
                let exit_jump = match test {
                    Some(test) => {
                        self.visit_expression(test)?;
                        Some(self.chunk.emit(Opcode::JumpIfFalse(0)))
                    }
                    None => None,
                };

                self.visit_block(body)?;
                if let Some(update) = update {
                    self.visit_expression(update)?;
                    self.chunk.emit(Opcode::Pop);
                }
                self.chunk.emit(Opcode::Jump(loop_start));

                if let Some(exit) = exit_jump {
                    self.patch_to_here(exit);
                }
            }

            Statement::FunctionDeclaration(_) | Statement::ReturnStatement { .. } => {
                return Err(CompileError::UnsupportedNode { kind: stmt.kind() });
            }
        }

        Ok(())
    }

    fn visit_expression(&mut self, expr: &Expression) -> Result<(), CompileError> {
        ensure_sufficient_stack(|| self.lower_expression(expr))
    }

    fn lower_expression(&mut self, expr: &Expression) -> Result<(), CompileError> {
        match expr {
            Expression::Literal(lit) => {
                let value = match lit {
                    Literal::Number(n) => BytecodeValue::Number(*n),
                    Literal::String(s) => BytecodeValue::String(s.clone()),
                    Literal::Boolean(b) => BytecodeValue::Boolean(*b),
                };
                let idx = self.chunk.add_constant(value);
                self.chunk.emit(Opcode::LoadConst(idx));
            }

            Expression::Identifier(name) => {
                self.chunk.emit(Opcode::LoadVar(name.clone()));
            }

            Expression::BinaryExpression {
                operator,
                left,
                right,
            } => {
                self.visit_expression(left)?;
                self.visit_expression(right)?;
                self.chunk.emit(binary_opcode(*operator));
            }

            Expression::AssignmentExpression {
                operator,
                target,
                value,
            } => {
                match operator.binary_operator() {
                    Some(op) => {
                        self.chunk.emit(Opcode::LoadVar(target.clone()));
                        self.visit_expression(value)?;
                        self.chunk.emit(binary_opcode(op));
                    }
                    None => self.visit_expression(value)?,
                }
                // Assignment is an expression: keep a copy as its value
                self.chunk.emit(Opcode::Dup);
                self.chunk.emit(Opcode::StoreVar(target.clone()));
            }

            Expression::CallExpression {
                callee: Callee::Expression(target),
                ..
            } => {
                return Err(CompileError::UnsupportedNode {
                    kind: target.kind(),
                });
            }

            Expression::CallExpression { callee, arguments } => {
                for arg in arguments {
                    self.visit_expression(arg)?;
                }
                self.chunk.emit(Opcode::CallFunction {
                    name: callee.display_name(),
                    argc: arguments.len(),
                });
            }

            Expression::MemberExpression { .. }
            | Expression::ArrayExpression { .. }
            | Expression::ObjectExpression { .. } => {
                return Err(CompileError::UnsupportedNode { kind: expr.kind() });
            }
        }

        Ok(())
    }

    fn patch_to_here(&mut self, jump_idx: usize) {
        let target = self.chunk.instruction_count();
        self.chunk.patch_jump(jump_idx, target);
    }
}

impl Default for BytecodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn binary_opcode(operator: BinaryOperator) -> Opcode {
    match operator {
        BinaryOperator::Add => Opcode::Add,
        BinaryOperator::Subtract => Opcode::Sub,
        BinaryOperator::Multiply => Opcode::Mul,
        BinaryOperator::Divide => Opcode::Div,
        BinaryOperator::Equal => Opcode::Equal,
        BinaryOperator::NotEqual => Opcode::NotEqual,
        BinaryOperator::LessThan => Opcode::Less,
        BinaryOperator::GreaterThan => Opcode::Greater,
        BinaryOperator::LessThanEqual => Opcode::LessEqual,
        BinaryOperator::GreaterThanEqual => Opcode::GreaterEqual,
    }
}
